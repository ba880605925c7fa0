//! Handle behavior against the host filesystem
//!
//! Every test works inside its own `TempDir`.

use handlefs::{Entry, File, FileManager, Folder, Handle};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn setup() -> (TempDir, FileManager) {
    let temp = TempDir::new().unwrap();
    let manager = FileManager::default().with_base_dir(temp.path());
    (temp, manager)
}

fn write(base: &Path, relative: &str, content: &str) {
    let path = base.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

async fn folder(manager: &FileManager, path: impl AsRef<Path>) -> Folder {
    manager.get_folder(path).await.unwrap().unwrap()
}

async fn file(manager: &FileManager, path: impl AsRef<Path>) -> File {
    manager.get_file(path).await.unwrap().unwrap()
}

fn sorted_names(handles: &[Handle]) -> Vec<String> {
    let mut names: Vec<String> = handles.iter().map(|h| h.name()).collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_lookups_match_kind_on_disk() {
    let (temp, manager) = setup();
    write(temp.path(), "docs/a.txt", "a");

    assert!(manager.get_folder("docs").await.unwrap().is_some());
    assert!(manager.get_file("docs").await.unwrap().is_none());
    assert!(manager.get_file("docs/a.txt").await.unwrap().is_some());
    assert!(manager.get_folder("docs/a.txt").await.unwrap().is_none());
    assert!(manager.get_folder("missing").await.unwrap().is_none());
    assert!(manager.get_file("docs/a.txt/nested").await.unwrap().is_none());

    let a = file(&manager, "docs/a.txt").await;
    assert_eq!(a.path(), temp.path().join("docs/a.txt"));
    assert_eq!(a.parent_path(), temp.path().join("docs"));
}

#[tokio::test]
async fn test_create_helpers() {
    let (temp, manager) = setup();

    let dir = manager.create_folder("made").await.unwrap();
    assert!(temp.path().join("made").is_dir());
    let again = manager.create_folder("made").await.unwrap();
    assert_eq!(dir, again);

    let f = manager.create_file("made/x.txt", "first").await.unwrap();
    manager.create_file("made/x.txt", "second").await.unwrap();
    assert_eq!(f.read().await.unwrap(), "first");
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Profile {
    name: String,
    age: u32,
    tags: Vec<String>,
    active: bool,
}

fn profile() -> Profile {
    Profile {
        name: "Ada".to_string(),
        age: 36,
        tags: vec!["math".to_string(), "engines".to_string()],
        active: true,
    }
}

#[tokio::test]
async fn test_structured_round_trips() {
    let (temp, manager) = setup();

    for name in ["profile.json", "profile.toml", "profile"] {
        let f = manager.create_file(name, "").await.unwrap();
        f.write_object(&profile()).await.unwrap();
        let back: Profile = f.read_object().await.unwrap();
        assert_eq!(back, profile(), "round trip through {}", name);
    }

    let toml = fs::read_to_string(temp.path().join("profile.toml")).unwrap();
    assert!(toml.contains("age = 36"));
}

#[tokio::test]
async fn test_rename_to_current_name() {
    let (temp, manager) = setup();
    write(temp.path(), "a.txt", "a");
    let mut a = file(&manager, "a.txt").await;

    a.rename("a.txt").await.unwrap();
    assert_eq!(a.path(), temp.path().join("a.txt"));
    assert_eq!(a.read().await.unwrap(), "a");
}

#[tokio::test]
async fn test_rename_folder_keeps_contents() {
    let (temp, manager) = setup();
    write(temp.path(), "old/inner.txt", "inner");
    let mut old = folder(&manager, "old").await;

    old.rename("new").await.unwrap();
    assert_eq!(old.path(), temp.path().join("new"));
    assert_eq!(old.parent_path(), temp.path());
    assert_eq!(
        fs::read_to_string(temp.path().join("new/inner.txt")).unwrap(),
        "inner"
    );
}

#[tokio::test]
async fn test_reparent_collision_policy() {
    let (temp, manager) = setup();
    write(temp.path(), "target/a.txt", "existing");
    write(temp.path(), "one/a.txt", "one");
    write(temp.path(), "two/a.txt", "two");
    let target = folder(&manager, "target").await;

    let mut first = file(&manager, "one/a.txt").await;
    first.reparent((&target).into()).await.unwrap();
    assert_eq!(first.name(), "a copy.txt");
    assert_eq!(first.parent_path(), target.path());

    let mut second = file(&manager, "two/a.txt").await;
    second.reparent(temp.path().join("target").as_path().into()).await.unwrap();
    assert_eq!(second.name(), "a copy copy.txt");

    assert_eq!(
        fs::read_to_string(temp.path().join("target/a.txt")).unwrap(),
        "existing"
    );
    assert_eq!(
        fs::read_to_string(temp.path().join("target/a copy copy.txt")).unwrap(),
        "two"
    );
    assert!(!temp.path().join("target/a copy1.txt").exists());
}

#[tokio::test]
async fn test_clone_collision_policy() {
    let (temp, manager) = setup();
    write(temp.path(), "src/a.txt", "source");
    write(temp.path(), "dst/a.txt", "existing");
    let a = file(&manager, "src/a.txt").await;
    let dst = temp.path().join("dst");

    let first = a.clone_to(Some(dst.as_path()), false).await.unwrap();
    assert_eq!(first.path(), dst.join("a copy1.txt"));
    let second = a.clone_to(Some(dst.as_path()), false).await.unwrap();
    assert_eq!(second.path(), dst.join("a copy2.txt"));

    assert_eq!(second.read().await.unwrap(), "source");
    assert_eq!(fs::read_to_string(dst.join("a.txt")).unwrap(), "existing");
}

#[tokio::test]
async fn test_clone_relative_target_directory() {
    let (temp, manager) = setup();
    write(temp.path(), "src/a.txt", "source");
    fs::create_dir(temp.path().join("dst")).unwrap();
    let a = file(&manager, "src/a.txt").await;

    let copy = a.clone_to(Some(Path::new("dst")), false).await.unwrap();
    assert_eq!(copy.path(), temp.path().join("dst/a.txt"));
}

#[tokio::test]
async fn test_folder_clone_overwrite_replaces_tree() {
    let (temp, manager) = setup();
    write(temp.path(), "src/tree/keep.txt", "new");
    write(temp.path(), "dst/tree/keep.txt", "old");
    write(temp.path(), "dst/tree/only-old/stale.txt", "stale");
    let tree = folder(&manager, "src/tree").await;

    let copy = tree
        .clone_to(Some(temp.path().join("dst").as_path()), true)
        .await
        .unwrap();

    assert_eq!(copy.path(), temp.path().join("dst/tree"));
    assert!(!temp.path().join("dst/tree/only-old").exists());
    assert_eq!(
        fs::read_to_string(temp.path().join("dst/tree/keep.txt")).unwrap(),
        "new"
    );
}

#[tokio::test]
async fn test_folder_clone_preserves_structure_under_real_root() {
    let (temp, manager) = setup();
    write(temp.path(), "work/site/index.html", "<html>");
    write(temp.path(), "work/site/css/main.css", "body {}");
    write(temp.path(), "work/site/js/lib/util.js", "export {}");
    fs::create_dir(temp.path().join("work/site/empty")).unwrap();
    let site = folder(&manager, "work/site").await;

    let copy = site.clone_to(None, false).await.unwrap();
    let root = temp.path().join("work/site copy1");
    assert_eq!(copy.path(), root);

    let descendants = copy.descendants(None).await.unwrap();
    let mut relative: Vec<PathBuf> = descendants
        .iter()
        .map(|h| {
            assert!(h.path().starts_with(&root), "{:?} not under copy", h.path());
            h.path().strip_prefix(&root).unwrap().to_path_buf()
        })
        .collect();
    relative.sort();

    let expected: Vec<PathBuf> = [
        "css",
        "css/main.css",
        "empty",
        "index.html",
        "js",
        "js/lib",
        "js/lib/util.js",
    ]
    .iter()
    .map(PathBuf::from)
    .collect();
    assert_eq!(relative, expected);
    assert_eq!(
        fs::read_to_string(root.join("js/lib/util.js")).unwrap(),
        "export {}"
    );
}

#[tokio::test]
async fn test_empty_removes_everything() {
    let (temp, manager) = setup();
    write(temp.path(), "bin/a.txt", "a");
    write(temp.path(), "bin/b.txt", "b");
    write(temp.path(), "bin/sub/deep/c.txt", "c");
    let bin = folder(&manager, "bin").await;

    bin.empty().await.unwrap();

    assert_eq!(fs::read_dir(temp.path().join("bin")).unwrap().count(), 0);
    assert!(!temp.path().join("bin/sub/deep/c.txt").exists());
}

#[tokio::test]
async fn test_destroy_missing_is_ok() {
    let (temp, manager) = setup();
    write(temp.path(), "gone.txt", "x");
    let gone = file(&manager, "gone.txt").await;
    let stale = gone.clone();

    gone.destroy().await.unwrap();
    assert!(!temp.path().join("gone.txt").exists());
    stale.destroy().await.unwrap();
}

#[tokio::test]
async fn test_children_and_descendants_filters() {
    let (temp, manager) = setup();
    write(temp.path(), "proj/a.ts", "");
    write(temp.path(), "proj/b.js", "");
    write(temp.path(), "proj/lib/c.ts", "");
    write(temp.path(), "proj/lib/d.js", "");
    fs::create_dir(temp.path().join("proj/types.ts")).unwrap();
    let proj = folder(&manager, "proj").await;

    let children = proj.children(None).await.unwrap();
    assert_eq!(sorted_names(&children), vec!["a.ts", "b.js", "lib", "types.ts"]);

    let ts_children = proj.children(Some(".ts")).await.unwrap();
    assert_eq!(sorted_names(&ts_children), vec!["a.ts", "types.ts"]);

    let all = proj.descendants(None).await.unwrap();
    assert_eq!(
        sorted_names(&all),
        vec!["a.ts", "b.js", "c.ts", "d.js", "lib", "types.ts"]
    );

    let ts = proj.descendants(Some(".ts")).await.unwrap();
    assert_eq!(sorted_names(&ts), vec!["a.ts", "c.ts", "types.ts"]);
    let types = ts.iter().find(|h| h.name() == "types.ts").unwrap();
    assert!(types.is_folder());
}

#[tokio::test]
async fn test_list_nested_on_disk() {
    let (temp, manager) = setup();
    write(temp.path(), "walk/x.rs", "");
    write(temp.path(), "walk/inner/y.md", "");

    let mut paths = handlefs::list_nested(manager.fs(), &temp.path().join("walk"), Some(".rs")).await;
    paths.sort();
    assert_eq!(
        paths,
        vec![temp.path().join("walk/inner"), temp.path().join("walk/x.rs")]
    );
}

#[tokio::test]
async fn test_move_children() {
    let (temp, manager) = setup();
    write(temp.path(), "from/a.txt", "a");
    write(temp.path(), "from/sub/b.txt", "b");
    fs::create_dir(temp.path().join("to")).unwrap();
    let from = folder(&manager, "from").await;

    from.move_children(temp.path().join("to").as_path().into())
        .await
        .unwrap();

    assert_eq!(fs::read_dir(temp.path().join("from")).unwrap().count(), 0);
    assert!(temp.path().join("to/a.txt").is_file());
    assert!(temp.path().join("to/sub/b.txt").is_file());
}

#[tokio::test]
async fn test_handles_for_same_path_are_independent() {
    let (temp, manager) = setup();
    write(temp.path(), "a.txt", "a");
    let mut first = file(&manager, "a.txt").await;
    let second = file(&manager, "a.txt").await;
    assert_eq!(first, second);

    first.rename("b.txt").await.unwrap();

    assert_ne!(first, second);
    assert_eq!(second.path(), temp.path().join("a.txt"));
    assert!(second.read().await.is_err());
}

#[tokio::test]
#[cfg(unix)]
async fn test_non_utf8_names_survive_moves_and_clones() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let (temp, manager) = setup();
    let raw = OsStr::from_bytes(b"f\xffo.txt");
    fs::create_dir_all(temp.path().join("src")).unwrap();
    fs::create_dir_all(temp.path().join("dst")).unwrap();
    fs::write(temp.path().join("src").join(raw), "raw").unwrap();

    let src = folder(&manager, "src").await;
    let copy = src
        .clone_to(Some(temp.path().join("dst").as_path()), false)
        .await
        .unwrap();
    assert!(copy.path().join(raw).is_file());

    let mut original = file(&manager, temp.path().join("src").join(raw)).await;
    original.reparent(temp.path().join("dst").as_path().into()).await.unwrap();
    assert_eq!(original.path(), temp.path().join("dst").join(raw));
    assert_eq!(fs::read_to_string(temp.path().join("dst").join(raw)).unwrap(), "raw");

    // A collision needs an edited name, which a non UTF-8 name cannot give
    fs::write(temp.path().join("src").join(raw), "again").unwrap();
    let mut second = file(&manager, temp.path().join("src").join(raw)).await;
    let err = second
        .reparent(temp.path().join("dst").as_path().into())
        .await
        .unwrap_err();
    assert!(matches!(err, handlefs::HandleError::InvalidArgument(_)));
    assert!(temp.path().join("src").join(raw).is_file());
}

#[tokio::test]
#[cfg(unix)]
async fn test_special_entries_are_skipped() {
    use std::os::unix::net::UnixListener;

    let (temp, manager) = setup();
    write(temp.path(), "sock/a.txt", "a");
    write(temp.path(), "sock/inner/b.txt", "b");
    let _listener = UnixListener::bind(temp.path().join("sock/inner/server.sock")).unwrap();
    let sock = folder(&manager, "sock").await;

    assert!(manager.lookup("sock/inner/server.sock").await.unwrap().is_none());

    let descendants = sock.descendants(None).await.unwrap();
    assert_eq!(sorted_names(&descendants), vec!["a.txt", "b.txt", "inner"]);

    let inner = folder(&manager, "sock/inner").await;
    assert_eq!(sorted_names(&inner.children(None).await.unwrap()), vec!["b.txt"]);
}
