use super::{DirEntry, EntryKind, FileSystem, Metadata};
use crate::path::resolve;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Clone, PartialEq, Eq)]
enum MemoryEntry {
    File(String),
    Directory,
}

impl MemoryEntry {
    fn kind(&self) -> EntryKind {
        match self {
            MemoryEntry::File(_) => EntryKind::File,
            MemoryEntry::Directory => EntryKind::Directory,
        }
    }
}

type Tree = BTreeMap<PathBuf, MemoryEntry>;

/// In-memory filesystem with the same semantics as [`RealFileSystem`].
///
/// Listing order is the lexical order of entry names.
///
/// [`RealFileSystem`]: super::RealFileSystem
pub struct MemoryFileSystem {
    entries: RwLock<Tree>,
    root: PathBuf,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::with_root(PathBuf::from("/mock"))
    }

    /// Creates an empty filesystem whose working directory is `root`
    pub fn with_root(root: impl AsRef<Path>) -> Self {
        let root = resolve(Path::new("/"), root.as_ref());
        let mut entries = Tree::new();
        ensure_dirs(&mut entries, &root);

        Self {
            entries: RwLock::new(entries),
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Adds a file, creating missing parent directories
    pub fn add_file(&self, path: impl AsRef<Path>, content: &str) {
        let path = self.normalize_path(path.as_ref());
        let mut entries = self.write_tree();

        if let Some(parent) = path.parent() {
            ensure_dirs(&mut entries, parent);
        }

        entries.insert(path, MemoryEntry::File(content.to_string()));
    }

    /// Adds a directory, creating missing parent directories
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = self.normalize_path(path.as_ref());
        ensure_dirs(&mut self.write_tree(), &path);
    }

    /// All paths currently stored, in lexical order
    pub fn paths(&self) -> Vec<PathBuf> {
        self.read_tree().keys().cloned().collect()
    }

    fn normalize_path(&self, path: &Path) -> PathBuf {
        resolve(&self.root, path)
    }

    fn read_tree(&self) -> RwLockReadGuard<'_, Tree> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_tree(&self) -> RwLockWriteGuard<'_, Tree> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_dirs(entries: &mut Tree, path: &Path) {
    let mut current = PathBuf::new();
    for component in path.components() {
        current.push(component);
        entries
            .entry(current.clone())
            .or_insert(MemoryEntry::Directory);
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("No such file or directory: {}", path.display()),
    )
}

fn check_parent(entries: &Tree, path: &Path) -> io::Result<()> {
    let parent = match path.parent() {
        Some(parent) => parent,
        None => return Ok(()),
    };

    match entries.get(parent) {
        Some(MemoryEntry::Directory) => Ok(()),
        Some(MemoryEntry::File(_)) => Err(io::Error::new(
            io::ErrorKind::NotADirectory,
            format!("Not a directory: {}", parent.display()),
        )),
        None => Err(not_found(parent)),
    }
}

fn subtree(entries: &Tree, path: &Path) -> Vec<PathBuf> {
    entries
        .keys()
        .filter(|key| key.starts_with(path))
        .cloned()
        .collect()
}

#[async_trait]
impl FileSystem for MemoryFileSystem {
    async fn metadata(&self, path: &Path) -> io::Result<Metadata> {
        let path = self.normalize_path(path);
        let entries = self.read_tree();
        let entry = entries.get(&path).ok_or_else(|| not_found(&path))?;

        Ok(Metadata {
            len: match entry {
                MemoryEntry::File(content) => content.len() as u64,
                MemoryEntry::Directory => 0,
            },
            kind: entry.kind(),
        })
    }

    async fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let path = self.normalize_path(path);
        match self.read_tree().get(&path) {
            Some(MemoryEntry::File(content)) => Ok(content.clone()),
            Some(MemoryEntry::Directory) => Err(io::Error::new(
                io::ErrorKind::IsADirectory,
                format!("Is a directory: {}", path.display()),
            )),
            None => Err(not_found(&path)),
        }
    }

    async fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        let path = self.normalize_path(path);
        let mut entries = self.write_tree();
        check_parent(&entries, &path)?;

        if let Some(MemoryEntry::Directory) = entries.get(&path) {
            return Err(io::Error::new(
                io::ErrorKind::IsADirectory,
                format!("Is a directory: {}", path.display()),
            ));
        }

        entries.insert(path, MemoryEntry::File(contents.to_string()));
        Ok(())
    }

    async fn create_dir(&self, path: &Path) -> io::Result<()> {
        let path = self.normalize_path(path);
        let mut entries = self.write_tree();

        if entries.contains_key(&path) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("File exists: {}", path.display()),
            ));
        }
        check_parent(&entries, &path)?;

        entries.insert(path, MemoryEntry::Directory);
        Ok(())
    }

    async fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        let from = self.normalize_path(from);
        let to = self.normalize_path(to);
        let mut entries = self.write_tree();

        let source_kind = entries
            .get(&from)
            .map(MemoryEntry::kind)
            .ok_or_else(|| not_found(&from))?;
        if from == to {
            return Ok(());
        }
        check_parent(&entries, &to)?;

        if to.starts_with(&from) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "Cannot move {} into itself ({})",
                    from.display(),
                    to.display()
                ),
            ));
        }

        if let Some(existing) = entries.get(&to) {
            match (source_kind, existing.kind()) {
                (EntryKind::Directory, EntryKind::Directory) => {
                    if subtree(&entries, &to).len() > 1 {
                        return Err(io::Error::new(
                            io::ErrorKind::DirectoryNotEmpty,
                            format!("Directory not empty: {}", to.display()),
                        ));
                    }
                }
                (EntryKind::File, EntryKind::Directory) => {
                    return Err(io::Error::new(
                        io::ErrorKind::IsADirectory,
                        format!("Is a directory: {}", to.display()),
                    ));
                }
                (EntryKind::Directory, EntryKind::File) => {
                    return Err(io::Error::new(
                        io::ErrorKind::NotADirectory,
                        format!("Not a directory: {}", to.display()),
                    ));
                }
                _ => {}
            }
            entries.remove(&to);
        }

        for key in subtree(&entries, &from) {
            if let Some(entry) = entries.remove(&key) {
                let relative = key.strip_prefix(&from).unwrap_or(Path::new(""));
                let moved = if relative.as_os_str().is_empty() {
                    to.clone()
                } else {
                    to.join(relative)
                };
                entries.insert(moved, entry);
            }
        }

        Ok(())
    }

    async fn remove_all(&self, path: &Path) -> io::Result<()> {
        let path = self.normalize_path(path);
        let mut entries = self.write_tree();

        for key in subtree(&entries, &path) {
            entries.remove(&key);
        }

        Ok(())
    }

    async fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let path = self.normalize_path(path);
        let entries = self.read_tree();

        match entries.get(&path) {
            Some(MemoryEntry::Directory) => {}
            Some(MemoryEntry::File(_)) => {
                return Err(io::Error::new(
                    io::ErrorKind::NotADirectory,
                    format!("Not a directory: {}", path.display()),
                ))
            }
            None => return Err(not_found(&path)),
        }

        let children = entries
            .keys()
            .filter(|key| key.parent() == Some(path.as_path()))
            .map(|key| DirEntry {
                path: key.clone(),
                name: key
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default(),
            })
            .collect();

        Ok(children)
    }

    fn current_dir(&self) -> io::Result<PathBuf> {
        Ok(self.root.clone())
    }
}
