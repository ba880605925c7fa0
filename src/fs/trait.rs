//! FileSystem trait definition

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};

/// Metadata about a filesystem entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metadata {
    pub len: u64,
    pub kind: EntryKind,
}

/// Kind of filesystem entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    /// Anything that is neither a regular file nor a directory
    Other,
}

impl Metadata {
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// A directory entry returned by read_dir
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub path: PathBuf,
    pub name: String,
}

impl DirEntry {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> &str {
        &self.name
    }
}

/// Primitive filesystem calls consumed by the handle layer.
///
/// Implementations follow POSIX semantics: `write` truncates, `create_dir`
/// creates a single level and fails if the entry exists, `rename` replaces a
/// destination of the same kind, and `remove_all` is recursive and succeeds
/// when the path is already gone.
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Get metadata, following symlinks
    async fn metadata(&self, path: &Path) -> io::Result<Metadata>;

    /// Read a whole file as UTF-8
    async fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write a whole file, creating or truncating it
    async fn write(&self, path: &Path, contents: &str) -> io::Result<()>;

    /// Create a single directory level
    async fn create_dir(&self, path: &Path) -> io::Result<()>;

    /// Move an entry
    async fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Remove an entry and everything below it
    async fn remove_all(&self, path: &Path) -> io::Result<()>;

    /// List one directory level
    async fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>>;

    /// Directory relative paths are resolved against
    fn current_dir(&self) -> io::Result<PathBuf>;

    /// Check if a path exists. Any metadata failure counts as absent.
    async fn exists(&self, path: &Path) -> bool {
        self.metadata(path).await.is_ok()
    }
}
