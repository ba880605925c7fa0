//! Filesystem gateway: kind-checked lookups and create-if-absent factories

use crate::config::{ConfigError, HandlefsConfig};
use crate::error::{is_not_found, HandleError, Result};
use crate::fs::{FileSystem, Metadata, RealFileSystem};
use crate::handle::{File, Folder, Handle};
use crate::path::resolve;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Entry point for obtaining handles.
///
/// Cheap to clone; every handle carries a clone of the manager it came from
/// and routes its own filesystem calls through it.
#[derive(Clone)]
pub struct FileManager {
    fs: Arc<dyn FileSystem>,
    base_dir: Option<PathBuf>,
}

impl fmt::Debug for FileManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileManager")
            .field("base_dir", &self.base_dir)
            .finish_non_exhaustive()
    }
}

impl Default for FileManager {
    fn default() -> Self {
        Self::new(Arc::new(RealFileSystem::new()))
    }
}

impl FileManager {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs, base_dir: None }
    }

    /// Relative paths resolve against `base_dir` instead of the backend's
    /// working directory
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    /// Builds a manager on the host filesystem from validated configuration
    pub fn from_config(config: &HandlefsConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;

        let manager = Self::default();
        Ok(match &config.base_dir {
            Some(base_dir) => manager.with_base_dir(base_dir.clone()),
            None => manager,
        })
    }

    pub fn fs(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }

    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    /// Absolute, lexically normalized form of `path`
    pub fn resolve(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path.as_ref();
        if path.is_absolute() {
            return Ok(resolve(Path::new("/"), path));
        }

        let base = match &self.base_dir {
            Some(base) => base.clone(),
            None => self
                .fs
                .current_dir()
                .map_err(|e| HandleError::io(path, e))?,
        };
        Ok(resolve(&base, path))
    }

    /// Metadata for `path`, or `None` when nothing is there
    pub async fn stat(&self, path: impl AsRef<Path>) -> Result<Option<Metadata>> {
        let path = self.resolve(path)?;
        match self.fs.metadata(&path).await {
            Ok(meta) => Ok(Some(meta)),
            Err(e) if is_not_found(&e) => Ok(None),
            Err(e) => Err(HandleError::io(&path, e)),
        }
    }

    pub async fn exists(&self, path: impl AsRef<Path>) -> bool {
        match self.resolve(path) {
            Ok(path) => self.fs.exists(&path).await,
            Err(_) => false,
        }
    }

    /// Folder handle for `path` if a directory exists there
    pub async fn get_folder(&self, path: impl AsRef<Path>) -> Result<Option<Folder>> {
        let path = self.resolve(path)?;
        Ok(match self.stat(&path).await? {
            Some(meta) if meta.is_dir() => Some(Folder::at(self.clone(), path)),
            _ => None,
        })
    }

    /// File handle for `path` if a regular file exists there
    pub async fn get_file(&self, path: impl AsRef<Path>) -> Result<Option<File>> {
        let path = self.resolve(path)?;
        Ok(match self.stat(&path).await? {
            Some(meta) if meta.is_file() => Some(File::at(self.clone(), path)),
            _ => None,
        })
    }

    /// Handle of whichever kind lives at `path`
    pub async fn lookup(&self, path: impl AsRef<Path>) -> Result<Option<Handle>> {
        let path = self.resolve(path)?;
        Ok(match self.stat(&path).await? {
            Some(meta) if meta.is_dir() => Some(Handle::Folder(Folder::at(self.clone(), path))),
            Some(meta) if meta.is_file() => Some(Handle::File(File::at(self.clone(), path))),
            _ => None,
        })
    }

    /// Returns the folder at `path`, creating a single directory level if
    /// nothing is there yet
    pub async fn create_folder(&self, path: impl AsRef<Path>) -> Result<Folder> {
        let path = self.resolve(path)?;
        if let Some(folder) = self.get_folder(&path).await? {
            return Ok(folder);
        }

        debug!(path = %path.display(), "Creating folder");
        self.fs
            .create_dir(&path)
            .await
            .map_err(|e| HandleError::io(&path, e))?;
        Ok(Folder::at(self.clone(), path))
    }

    /// Returns the file at `path` unchanged if it exists, otherwise writes
    /// a new one holding `content`
    pub async fn create_file(&self, path: impl AsRef<Path>, content: &str) -> Result<File> {
        let path = self.resolve(path)?;
        if let Some(file) = self.get_file(&path).await? {
            return Ok(file);
        }

        debug!(path = %path.display(), "Creating file");
        self.fs
            .write(&path, content)
            .await
            .map_err(|e| HandleError::io(&path, e))?;
        Ok(File::at(self.clone(), path))
    }
}
