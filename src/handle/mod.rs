//! Typed handles identifying filesystem entries by path
//!
//! A handle is a lightweight, path-keyed reference: it owns no OS resources
//! and never caches anything about the entry besides where it is. Two
//! handles for the same path are independent values that compare equal.
//!
//! All shared operations live on the [`Entry`] trait, implemented by
//! [`File`], [`Folder`] and the closed [`Handle`] union of both.

mod file;
mod folder;

pub use file::File;
pub use folder::Folder;

use crate::error::{HandleError, Result};
use crate::fs::FileSystem;
use crate::manager::FileManager;
use crate::path::{is_plain_name, name_of, parent_of};
use async_trait::async_trait;
use std::ffi::OsStr;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolved identity of a handle: its path and the derived parent path
#[derive(Clone)]
pub struct Location {
    manager: FileManager,
    path: PathBuf,
    parent: PathBuf,
}

impl Location {
    pub(crate) fn new(manager: FileManager, path: PathBuf) -> Self {
        let parent = parent_of(&path);
        Self {
            manager,
            path,
            parent,
        }
    }

    pub fn manager(&self) -> &FileManager {
        &self.manager
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn parent_path(&self) -> &Path {
        &self.parent
    }

    /// Display name; lossy for names that are not UTF-8
    pub fn name(&self) -> String {
        name_of(&self.path)
    }

    /// Exact last segment, used whenever a new path is derived from this one
    pub(crate) fn file_name(&self) -> &OsStr {
        self.path.file_name().unwrap_or_default()
    }

    /// Name as UTF-8, for the collision renames that need to edit it
    pub(crate) fn utf8_name(&self) -> Result<&str> {
        self.file_name().to_str().ok_or_else(|| {
            HandleError::InvalidArgument(format!(
                "Cannot derive a new name from non UTF-8 name {}",
                self.path.display()
            ))
        })
    }

    pub(crate) fn fs(&self) -> &dyn FileSystem {
        self.manager.fs()
    }

    /// Moves the entry on disk, then updates both cached paths.
    /// Nothing changes in memory if the move fails.
    pub(crate) async fn move_to(&mut self, target: PathBuf) -> Result<()> {
        self.fs()
            .rename(&self.path, &target)
            .await
            .map_err(|e| HandleError::io(&self.path, e))?;

        self.parent = parent_of(&target);
        self.path = target;
        Ok(())
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Location").field(&self.path).finish()
    }
}

impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for Location {}

impl Hash for Location {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

/// Destination accepted by [`Entry::reparent`] and [`Folder::move_children`]
#[derive(Debug, Clone, Copy)]
pub enum ParentRef<'a> {
    /// Raw path; a folder must exist there
    Path(&'a Path),
    Folder(&'a Folder),
}

impl<'a> From<&'a Path> for ParentRef<'a> {
    fn from(path: &'a Path) -> Self {
        ParentRef::Path(path)
    }
}

impl<'a> From<&'a PathBuf> for ParentRef<'a> {
    fn from(path: &'a PathBuf) -> Self {
        ParentRef::Path(path.as_path())
    }
}

impl<'a> From<&'a str> for ParentRef<'a> {
    fn from(path: &'a str) -> Self {
        ParentRef::Path(Path::new(path))
    }
}

impl<'a> From<&'a Folder> for ParentRef<'a> {
    fn from(folder: &'a Folder) -> Self {
        ParentRef::Folder(folder)
    }
}

pub(crate) mod sealed {
    use super::Location;
    use crate::error::Result;
    use async_trait::async_trait;
    use std::path::{Path, PathBuf};

    /// Per-kind hooks behind the shared [`Entry`](super::Entry) operations
    #[async_trait]
    pub trait Sealed: Send + Sync + Sized {
        fn location_mut(&mut self) -> &mut Location;

        /// Current name with `suffix` attached the way this kind does it
        fn suffixed_name(&self, suffix: &str) -> Result<String>;

        /// Makes room at `destination` before an overwriting clone
        async fn clear_destination(&self, destination: &Path) -> Result<()>;

        /// Copies the entry to exactly `destination`
        async fn clone_at(&self, destination: PathBuf) -> Result<Self>;
    }
}

/// Operations shared by every handle kind
#[async_trait]
pub trait Entry: sealed::Sealed + Clone {
    fn location(&self) -> &Location;

    fn path(&self) -> &Path {
        self.location().path()
    }

    fn parent_path(&self) -> &Path {
        self.location().parent_path()
    }

    fn name(&self) -> String {
        self.location().name()
    }

    /// Folder handle for the containing directory. Not existence checked.
    fn parent(&self) -> Folder {
        let location = self.location();
        Folder::at(
            location.manager().clone(),
            location.parent_path().to_path_buf(),
        )
    }

    /// Renames the entry within its current parent.
    ///
    /// Does not look for an existing entry under `new_name`; the underlying
    /// rename decides what happens.
    async fn rename(&mut self, new_name: &str) -> Result<()> {
        if !is_plain_name(new_name) {
            return Err(HandleError::InvalidArgument(format!(
                "'{}' is not a valid entry name",
                new_name
            )));
        }

        let target = self.parent_path().join(new_name);
        if target == self.path() {
            return Ok(());
        }

        debug!(from = %self.path().display(), to = %target.display(), "Renaming");
        self.location_mut().move_to(target).await
    }

    /// Moves the entry into `new_parent`.
    ///
    /// While an entry with the same name already exists there, the entry is
    /// first renamed in place with a `" copy"` suffix, so repeated
    /// collisions give `a copy.txt`, `a copy copy.txt`, ... Moving into the
    /// current parent is a no-op.
    async fn reparent(&mut self, new_parent: ParentRef<'_>) -> Result<()> {
        let manager = self.location().manager().clone();
        let destination = match new_parent {
            ParentRef::Path(path) => match manager.get_folder(path).await? {
                Some(folder) => folder.path().to_path_buf(),
                None => return Err(HandleError::NotFound(manager.resolve(path)?)),
            },
            ParentRef::Folder(folder) => folder.path().to_path_buf(),
        };

        let mut target = destination.join(self.location().file_name());
        if target == self.path() {
            return Ok(());
        }

        while manager.exists(&target).await {
            let renamed = self.suffixed_name(" copy")?;
            debug!(target = %target.display(), renamed = %renamed, "Name taken in destination");
            self.rename(&renamed).await?;
            target = destination.join(self.location().file_name());
        }

        debug!(from = %self.path().display(), to = %target.display(), "Reparenting");
        self.location_mut().move_to(target).await
    }

    /// Removes the entry and everything below it. Succeeds if it is already
    /// gone.
    async fn destroy(self) -> Result<()> {
        let path = self.path().to_path_buf();
        debug!(path = %path.display(), "Destroying");
        self.location()
            .fs()
            .remove_all(&path)
            .await
            .map_err(|e| HandleError::io(&path, e))
    }

    /// Copies the entry into `target_dir` (default: its own parent) and
    /// returns a handle to the copy.
    ///
    /// Without `overwrite`, a taken name is replaced by the first free
    /// `name copyN` (files keep their extension last: `a copy1.txt`). With
    /// `overwrite`, a file copy writes over what is there and a folder copy
    /// removes the existing tree first.
    async fn clone_to(&self, target_dir: Option<&Path>, overwrite: bool) -> Result<Self> {
        let manager = self.location().manager();
        let directory = match target_dir {
            Some(dir) => manager.resolve(dir)?,
            None => self.parent_path().to_path_buf(),
        };

        let mut destination = directory.join(self.location().file_name());
        if manager.exists(&destination).await {
            if overwrite {
                self.clear_destination(&destination).await?;
            } else {
                let mut counter: u32 = 1;
                while manager.exists(&destination).await {
                    destination = directory.join(self.suffixed_name(&format!(" copy{}", counter))?);
                    counter += 1;
                }
            }
        }

        debug!(source = %self.path().display(), destination = %destination.display(), "Cloning");
        self.clone_at(destination).await
    }
}

/// Either kind of handle
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Handle {
    File(File),
    Folder(Folder),
}

impl Handle {
    pub fn is_file(&self) -> bool {
        matches!(self, Handle::File(_))
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Handle::Folder(_))
    }

    pub fn as_file(&self) -> Option<&File> {
        match self {
            Handle::File(file) => Some(file),
            Handle::Folder(_) => None,
        }
    }

    pub fn as_folder(&self) -> Option<&Folder> {
        match self {
            Handle::Folder(folder) => Some(folder),
            Handle::File(_) => None,
        }
    }

    pub fn into_file(self) -> Option<File> {
        match self {
            Handle::File(file) => Some(file),
            Handle::Folder(_) => None,
        }
    }

    pub fn into_folder(self) -> Option<Folder> {
        match self {
            Handle::Folder(folder) => Some(folder),
            Handle::File(_) => None,
        }
    }
}

impl From<File> for Handle {
    fn from(file: File) -> Self {
        Handle::File(file)
    }
}

impl From<Folder> for Handle {
    fn from(folder: Folder) -> Self {
        Handle::Folder(folder)
    }
}

#[async_trait]
impl sealed::Sealed for Handle {
    fn location_mut(&mut self) -> &mut Location {
        match self {
            Handle::File(file) => sealed::Sealed::location_mut(file),
            Handle::Folder(folder) => sealed::Sealed::location_mut(folder),
        }
    }

    fn suffixed_name(&self, suffix: &str) -> Result<String> {
        match self {
            Handle::File(file) => sealed::Sealed::suffixed_name(file, suffix),
            Handle::Folder(folder) => sealed::Sealed::suffixed_name(folder, suffix),
        }
    }

    async fn clear_destination(&self, destination: &Path) -> Result<()> {
        match self {
            Handle::File(file) => sealed::Sealed::clear_destination(file, destination).await,
            Handle::Folder(folder) => sealed::Sealed::clear_destination(folder, destination).await,
        }
    }

    async fn clone_at(&self, destination: PathBuf) -> Result<Self> {
        Ok(match self {
            Handle::File(file) => Handle::File(sealed::Sealed::clone_at(file, destination).await?),
            Handle::Folder(folder) => {
                Handle::Folder(sealed::Sealed::clone_at(folder, destination).await?)
            }
        })
    }
}

impl Entry for Handle {
    fn location(&self) -> &Location {
        match self {
            Handle::File(file) => file.location(),
            Handle::Folder(folder) => folder.location(),
        }
    }
}
