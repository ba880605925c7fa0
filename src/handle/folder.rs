use super::sealed::Sealed;
use super::{Entry, File, Handle, Location, ParentRef};
use crate::error::{HandleError, Result};
use crate::manager::FileManager;
use crate::path::ends_with_suffix;
use crate::traversal::list_nested;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Handle to a directory. Children are read from disk on every call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Folder {
    location: Location,
}

fn keep(path: &Path, filter: Option<&str>) -> bool {
    filter.map_or(true, |suffix| ends_with_suffix(path, suffix))
}

impl Folder {
    pub(crate) fn at(manager: FileManager, path: PathBuf) -> Self {
        Self {
            location: Location::new(manager, path),
        }
    }

    fn manager(&self) -> &FileManager {
        self.location.manager()
    }

    /// Direct children, optionally only those whose full path ends with
    /// `filter`.
    ///
    /// The filter is a plain suffix match on the path, so `".ts"` also keeps
    /// a directory named `types.ts`. Entries that vanish mid-listing or are
    /// neither file nor directory are skipped.
    pub async fn children(&self, filter: Option<&str>) -> Result<Vec<Handle>> {
        let entries = self
            .location
            .fs()
            .read_dir(self.path())
            .await
            .map_err(|e| HandleError::io(self.path(), e))?;

        let mut children = Vec::with_capacity(entries.len());
        for entry in entries {
            if !keep(entry.path(), filter) {
                continue;
            }
            match self.manager().lookup(entry.path()).await? {
                Some(handle) => children.push(handle),
                None => debug!(path = %entry.path().display(), "Skipping unresolvable entry"),
            }
        }

        Ok(children)
    }

    /// Every nested file and folder, depth-first, with the same suffix
    /// filter and skip rules as [`children`](Self::children).
    ///
    /// Subdirectories that cannot be listed are left out rather than
    /// failing the call.
    pub async fn descendants(&self, filter: Option<&str>) -> Result<Vec<Handle>> {
        let paths = list_nested(self.location.fs(), self.path(), filter).await;

        let mut descendants = Vec::with_capacity(paths.len());
        for path in paths.iter().filter(|p| keep(p, filter)) {
            if let Some(handle) = self.manager().lookup(path).await? {
                descendants.push(handle);
            }
        }

        Ok(descendants)
    }

    pub async fn find_first_folder(&self, name: &str) -> Result<Option<Folder>> {
        self.manager().get_folder(self.path().join(name)).await
    }

    pub async fn find_first_file(&self, name: &str) -> Result<Option<File>> {
        self.manager().get_file(self.path().join(name)).await
    }

    /// Destroys every direct child
    pub async fn empty(&self) -> Result<()> {
        debug!(path = %self.path().display(), "Emptying folder");
        for child in self.children(None).await? {
            child.destroy().await?;
        }
        Ok(())
    }

    /// Reparents each direct child in listing order.
    ///
    /// Stops at the first failure; children moved before it stay moved.
    pub async fn move_children(&self, new_parent: ParentRef<'_>) -> Result<()> {
        for mut child in self.children(None).await? {
            child.reparent(new_parent).await?;
        }
        Ok(())
    }

    fn reject_nested(&self, destination: &Path) -> Result<()> {
        if destination.starts_with(self.path()) {
            return Err(HandleError::InvalidArgument(format!(
                "Cannot clone {} into itself ({})",
                self.path().display(),
                destination.display()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Sealed for Folder {
    fn location_mut(&mut self) -> &mut Location {
        &mut self.location
    }

    fn suffixed_name(&self, suffix: &str) -> Result<String> {
        Ok(format!("{}{}", self.location.utf8_name()?, suffix))
    }

    async fn clear_destination(&self, destination: &Path) -> Result<()> {
        self.reject_nested(destination)?;
        if self.path().starts_with(destination) {
            return Err(HandleError::InvalidArgument(format!(
                "Overwriting {} would remove the source {}",
                destination.display(),
                self.path().display()
            )));
        }

        debug!(path = %destination.display(), "Removing existing clone target");
        self.location
            .fs()
            .remove_all(destination)
            .await
            .map_err(|e| HandleError::io(destination, e))
    }

    async fn clone_at(&self, destination: PathBuf) -> Result<Self> {
        self.reject_nested(&destination)?;

        let created = self.manager().create_folder(&destination).await?;
        for child in self.children(None).await? {
            let child_destination = created.path().join(child.location().file_name());
            child.clone_at(child_destination).await?;
        }

        Ok(created)
    }
}

impl Entry for Folder {
    fn location(&self) -> &Location {
        &self.location
    }
}
