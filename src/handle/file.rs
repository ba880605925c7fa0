use super::sealed::Sealed;
use super::{Entry, Location};
use crate::codec::Codec;
use crate::error::{HandleError, Result};
use crate::manager::FileManager;
use crate::path::{extension_of, split_name};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Handle to a regular file
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct File {
    location: Location,
}

impl File {
    pub(crate) fn at(manager: FileManager, path: PathBuf) -> Self {
        Self {
            location: Location::new(manager, path),
        }
    }

    /// Text after the final dot of the name; empty when there is none or the
    /// only dot leads the name (`.gitignore`)
    pub fn extension(&self) -> String {
        extension_of(&self.name()).to_string()
    }

    /// Codec [`read_object`](Self::read_object) and
    /// [`write_object`](Self::write_object) use for this file
    pub fn codec(&self) -> Codec {
        Codec::for_path(self.path())
    }

    pub async fn read(&self) -> Result<String> {
        self.location
            .fs()
            .read_to_string(self.path())
            .await
            .map_err(|e| HandleError::io(self.path(), e))
    }

    /// Replaces the whole file content
    pub async fn write(&self, content: &str) -> Result<()> {
        debug!(path = %self.path().display(), bytes = content.len(), "Writing file");
        self.location
            .fs()
            .write(self.path(), content)
            .await
            .map_err(|e| HandleError::io(self.path(), e))
    }

    pub async fn read_object<T: DeserializeOwned>(&self) -> Result<T> {
        let codec = self.codec();
        let text = self.read().await?;
        codec.decode(&text).map_err(|message| HandleError::Parse {
            path: self.path().to_path_buf(),
            format: codec.name(),
            message,
        })
    }

    pub async fn write_object<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let codec = self.codec();
        let text = codec
            .encode(value)
            .map_err(|message| HandleError::Serialization {
                path: self.path().to_path_buf(),
                format: codec.name(),
                message,
            })?;
        self.write(&text).await
    }
}

#[async_trait]
impl Sealed for File {
    fn location_mut(&mut self) -> &mut Location {
        &mut self.location
    }

    fn suffixed_name(&self, suffix: &str) -> Result<String> {
        let (stem, ext) = split_name(self.location.utf8_name()?);
        Ok(format!("{}{}{}", stem, suffix, ext))
    }

    async fn clear_destination(&self, _destination: &Path) -> Result<()> {
        // The write in clone_at supersedes whatever file is there
        Ok(())
    }

    async fn clone_at(&self, destination: PathBuf) -> Result<Self> {
        let content = self.read().await?;
        self.location
            .fs()
            .write(&destination, &content)
            .await
            .map_err(|e| HandleError::io(&destination, e))?;
        Ok(File::at(self.location.manager().clone(), destination))
    }
}

impl Entry for File {
    fn location(&self) -> &Location {
        &self.location
    }
}
