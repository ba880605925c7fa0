use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HandleError>;

#[derive(Error, Debug)]
pub enum HandleError {
    #[error("Path does not exist: {0}")]
    NotFound(PathBuf),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("I/O error on {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("Failed to parse {format} content of {path}: {message}")]
    Parse {
        path: PathBuf,
        format: &'static str,
        message: String,
    },

    #[error("Failed to serialize {format} content for {path}: {message}")]
    Serialization {
        path: PathBuf,
        format: &'static str,
        message: String,
    },
}

impl HandleError {
    pub(crate) fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        HandleError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Returns the underlying I/O error kind, if this is an I/O failure
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            HandleError::Io { source, .. } => Some(source.kind()),
            _ => None,
        }
    }
}

/// Whether an I/O error means the path simply isn't there
pub(crate) fn is_not_found(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}
