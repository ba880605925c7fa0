//! Configuration for handlefs
//!
//! Settings are loaded from environment variables with defaults.
//!
//! # Environment Variables
//!
//! - `HANDLEFS_BASE_DIR`: Directory relative paths resolve against - default: process working directory
//! - `HANDLEFS_LOG_LEVEL`: Logging level - default: "info"
//! - `HANDLEFS_LOG_JSON`: JSON log output (true|false) - default: "false"
//!
//! # Example
//!
//! ```no_run
//! use handlefs::{FileManager, HandlefsConfig};
//!
//! let config = HandlefsConfig::default();
//! config.validate().expect("Invalid configuration");
//!
//! let manager = FileManager::from_config(&config).expect("Invalid configuration");
//! ```

use crate::util::logging::{parse_level, LoggingConfig};
use std::env;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_LOG_JSON: bool = false;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlefsConfig {
    /// Base for resolving relative paths; `None` uses the working directory
    pub base_dir: Option<PathBuf>,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Emit logs as JSON
    pub log_json: bool,
}

impl Default for HandlefsConfig {
    /// Loads from `HANDLEFS_*` environment variables, falling back to
    /// defaults for anything unset or unparsable
    fn default() -> Self {
        let base_dir = env::var("HANDLEFS_BASE_DIR")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let log_level = env::var("HANDLEFS_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        let log_json = env::var("HANDLEFS_LOG_JSON")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(DEFAULT_LOG_JSON);

        Self {
            base_dir,
            log_level,
            log_json,
        }
    }
}

impl HandlefsConfig {
    /// Strict variant of [`Default`]: unparsable values are errors
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(raw) = env::var("HANDLEFS_LOG_JSON") {
            config.log_json = raw.parse::<bool>().map_err(|e| ConfigError::ParseError {
                field: "HANDLEFS_LOG_JSON".to_string(),
                error: e.to_string(),
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks that:
    /// - The base directory, if set, is absolute
    /// - Log level is valid
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(base_dir) = &self.base_dir {
            if !base_dir.is_absolute() {
                return Err(ConfigError::ValidationFailed(format!(
                    "Base directory must be absolute: {}",
                    base_dir.display()
                )));
            }
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            level: parse_level(&self.log_level),
            use_json: self.log_json,
        }
    }
}

impl fmt::Display for HandlefsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Handlefs Configuration:")?;
        match &self.base_dir {
            Some(dir) => writeln!(f, "  Base Dir: {}", dir.display())?,
            None => writeln!(f, "  Base Dir: (working directory)")?,
        }
        writeln!(f, "  Log Level: {}", self.log_level)?;
        writeln!(f, "  Log JSON: {}", self.log_json)?;
        Ok(())
    }
}
