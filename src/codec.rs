//! Structured-text codec selection for file contents

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Structured format a file's contents are read and written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    Json,
    Toml,
}

impl Codec {
    /// `.toml` selects TOML, every other extension (or none) selects JSON
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Codec::Toml,
            _ => Codec::Json,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Codec::Json => "JSON",
            Codec::Toml => "TOML",
        }
    }

    pub fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, String> {
        match self {
            Codec::Json => serde_json::to_string(value).map_err(|e| e.to_string()),
            Codec::Toml => toml::to_string(value).map_err(|e| e.to_string()),
        }
    }

    pub fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T, String> {
        match self {
            Codec::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
            Codec::Toml => toml::from_str(text).map_err(|e| e.to_string()),
        }
    }
}
