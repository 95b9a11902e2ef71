use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Switches for the individual repairs performed on a record.
///
/// Loaded from TOML:
///
/// ```toml
/// patch_components = true
/// patch_signature = true
/// restore_private_fields = false
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordFixConfig {
    /// Rebuild the record component list when it was stripped.
    #[serde(default = "default_true")]
    pub patch_components: bool,

    /// Declare every referenced type variable in a rebuilt class signature.
    #[serde(default = "default_true")]
    pub patch_signature: bool,

    /// Reset component fields whose visibility was widened back to `private`.
    ///
    /// Off by default, and only applied together with `patch_components`. When
    /// enabled this is the only change made to fields.
    #[serde(default)]
    pub restore_private_fields: bool,
}

fn default_true() -> bool {
    true
}

impl Default for RecordFixConfig {
    fn default() -> Self {
        Self {
            patch_components: true,
            patch_signature: true,
            restore_private_fields: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Toml(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // Keep the message only; the default `Display` repeats a source snippet.
        ConfigError::Toml(err.message().to_string())
    }
}

impl RecordFixConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}
