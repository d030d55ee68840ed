use std::{io, path::Path};

use serde::{Deserialize, Serialize};

/// The storage key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "koas-tracker-data";

/// Configuration for the tracker's data store.
///
/// Stored as TOML next to the persisted data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// The key under which the whole data graph is persisted.
    storage_key: String,

    /// The maximum number of activity log entries to retain.
    ///
    /// The newest entries are kept. If this is `None`, the log grows without
    /// bound.
    pub activity_log_limit: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            activity_log_limit: None,
        }
    }
}

/// Errors raised while reading or writing a [`Config`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read or written.
    #[error("failed to access config file: {0}")]
    Io(#[from] io::Error),
    /// The file is not valid configuration TOML.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    /// The configuration could not be rendered as TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Loads the configuration, falling back to the defaults if the file is
    /// missing or invalid.
    #[must_use]
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            tracing::debug!("Failed to load config from {}: {e}", path.display());
            Self::default()
        })
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the key under which the data graph is persisted.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Sets the storage key. Blank keys are ignored.
    ///
    /// Returns `true` if the key was changed.
    pub fn set_storage_key(&mut self, key: &str) -> bool {
        let key = key.trim();
        if key.is_empty() || key == self.storage_key {
            false
        } else {
            self.storage_key = key.to_string();
            true
        }
    }
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_storage_key")]
        storage_key: String,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        activity_log_limit: Option<usize>,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                storage_key,
                activity_log_limit,
            } => Self {
                storage_key,
                activity_log_limit,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            storage_key: config.storage_key,
            activity_log_limit: config.activity_log_limit,
        }
    }
}
