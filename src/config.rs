//! Configuration loading and management
//!
//! Handles parsing of `.tasktrack.toml` configuration files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::{Error, Result};
use crate::storage::DEFAULT_TASKS_FILE;

/// Name of the per-directory configuration file
pub const CONFIG_FILE: &str = ".tasktrack.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Storage-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backing file, relative to the directory holding the config
    #[serde(default = "default_file")]
    pub file: PathBuf,
}

fn default_file() -> PathBuf {
    PathBuf::from(DEFAULT_TASKS_FILE)
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            file: default_file(),
        }
    }
}

impl Config {
    /// Load configuration from a `.tasktrack.toml` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a directory, or return defaults
    pub fn load_from_dir(dir: &Path) -> Self {
        let config_path = dir.join(CONFIG_FILE);
        if !config_path.exists() {
            return Self::default();
        }
        match Self::load(&config_path) {
            Ok(config) => config,
            Err(err) => {
                warn!(path = %config_path.display(), error = %err, "ignoring invalid config");
                Self::default()
            }
        }
    }

    /// Resolve the backing file path.
    ///
    /// An explicit path (flag or environment) wins; otherwise the configured
    /// file is resolved against `dir`.
    pub fn tasks_file(&self, dir: &Path, explicit: Option<&Path>) -> PathBuf {
        match explicit {
            Some(path) => path.to_path_buf(),
            None => dir.join(&self.storage.file),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.storage.file.as_os_str().is_empty()
            || self.storage.file.to_string_lossy().trim().is_empty()
        {
            return Err(Error::InvalidConfig(
                "storage.file cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
