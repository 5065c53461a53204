//! JSON file configuration adapter (host).
//!
//! Implements [`ConfigPort`] by reading a [`DeviceConfig`] from a JSON file.
//! Fields left out of the file keep their defaults.

use std::path::{Path, PathBuf};

use log::debug;

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::DeviceConfig;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "IRRIGATOR_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "irrigator.json";

pub struct JsonFileConfig {
    path: PathBuf,
}

impl JsonFileConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path from `IRRIGATOR_CONFIG`, else `irrigator.json` in the working
    /// directory.
    pub fn from_env() -> Self {
        let path = std::env::var_os(CONFIG_ENV)
            .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigPort for JsonFileConfig {
    fn load(&self) -> Result<DeviceConfig, ConfigError> {
        let text = std::fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::NotFound,
            _ => ConfigError::IoError,
        })?;
        let config: DeviceConfig = serde_json::from_str(&text).map_err(|e| {
            debug!("{}: {}", self.path.display(), e);
            ConfigError::Corrupted
        })?;
        config.validate()?;
        Ok(config)
    }
}
