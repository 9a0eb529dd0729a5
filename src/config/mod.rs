//! Configuration management for keyring
//!
//! Supports loading configuration from:
//! - Built-in defaults
//! - Config file (keyring.toml)
//! - Environment variables (KEYRING_*)

use crate::errors::{KeyringError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Storage configuration
    pub storage: StorageConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path to the keystore buffer file
    pub keystore_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            keystore_path: PathBuf::from("./data/keystore.bin"),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (json, pretty)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "pretty".to_string(),
        }
    }
}

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: &[&str] = &["pretty", "json"];

impl Config {
    /// Load configuration from file and environment
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let defaults = config::Config::try_from(&Config::default())
            .map_err(|e| KeyringError::ConfigError(e.to_string()))?;
        let mut builder = config::Config::builder().add_source(defaults);

        // Load from file if specified
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path).required(true));
        } else {
            builder = builder.add_source(config::File::with_name("keyring").required(false));
        }

        // Load from environment (KEYRING_STORAGE__KEYSTORE_PATH, etc.)
        builder = builder.add_source(
            config::Environment::with_prefix("KEYRING")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| KeyringError::ConfigError(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| KeyringError::ConfigError(e.to_string()))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.storage.keystore_path.as_os_str().is_empty() {
            return Err(KeyringError::ConfigError(
                "storage.keystore_path must not be empty".to_string(),
            ));
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(KeyringError::ConfigError(format!(
                "Unknown log level: {}",
                self.logging.level
            )));
        }

        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(KeyringError::ConfigError(format!(
                "Unknown log format: {}",
                self.logging.format
            )));
        }

        if !self.storage.keystore_path.exists() {
            info!(
                "Keystore file does not exist yet: {:?}",
                self.storage.keystore_path
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.storage.keystore_path, PathBuf::from("./data/keystore.bin"));
        assert_eq!(config.logging.format, "pretty");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("keyring.toml");
        fs::write(
            &path,
            "[storage]\nkeystore_path = \"/tmp/custom.bin\"\n\n[logging]\nlevel = \"debug\"\nformat = \"json\"\n",
        )
        .unwrap();

        let config = Config::load(path.to_str()).unwrap();
        assert_eq!(config.storage.keystore_path, PathBuf::from("/tmp/custom.bin"));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(matches!(
            Config::load(path.to_str()),
            Err(KeyringError::ConfigError(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.storage.keystore_path = PathBuf::new();
        assert!(config.validate().is_err());
    }
}
