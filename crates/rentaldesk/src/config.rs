//! Configuration management for rentaldesk.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::store::Schema;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default configuration directory name.
const CONFIG_DIR_NAME: &str = "rentaldesk";

/// Default rented cars file name.
const RENTED_FILE_NAME: &str = "mobil_dipakai.csv";

/// Default available cars file name.
const AVAILABLE_FILE_NAME: &str = "mobil_tersedia.csv";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `RENTALDESK_`, sections split on `__`)
/// 2. TOML config file at `~/.config/rentaldesk/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Data file layout.
    pub schema: Schema,
    /// Desk behaviour.
    pub desk: DeskConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the data files.
    /// Defaults to the directory of the running executable.
    pub data_dir: Option<PathBuf>,
    /// Rented cars file, relative to `data_dir` unless absolute.
    pub rented_file: PathBuf,
    /// Available cars file, relative to `data_dir` unless absolute.
    pub available_file: PathBuf,
    /// Abort loading on a malformed row instead of skipping it.
    pub strict_rows: bool,
}

/// Desk behaviour configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeskConfig {
    /// Write the available file after a car is returned.
    pub persist_returns: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None, // Will be resolved to default at runtime
            rented_file: PathBuf::from(RENTED_FILE_NAME),
            available_file: PathBuf::from(AVAILABLE_FILE_NAME),
            strict_rows: false,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("RENTALDESK_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory: wherever the program lives.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.storage.rented_file.as_os_str().is_empty() {
            return Err(Error::ConfigValidation {
                message: "rented_file must not be empty".to_string(),
            });
        }

        if self.storage.available_file.as_os_str().is_empty() {
            return Err(Error::ConfigValidation {
                message: "available_file must not be empty".to_string(),
            });
        }

        if self.rented_path() == self.available_path() {
            return Err(Error::ConfigValidation {
                message: format!(
                    "rented_file and available_file both resolve to {}",
                    self.rented_path().display()
                ),
            });
        }

        Ok(())
    }

    /// Get the data directory, resolving defaults if not set.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .unwrap_or_else(Self::default_data_dir)
    }

    /// Get the full path of the rented cars file.
    #[must_use]
    pub fn rented_path(&self) -> PathBuf {
        self.data_dir().join(&self.storage.rented_file)
    }

    /// Get the full path of the available cars file.
    #[must_use]
    pub fn available_path(&self) -> PathBuf {
        self.data_dir().join(&self.storage.available_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.schema.car_type_column);
        assert!(!config.schema.available_only_at_load);
        assert!(!config.storage.strict_rows);
        assert!(!config.desk.persist_returns);
    }

    #[test]
    fn test_default_storage_config() {
        let storage = StorageConfig::default();

        assert!(storage.data_dir.is_none());
        assert_eq!(storage.rented_file, PathBuf::from("mobil_dipakai.csv"));
        assert_eq!(storage.available_file, PathBuf::from("mobil_tersedia.csv"));
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_file_name() {
        let mut config = Config::default();
        config.storage.rented_file = PathBuf::new();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("rented_file"));
    }

    #[test]
    fn test_validate_same_file() {
        let mut config = Config::default();
        config.storage.available_file = PathBuf::from("mobil_dipakai.csv");

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("both resolve"));
    }

    #[test]
    fn test_data_paths_relative_to_data_dir() {
        let mut config = Config::default();
        config.storage.data_dir = Some(PathBuf::from("/srv/rental"));

        assert_eq!(
            config.rented_path(),
            PathBuf::from("/srv/rental/mobil_dipakai.csv")
        );
        assert_eq!(
            config.available_path(),
            PathBuf::from("/srv/rental/mobil_tersedia.csv")
        );
    }

    #[test]
    fn test_absolute_file_overrides_data_dir() {
        let mut config = Config::default();
        config.storage.data_dir = Some(PathBuf::from("/srv/rental"));
        config.storage.rented_file = PathBuf::from("/mnt/shared/rented.csv");

        assert_eq!(config.rented_path(), PathBuf::from("/mnt/shared/rented.csv"));
    }

    #[test]
    fn test_default_data_dir_is_executable_dir() {
        let exe = std::env::current_exe().unwrap();
        assert_eq!(Config::default_data_dir(), exe.parent().unwrap());
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("rentaldesk"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        // Loading from a nonexistent path should work (uses defaults)
        let result = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")));
        assert!(result.is_ok());
    }

    #[test]
    fn test_load_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[storage]
data_dir = "/srv/rental"
strict_rows = true

[schema]
car_type_column = false

[desk]
persist_returns = true
"#,
        )
        .unwrap();

        let config = Config::load_from(Some(path)).unwrap();
        assert_eq!(config.storage.data_dir, Some(PathBuf::from("/srv/rental")));
        assert!(config.storage.strict_rows);
        assert!(!config.schema.car_type_column);
        assert!(config.desk.persist_returns);
        assert_eq!(config.storage.rented_file, PathBuf::from("mobil_dipakai.csv"));
    }

    #[test]
    fn test_config_serialize() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("rented_file"));
        assert!(json.contains("car_type_column"));
        assert!(json.contains("persist_returns"));
    }

    #[test]
    fn test_config_clone() {
        let config = Config::default();
        let cloned = config.clone();
        assert_eq!(config, cloned);
    }
}
