//! Persisted user configuration
//!
//! Stored as TOML, by default in `~/.sensorcli/config.toml`:
//!
//! ```toml
//! default_bus = 1
//! default_timeout_ms = 1000
//! retries = 3
//! log_level = "info"
//! output_format = "json"
//! mock_mode = true
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use sensorcli_core::DeviceConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::OutputFormat;

/// Directory under the home directory holding the config file
const CONFIG_DIR: &str = ".sensorcli";
/// Config file name
const CONFIG_FILE: &str = "config.toml";

/// Configuration file errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the file failed
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for this schema
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration could not be encoded
    #[error("failed to encode config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Unknown log level name
    #[error("invalid log level '{0}' (expected error, warn, info, debug or trace)")]
    InvalidLogLevel(String),
}

/// User configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Bus used when a command does not name one
    pub default_bus: i32,
    /// Per-operation timeout in milliseconds
    pub default_timeout_ms: u64,
    /// Retries after a failed operation
    pub retries: u32,
    /// Default log filter
    pub log_level: String,
    /// Default dump format
    pub output_format: OutputFormat,
    /// Use the in-memory backend
    pub mock_mode: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_bus: 1,
            default_timeout_ms: 1000,
            retries: 3,
            log_level: "info".to_string(),
            output_format: OutputFormat::Json,
            mock_mode: true,
        }
    }
}

/// Default config file location, if a home directory is known
pub fn default_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Resolve an explicit path or fall back to the default location
pub fn resolve_path(path: Option<&Path>) -> Option<PathBuf> {
    path.map(Path::to_path_buf).or_else(default_path)
}

impl AppConfig {
    /// Load the configuration
    ///
    /// A missing file is created with the defaults. Without a home directory
    /// and without an explicit path, the defaults are used as-is.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = resolve_path(path) else {
            log::warn!("No home directory found, using default configuration");
            return Ok(Self::default());
        };

        if !path.exists() {
            let config = Self::default();
            match config.save(&path) {
                Ok(()) => log::info!("Created default configuration at {}", path.display()),
                Err(e) => log::warn!("Could not create default configuration: {}", e),
            }
            return Ok(config);
        }

        Self::from_file(&path)
    }

    /// Load the configuration from an existing file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse a configuration; missing keys take their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.log_level_filter()?;
        Ok(config)
    }

    /// Write the configuration, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(io_err)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(io_err)
    }

    /// Per-operation timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms)
    }

    /// Device configuration for `address`, on `bus` or the default bus
    pub fn device_config(&self, bus: Option<i32>, address: u8) -> DeviceConfig {
        DeviceConfig::new(bus.unwrap_or(self.default_bus), address)
            .with_timeout(self.timeout())
            .with_retries(self.retries)
            .with_mock_mode(self.mock_mode)
    }

    /// Parsed log level
    pub fn log_level_filter(&self) -> Result<log::LevelFilter, ConfigError> {
        self.log_level
            .parse()
            .map_err(|_| ConfigError::InvalidLogLevel(self.log_level.clone()))
    }
}
