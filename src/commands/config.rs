//! Config command implementations

use std::path::{Path, PathBuf};

use crate::cli::OutputFormat;
use crate::config::{resolve_path, AppConfig};

/// Values given to `config set`; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct ConfigUpdate {
    pub default_bus: Option<i32>,
    pub default_timeout_ms: Option<u64>,
    pub retries: Option<u32>,
    pub log_level: Option<String>,
    pub output_format: Option<OutputFormat>,
    pub mock_mode: Option<bool>,
}

impl ConfigUpdate {
    /// Apply the given values; returns whether anything was specified
    pub fn apply(&self, config: &mut AppConfig) -> bool {
        let mut changed = false;
        if let Some(bus) = self.default_bus {
            config.default_bus = bus;
            changed = true;
        }
        if let Some(timeout) = self.default_timeout_ms {
            config.default_timeout_ms = timeout;
            changed = true;
        }
        if let Some(retries) = self.retries {
            config.retries = retries;
            changed = true;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
            changed = true;
        }
        if let Some(format) = self.output_format {
            config.output_format = format;
            changed = true;
        }
        if let Some(mock) = self.mock_mode {
            config.mock_mode = mock;
            changed = true;
        }
        changed
    }
}

fn config_path(path: Option<&Path>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    resolve_path(path).ok_or_else(|| "no home directory found; pass --config <path>".into())
}

/// Print the configuration
pub fn cmd_show(path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load(path)?;
    print_config(&config, resolve_path(path).as_deref());
    Ok(())
}

/// Update the given fields and save
pub fn cmd_set(
    path: Option<&Path>,
    update: &ConfigUpdate,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = config_path(path)?;
    let mut config = AppConfig::load(Some(&file))?;

    if !update.apply(&mut config) {
        return Err("nothing to set (see `sensorcli config set --help`)".into());
    }
    config.log_level_filter()?;
    if config.default_bus < 0 {
        return Err(format!("invalid bus number {}", config.default_bus).into());
    }

    config.save(&file)?;
    println!("Configuration updated");
    print_config(&config, Some(&file));
    Ok(())
}

/// Overwrite the configuration with the defaults
pub fn cmd_reset(path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let file = config_path(path)?;
    let config = AppConfig::default();
    config.save(&file)?;
    println!("Configuration reset to defaults");
    print_config(&config, Some(&file));
    Ok(())
}

fn print_config(config: &AppConfig, path: Option<&Path>) {
    println!("Current configuration:");
    println!("  Default bus:     {}", config.default_bus);
    println!("  Default timeout: {} ms", config.default_timeout_ms);
    println!("  Retries:         {}", config.retries);
    println!("  Log level:       {}", config.log_level);
    println!("  Output format:   {:?}", config.output_format);
    println!("  Mock mode:       {}", config.mock_mode);
    if let Some(path) = path {
        println!();
        println!("Config file: {}", path.display());
    }
}
