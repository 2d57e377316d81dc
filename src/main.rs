//! sensorcli - I2C sensor debugging tool
//!
//! Scans a bus, reads and writes device registers, and dumps register ranges
//! as JSON, CSV or a hex report.
//!
//! # Architecture
//!
//! Devices are opened through `sensorcli-bus`, which validates the address
//! and bus, picks a backend (the in-memory mock when no hardware transport is
//! available), and hands back a `DeviceHandle`. Reading commands opt in to
//! the configured timeout and retry budget; writes reach the device once.

mod cli;
mod commands;
mod config;
mod output;

use clap::Parser;
use cli::{Cli, Commands, ConfigCommands};
use commands::config::ConfigUpdate;
use config::AppConfig;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match &cli.command {
        // Config commands must work even when the file is broken
        Commands::Config(subcmd) => {
            init_logger(cli.verbose, "info");
            run_config_command(subcmd, config_path)
        }
        Commands::ListBackends => {
            init_logger(cli.verbose, "info");
            commands::list_backends();
            Ok(())
        }
        Commands::Scan { bus } => {
            let app = load_config(cli.verbose, config_path)?;
            commands::run_scan(&app, *bus)?;
            Ok(())
        }
        Commands::Read {
            addr,
            reg,
            count,
            bus,
        } => {
            let app = load_config(cli.verbose, config_path)?;
            commands::run_read(&app, *bus, *addr, *reg, *count)
        }
        Commands::Write {
            addr,
            reg,
            value,
            data,
            bus,
        } => {
            let app = load_config(cli.verbose, config_path)?;
            commands::run_write(&app, *bus, *addr, *reg, *value, data)
        }
        Commands::Dump {
            addr,
            reg,
            count,
            format,
            output,
            bus,
        } => {
            let app = load_config(cli.verbose, config_path)?;
            commands::run_dump(&app, *bus, *addr, *reg, *count, *format, output.as_deref())
        }
    }
}

/// Load the configuration and start logging at its level
fn load_config(
    verbose: u8,
    path: Option<&std::path::Path>,
) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let app = AppConfig::load(path)?;
    init_logger(verbose, &app.log_level);

    log::debug!(
        "Using bus {} (timeout {} ms, {} retries, mock mode {})",
        app.default_bus,
        app.default_timeout_ms,
        app.retries,
        app.mock_mode
    );

    Ok(app)
}

fn init_logger(verbose: u8, default_level: &str) {
    // Set log level based on verbosity
    let level = match verbose {
        0 => default_level, // configured default
        1 => "debug",
        _ => "trace",
    };

    // A logger that is already installed keeps its filter
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .try_init();
}

fn run_config_command(
    subcmd: &ConfigCommands,
    path: Option<&std::path::Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    match subcmd {
        ConfigCommands::Show => commands::config::cmd_show(path),
        ConfigCommands::Set {
            default_bus,
            default_timeout,
            retries,
            log_level,
            output_format,
            mock_mode,
        } => {
            let update = ConfigUpdate {
                default_bus: *default_bus,
                default_timeout_ms: *default_timeout,
                retries: *retries,
                log_level: log_level.clone(),
                output_format: *output_format,
                mock_mode: *mock_mode,
            };
            commands::config::cmd_set(path, &update)
        }
        ConfigCommands::Reset => commands::config::cmd_reset(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_creates_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let app = load_config(0, Some(&path)).unwrap();
        assert_eq!(app, AppConfig::default());
        assert!(path.exists());

        let again = load_config(2, Some(&path)).unwrap();
        assert_eq!(again, app);
    }

    #[test]
    fn test_load_config_rejects_broken_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "retries = \"many\"").unwrap();

        assert!(load_config(0, Some(&path)).is_err());
    }
}
