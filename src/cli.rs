//! CLI argument parsing

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Largest span a single read or dump may request
const MAX_COUNT: i64 = 256;

/// Parse a string as a hex or decimal u8
fn parse_hex_u8(s: &str) -> Result<u8, String> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u8::from_str_radix(hex, 16).map_err(|e| format!("Invalid hex value: {}", e))
    } else {
        s.parse::<u8>().map_err(|e| format!("Invalid number: {}", e))
    }
}

/// Generate dynamic help text for the mock-mode switch
fn mock_mode_help() -> String {
    format!(
        "Use the in-memory backend [available: {}]",
        sensorcli_bus::backend_names_short()
    )
}

/// Register dump output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed JSON object
    #[default]
    Json,
    /// Register,Value,Decimal rows
    Csv,
    /// Human-readable report
    Hex,
}

#[derive(Parser)]
#[command(name = "sensorcli")]
#[command(author, version, about = "I2C sensor debugging tool", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to the configuration file
    /// Defaults to ~/.sensorcli/config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a bus for responding devices
    Scan {
        /// I2C bus number (defaults to the configured bus)
        #[arg(short, long, allow_negative_numbers = true)]
        bus: Option<i32>,
    },

    /// Read device registers
    Read {
        /// Device address (hex, e.g., 0x48)
        #[arg(short, long, value_parser = parse_hex_u8)]
        addr: u8,

        /// Register address (hex, e.g., 0x01)
        #[arg(short, long, value_parser = parse_hex_u8)]
        reg: u8,

        /// Number of bytes to read (at most one full register space, 256)
        #[arg(
            short,
            long,
            default_value_t = 1,
            allow_negative_numbers = true,
            value_parser = clap::value_parser!(i32).range(..=MAX_COUNT)
        )]
        count: i32,

        /// I2C bus number (defaults to the configured bus)
        #[arg(short, long, allow_negative_numbers = true)]
        bus: Option<i32>,
    },

    /// Write device registers
    Write {
        /// Device address (hex, e.g., 0x48)
        #[arg(short, long, value_parser = parse_hex_u8)]
        addr: u8,

        /// Register address (hex, e.g., 0x02)
        #[arg(short, long, value_parser = parse_hex_u8)]
        reg: u8,

        /// Single value to write (hex, e.g., 0x55)
        #[arg(long, value_parser = parse_hex_u8, required_unless_present = "data", conflicts_with = "data")]
        value: Option<u8>,

        /// Bytes to write starting at the register (comma-separated, e.g., 0x55,0x66)
        #[arg(short, long, value_parser = parse_hex_u8, value_delimiter = ',')]
        data: Vec<u8>,

        /// I2C bus number (defaults to the configured bus)
        #[arg(short, long, allow_negative_numbers = true)]
        bus: Option<i32>,
    },

    /// Dump a register range as JSON, CSV or a hex report
    Dump {
        /// Device address (hex, e.g., 0x48)
        #[arg(short, long, value_parser = parse_hex_u8)]
        addr: u8,

        /// First register (hex, e.g., 0x00)
        #[arg(short, long, value_parser = parse_hex_u8, default_value = "0x00")]
        reg: u8,

        /// Number of registers to dump (at most 256)
        #[arg(
            short,
            long,
            default_value_t = 16,
            allow_negative_numbers = true,
            value_parser = clap::value_parser!(i32).range(..=MAX_COUNT)
        )]
        count: i32,

        /// Output format (defaults to the configured format)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Output file (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// I2C bus number (defaults to the configured bus)
        #[arg(short, long, allow_negative_numbers = true)]
        bus: Option<i32>,
    },

    /// List available backends
    ListBackends,

    /// Configuration file operations
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Configuration-related subcommands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the current configuration
    Show,

    /// Update configuration values (only the given ones change)
    Set {
        /// Default I2C bus number
        #[arg(long)]
        default_bus: Option<i32>,

        /// Default per-operation timeout in milliseconds
        #[arg(long)]
        default_timeout: Option<u64>,

        /// Retries after a failed operation
        #[arg(long)]
        retries: Option<u32>,

        /// Log level (error, warn, info, debug, trace)
        #[arg(long)]
        log_level: Option<String>,

        /// Default dump format
        #[arg(long, value_enum)]
        output_format: Option<OutputFormat>,

        #[arg(long, help = mock_mode_help())]
        mock_mode: Option<bool>,
    },

    /// Reset the configuration to defaults
    Reset,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_parse_hex_u8() {
        assert_eq!(parse_hex_u8("0x48"), Ok(0x48));
        assert_eq!(parse_hex_u8("0XFF"), Ok(0xFF));
        assert_eq!(parse_hex_u8("72"), Ok(72));
        assert!(parse_hex_u8("0x100").is_err());
        assert!(parse_hex_u8("zz").is_err());
    }

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_write_data() {
        let cli = Cli::try_parse_from([
            "sensorcli", "write", "--addr", "0x48", "--reg", "0x02", "--data", "0x55,0x66,0x77",
        ])
        .unwrap();
        match cli.command {
            Commands::Write {
                addr, reg, value, data, bus,
            } => {
                assert_eq!(addr, 0x48);
                assert_eq!(reg, 0x02);
                assert_eq!(value, None);
                assert_eq!(data, vec![0x55, 0x66, 0x77]);
                assert_eq!(bus, None);
            }
            _ => panic!("expected write command"),
        }
    }

    #[test]
    fn test_write_requires_value_or_data() {
        assert!(Cli::try_parse_from(["sensorcli", "write", "-a", "0x48", "-r", "0x02"]).is_err());
        assert!(Cli::try_parse_from([
            "sensorcli", "write", "-a", "0x48", "-r", "0x02", "--value", "1", "--data", "2",
        ])
        .is_err());
    }

    #[test]
    fn test_parse_dump_defaults() {
        let cli = Cli::try_parse_from(["sensorcli", "dump", "-a", "0x48", "-f", "csv"]).unwrap();
        match cli.command {
            Commands::Dump {
                reg, count, format, output, ..
            } => {
                assert_eq!(reg, 0x00);
                assert_eq!(count, 16);
                assert_eq!(format, Some(OutputFormat::Csv));
                assert!(output.is_none());
            }
            _ => panic!("expected dump command"),
        }
    }

    #[test]
    fn test_count_is_capped() {
        let read = |count: &str| {
            Cli::try_parse_from(["sensorcli", "read", "-a", "0x48", "-r", "0x00", "-c", count])
        };
        assert!(matches!(
            read("256").unwrap().command,
            Commands::Read { count: 256, .. }
        ));
        assert!(read("257").is_err());
        assert!(read("2147483647").is_err());
        // Non-positive counts are left to the device
        assert!(matches!(
            read("-1").unwrap().command,
            Commands::Read { count: -1, .. }
        ));

        assert!(Cli::try_parse_from(["sensorcli", "dump", "-a", "0x48", "-c", "300"]).is_err());
    }

    #[test]
    fn test_negative_bus_reaches_validation() {
        let cli = Cli::try_parse_from(["sensorcli", "scan", "--bus", "-1"]).unwrap();
        assert!(matches!(cli.command, Commands::Scan { bus: Some(-1) }));
    }
}
