//! CLI command implementations
//!
//! Every command opens devices through `sensorcli_bus`, so register access is
//! wrapped in the configured timeout and retry budget. Handles close their
//! device when the command returns.

pub mod config;
mod dump;
mod list;
mod read;
mod scan;
mod write;

pub use dump::run_dump;
pub use list::list_backends;
pub use read::run_read;
pub use scan::run_scan;
pub use write::run_write;

use sensorcli_core::store::wrapping_register;

/// One "  0xNN: 0xVV (ddd)" line per value, labels wrapping at 0xFF
pub fn register_lines(start: u8, values: &[u8]) -> Vec<String> {
    values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            format!(
                "  0x{:02X}: 0x{:02X} ({})",
                wrapping_register(start, i),
                value,
                value
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_lines_wrap() {
        assert_eq!(
            register_lines(0xFF, &[0x01, 0x80]),
            vec!["  0xFF: 0x01 (1)", "  0x00: 0x80 (128)"]
        );
    }
}
