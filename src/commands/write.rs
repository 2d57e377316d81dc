//! Write command implementation

use sensorcli_bus::open_with_config;

use super::register_lines;
use crate::config::AppConfig;

/// Run the write command
///
/// Writes `data` as a span when it is non-empty, otherwise the single
/// `value`. Writes go to the device once, without timeout or retry.
pub fn run_write(
    app: &AppConfig,
    bus: Option<i32>,
    addr: u8,
    reg: u8,
    value: Option<u8>,
    data: &[u8],
) -> Result<(), Box<dyn std::error::Error>> {
    let handle = open_with_config(app.device_config(bus, addr))?;

    if data.is_empty() {
        let value = value.ok_or("either --value or --data is required")?;
        handle.write_register(reg, value)?;
        println!(
            "Wrote device 0x{:02X} register 0x{:02X}: 0x{:02X} ({})",
            addr, reg, value, value
        );
    } else {
        handle.write_bytes(reg, data)?;
        println!(
            "Wrote device 0x{:02X}: {} bytes from register 0x{:02X}",
            addr,
            data.len(),
            reg
        );
        for line in register_lines(reg, data) {
            println!("{}", line);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_mock() {
        let app = AppConfig::default();
        run_write(&app, None, 0x48, 0x02, Some(0x55), &[]).unwrap();
        run_write(&app, None, 0x48, 0xFE, None, &[1, 2, 3]).unwrap();
    }

    #[test]
    fn test_write_needs_value() {
        let app = AppConfig::default();
        assert!(run_write(&app, None, 0x48, 0x02, None, &[]).is_err());
    }
}
