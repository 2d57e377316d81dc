//! Read command implementation

use sensorcli_bus::open_with_config;

use super::register_lines;
use crate::config::AppConfig;

/// Run the read command
///
/// A count of 1 reads a single register; larger counts read a span. Reads
/// run under the configured timeout and retries.
pub fn run_read(
    app: &AppConfig,
    bus: Option<i32>,
    addr: u8,
    reg: u8,
    count: i32,
) -> Result<(), Box<dyn std::error::Error>> {
    let handle = open_with_config(app.device_config(bus, addr))?;
    let ops = handle.resilient();

    if count == 1 {
        let value = ops.read_register(reg)?;
        println!(
            "Device 0x{:02X} register 0x{:02X}: 0x{:02X} ({})",
            addr, reg, value, value
        );
    } else {
        let data = ops.read_bytes(reg, count)?;
        println!(
            "Device 0x{:02X}: {} bytes from register 0x{:02X}",
            addr,
            data.len(),
            reg
        );
        for line in register_lines(reg, &data) {
            println!("{}", line);
        }
    }

    Ok(())
}
