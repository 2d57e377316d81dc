//! Scan command implementation

use indicatif::{ProgressBar, ProgressStyle};
use sensorcli_bus::{open_with_config, Error};
use sensorcli_core::config::{scan_addresses, MAX_ADDRESS, MIN_ADDRESS};

use crate::config::AppConfig;

/// Register read to detect whether a device answers
const PROBE_REGISTER: u8 = 0x00;

/// Run the scan command
///
/// Opens every usable address on the bus and probes one register. Returns
/// the addresses that answered.
pub fn run_scan(
    app: &AppConfig,
    bus: Option<i32>,
) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let bus = bus.unwrap_or(app.default_bus);
    println!("Scanning I2C bus {}...", bus);

    let total = (MAX_ADDRESS - MIN_ADDRESS + 1) as u64;
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let mut found = Vec::new();
    for addr in scan_addresses() {
        pb.set_message(format!("0x{:02X}", addr));

        let handle = match open_with_config(app.device_config(Some(bus), addr)) {
            Ok(handle) => handle,
            // Bus-wide problems fail every address the same way
            Err(e @ (Error::InvalidBus(_) | Error::BackendUnavailable(_))) => {
                pb.finish_and_clear();
                return Err(e.into());
            }
            Err(e) => {
                log::debug!("bus {} addr 0x{:02X}: open failed: {}", bus, addr, e);
                pb.inc(1);
                continue;
            }
        };

        match handle.resilient().read_register(PROBE_REGISTER) {
            Ok(_) => {
                log::info!("Found device at 0x{:02X} on bus {}", addr, bus);
                found.push(addr);
            }
            Err(e) => log::debug!("bus {} addr 0x{:02X}: no device ({})", bus, addr, e),
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    if found.is_empty() {
        println!("No devices found");
    } else {
        print!("{}", format_scan_grid(&found));
        println!("Found {} device(s)", found.len());
    }

    Ok(found)
}

/// Format scan results as an i2cdetect-style grid
///
/// Found addresses show their number, empty usable addresses show `--`,
/// reserved addresses are left blank.
pub fn format_scan_grid(found: &[u8]) -> String {
    let mut grid = String::from("     0  1  2  3  4  5  6  7  8  9  a  b  c  d  e  f\n");
    for row in (0u8..0x80).step_by(16) {
        grid.push_str(&format!("{:02x}:", row));
        for addr in row..row + 16 {
            if found.contains(&addr) {
                grid.push_str(&format!(" {:02x}", addr));
            } else if (MIN_ADDRESS..=MAX_ADDRESS).contains(&addr) {
                grid.push_str(" --");
            } else {
                grid.push_str("   ");
            }
        }
        grid.push('\n');
    }
    grid
}
