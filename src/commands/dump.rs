//! Dump command implementation

use std::path::Path;

use sensorcli_bus::open_with_config;

use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::output::{emit, RegisterDump};

/// Run the dump command
///
/// `format` falls back to the configured output format. The read runs under
/// the configured timeout and retries.
pub fn run_dump(
    app: &AppConfig,
    bus: Option<i32>,
    addr: u8,
    reg: u8,
    count: i32,
    format: Option<OutputFormat>,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let handle = open_with_config(app.device_config(bus, addr))?;
    let data = handle.resilient().read_bytes(reg, count)?;

    log::debug!(
        "bus {} addr 0x{:02X}: dumped {} registers from 0x{:02X}",
        handle.bus(),
        addr,
        data.len(),
        reg
    );

    let dump = RegisterDump::new(handle.bus(), addr, reg, &data);
    let rendered = dump.render(format.unwrap_or(app.output_format))?;
    emit(&rendered, output)?;

    Ok(())
}
