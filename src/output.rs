//! Register dump rendering (JSON, CSV, hex report)

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use sensorcli_core::store::wrapping_register;
use serde::Serialize;

use crate::cli::OutputFormat;

/// A range of registers read from one device
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterDump {
    /// 7-bit device address
    pub device_addr: u8,
    /// Bus the device was read on
    pub bus: i32,
    /// First register of the range
    pub start_register: u8,
    /// RFC 3339 time of the read
    pub timestamp: String,
    /// Values keyed by "0xNN" register labels
    pub data: BTreeMap<String, u8>,
}

impl RegisterDump {
    /// Build a dump of `values` read from `start_register` onwards
    ///
    /// Register labels wrap at 0xFF like the read itself.
    pub fn new(bus: i32, device_addr: u8, start_register: u8, values: &[u8]) -> Self {
        Self::with_timestamp(
            bus,
            device_addr,
            start_register,
            values,
            chrono::Local::now().to_rfc3339(),
        )
    }

    /// Like [`new`](Self::new), with a fixed timestamp
    pub fn with_timestamp(
        bus: i32,
        device_addr: u8,
        start_register: u8,
        values: &[u8],
        timestamp: String,
    ) -> Self {
        let data = values
            .iter()
            .enumerate()
            .map(|(i, &value)| (register_label(wrapping_register(start_register, i)), value))
            .collect();

        Self {
            device_addr,
            bus,
            start_register,
            timestamp,
            data,
        }
    }

    /// Render in `format`
    pub fn render(&self, format: OutputFormat) -> Result<String, Box<dyn std::error::Error>> {
        match format {
            OutputFormat::Json => self.to_json(),
            OutputFormat::Csv => self.to_csv(),
            OutputFormat::Hex => Ok(self.to_hex_report()),
        }
    }

    fn to_json(&self) -> Result<String, Box<dyn std::error::Error>> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    fn to_csv(&self) -> Result<String, Box<dyn std::error::Error>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["Register", "Value", "Decimal"])?;
        for (reg, value) in &self.data {
            writer.write_record([reg.clone(), format!("0x{:02X}", value), value.to_string()])?;
        }
        let bytes = writer.into_inner().map_err(|e| e.into_error())?;
        Ok(String::from_utf8(bytes)?)
    }

    fn to_hex_report(&self) -> String {
        let mut report = String::new();
        report.push_str(&format!("Device address: 0x{:02X}\n", self.device_addr));
        report.push_str(&format!("Bus:            {}\n", self.bus));
        report.push_str(&format!("Start register: 0x{:02X}\n", self.start_register));
        report.push_str(&format!("Timestamp:      {}\n", self.timestamp));
        report.push_str("Data:\n");
        for (reg, value) in &self.data {
            report.push_str(&format!("  {}: 0x{:02X} ({})\n", reg, value, value));
        }
        report
    }
}

/// "0xNN" label for a register
pub fn register_label(reg: u8) -> String {
    format!("0x{:02X}", reg)
}

/// Write rendered output to `path`, or stdout if `None`
pub fn emit(content: &str, path: Option<&Path>) -> std::io::Result<()> {
    match path {
        Some(path) => {
            fs::write(path, content)?;
            log::info!("Wrote {} bytes to {}", content.len(), path.display());
            Ok(())
        }
        None => {
            print!("{}", content);
            Ok(())
        }
    }
}
