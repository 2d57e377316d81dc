//! Backend registry and initialization
//!
//! This module handles validating configurations and opening the backend
//! they select. It hides concrete backend types from the public API.

use std::sync::Arc;

use sensorcli_core::error::{Error, Result};
use sensorcli_core::{BackendInfo, DeviceConfig, RegisterDevice};

use crate::handle::DeviceHandle;

/// Get information about all available backends (enabled at compile time)
#[allow(unused_mut, clippy::vec_init_then_push)]
pub fn available_backends() -> Vec<BackendInfo> {
    let mut backends = Vec::new();

    #[cfg(feature = "mock")]
    backends.push(BackendInfo {
        name: "mock",
        aliases: &["dummy"],
        description: "In-memory register device for testing",
        requires_hardware: false,
    });

    backends
}

/// Generate a short list of backend names for CLI help
pub fn backend_names_short() -> String {
    let names: Vec<&str> = available_backends().iter().map(|b| b.name).collect();
    names.join(", ")
}

/// Open a device with the default configuration for `bus`/`address`
///
/// # Example
/// ```ignore
/// let handle = open(1, 0x48)?;
/// println!("opened 0x{:02X} on bus {}", handle.address(), handle.bus());
/// ```
pub fn open(bus: i32, address: u8) -> Result<DeviceHandle> {
    open_with_config(DeviceConfig::new(bus, address))
}

/// Open a device described by `config` and wrap it in a handle
///
/// Register failures surface verbatim. `config.timeout` and `config.retries`
/// only take effect through [`DeviceHandle::resilient`].
pub fn open_with_config(config: DeviceConfig) -> Result<DeviceHandle> {
    let device = open_device(config)?;
    Ok(DeviceHandle::new(device))
}

/// Open the raw backend device described by `config`
///
/// Validation happens before any backend is constructed; a rejected
/// config allocates nothing.
///
/// # Errors
/// * `InvalidAddress` - If the address is outside 0x03-0x77
/// * `InvalidBus` - If the bus number is negative
/// * `BackendUnavailable` - If the selected backend is not compiled in
pub fn open_device(config: DeviceConfig) -> Result<Arc<dyn RegisterDevice>> {
    config.validate()?;

    if config.mock_mode {
        open_mock(config)
    } else {
        open_hardware(config)
    }
}

#[cfg(feature = "mock")]
fn open_mock(config: DeviceConfig) -> Result<Arc<dyn RegisterDevice>> {
    log::debug!(
        "Opening mock device on bus {} at 0x{:02X}",
        config.bus,
        config.address
    );
    Ok(Arc::new(sensorcli_mock::MockDevice::new(config)))
}

#[cfg(not(feature = "mock"))]
fn open_mock(_config: DeviceConfig) -> Result<Arc<dyn RegisterDevice>> {
    Err(Error::BackendUnavailable(
        "mock backend not compiled in (enable the `mock` feature)".into(),
    ))
}

// No hardware transport exists yet; real buses are reached through mock mode
// only.
fn open_hardware(config: DeviceConfig) -> Result<Arc<dyn RegisterDevice>> {
    log::error!(
        "No hardware backend for bus {} (available: {})",
        config.bus,
        backend_names_short()
    );
    Err(Error::BackendUnavailable(format!(
        "no hardware backend for bus {}; enable mock mode",
        config.bus
    )))
}

#[cfg(all(test, feature = "mock"))]
mod tests {
    use super::*;

    #[test]
    fn test_open_valid_range() {
        for address in 0x03..=0x77u8 {
            for bus in [0, 1, 7] {
                let handle = open_with_config(DeviceConfig::new(bus, address)).unwrap();
                assert_eq!(handle.address(), address);
                assert_eq!(handle.bus(), bus);
            }
        }
    }

    #[test]
    fn test_open_invalid_address() {
        for address in (0x00..0x03u8).chain(0x78..=0xFF) {
            assert!(matches!(
                open(1, address),
                Err(Error::InvalidAddress(a)) if a == address
            ));
        }
    }

    #[test]
    fn test_open_invalid_bus() {
        assert!(matches!(open(-1, 0x48), Err(Error::InvalidBus(-1))));
        assert!(matches!(open(i32::MIN, 0x48), Err(Error::InvalidBus(i32::MIN))));
    }

    #[test]
    fn test_open_uses_defaults() {
        let handle = open(1, 0x48).unwrap();
        let config = handle.config();
        assert_eq!(config.timeout, std::time::Duration::from_secs(1));
        assert_eq!(config.retries, 3);
        assert!(config.mock_mode);
    }

    #[test]
    fn test_hardware_backend_unavailable() {
        let config = DeviceConfig::new(1, 0x48).with_mock_mode(false);
        assert!(matches!(
            open_device(config),
            Err(Error::BackendUnavailable(_))
        ));
    }

    #[test]
    fn test_devices_do_not_share_stores() {
        let a = open(1, 0x48).unwrap();
        let b = open(1, 0x48).unwrap();
        a.write_register(0x10, 0xAA).unwrap();
        assert_eq!(b.read_register(0x10).unwrap(), 0);
    }

    #[test]
    fn test_opened_device_failures_are_verbatim() {
        let handle = open(1, 0x48).unwrap();
        assert_eq!(handle.read_bytes(0x00, -1), Err(Error::InvalidCount(-1)));
        handle.close();
        assert_eq!(handle.write_register(0x00, 1), Err(Error::DeviceClosed));
    }

    #[test]
    fn test_available_backends() {
        let backends = available_backends();
        assert!(backends.iter().any(|b| b.name == "mock"));
        assert!(backend_names_short().contains("mock"));
    }
}
