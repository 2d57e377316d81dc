//! Device configuration
//!
//! A [`DeviceConfig`] names a device on the bus and carries the resilience
//! budget (timeout, retries) that handles apply around register operations.

use std::time::Duration;

use crate::error::{Error, Result};

/// Lowest usable 7-bit device address (0x00-0x02 are reserved)
pub const MIN_ADDRESS: u8 = 0x03;
/// Highest usable 7-bit device address (0x78-0x7F are reserved)
pub const MAX_ADDRESS: u8 = 0x77;

/// Default per-operation timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);
/// Default number of retries after the initial attempt
pub const DEFAULT_RETRIES: u32 = 3;

/// Configuration used to open a device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceConfig {
    /// Logical bus number (must be >= 0)
    pub bus: i32,
    /// 7-bit device address
    pub address: u8,
    /// Bound applied to each operation by a handle
    pub timeout: Duration,
    /// Retries after the initial attempt
    pub retries: u32,
    /// Use the in-memory backend instead of real hardware
    pub mock_mode: bool,
}

impl DeviceConfig {
    /// Create a configuration with default timeout, retries and mock mode
    pub fn new(bus: i32, address: u8) -> Self {
        Self {
            bus,
            address,
            timeout: DEFAULT_TIMEOUT,
            retries: DEFAULT_RETRIES,
            mock_mode: true,
        }
    }

    /// Set the per-operation timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry count
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Select the mock or the hardware backend
    pub fn with_mock_mode(mut self, mock_mode: bool) -> Self {
        self.mock_mode = mock_mode;
        self
    }

    /// Check the address and bus
    ///
    /// The address is checked first, so a config that is wrong on both
    /// counts reports `InvalidAddress`.
    pub fn validate(&self) -> Result<()> {
        if !is_valid_address(self.address) {
            return Err(Error::InvalidAddress(self.address));
        }
        if self.bus < 0 {
            return Err(Error::InvalidBus(self.bus));
        }
        Ok(())
    }
}

/// Whether `address` is a usable 7-bit device address
pub fn is_valid_address(address: u8) -> bool {
    (MIN_ADDRESS..=MAX_ADDRESS).contains(&address)
}

/// Iterate over every usable device address, in ascending order
pub fn scan_addresses() -> impl Iterator<Item = u8> {
    MIN_ADDRESS..=MAX_ADDRESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DeviceConfig::new(1, 0x48);
        assert_eq!(config.bus, 1);
        assert_eq!(config.address, 0x48);
        assert_eq!(config.timeout, Duration::from_secs(1));
        assert_eq!(config.retries, 3);
        assert!(config.mock_mode);
    }

    #[test]
    fn test_validate_address_range() {
        for address in 0..=u8::MAX {
            let result = DeviceConfig::new(0, address).validate();
            if (0x03..=0x77).contains(&address) {
                assert!(result.is_ok(), "0x{:02X} should be valid", address);
            } else {
                assert_eq!(result, Err(Error::InvalidAddress(address)));
            }
        }
    }

    #[test]
    fn test_validate_bus() {
        assert!(DeviceConfig::new(0, 0x48).validate().is_ok());
        assert!(DeviceConfig::new(i32::MAX, 0x48).validate().is_ok());
        assert_eq!(
            DeviceConfig::new(-1, 0x48).validate(),
            Err(Error::InvalidBus(-1))
        );
    }

    #[test]
    fn test_address_checked_before_bus() {
        assert_eq!(
            DeviceConfig::new(-1, 0x00).validate(),
            Err(Error::InvalidAddress(0x00))
        );
    }

    #[test]
    fn test_builders() {
        let config = DeviceConfig::new(2, 0x50)
            .with_timeout(Duration::from_millis(250))
            .with_retries(0)
            .with_mock_mode(false);
        assert_eq!(config.timeout, Duration::from_millis(250));
        assert_eq!(config.retries, 0);
        assert!(!config.mock_mode);
    }

    #[test]
    fn test_scan_addresses() {
        let addrs: Vec<u8> = scan_addresses().collect();
        assert_eq!(addrs.len(), 0x75);
        assert_eq!(addrs.first(), Some(&0x03));
        assert_eq!(addrs.last(), Some(&0x77));
    }
}
