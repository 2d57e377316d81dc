//! sensorcli-mock - In-memory I2C register device for testing
//!
//! This crate provides a device that keeps its registers in memory. It is
//! used whenever no physical bus is available, and by tests.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use sensorcli_core::error::{Error, Result};
use sensorcli_core::{DeviceConfig, RegisterDevice, RegisterStore};

/// Mock I2C device
///
/// The register store and the closed flag live behind one reader-writer
/// lock: `None` means closed and the store has been released. Every
/// operation checks for closure and touches the store under the same guard.
#[derive(Debug)]
pub struct MockDevice {
    config: DeviceConfig,
    state: RwLock<Option<RegisterStore>>,
}

impl MockDevice {
    /// Create a device with an empty register store
    pub fn new(config: DeviceConfig) -> Self {
        Self::with_store(config, RegisterStore::new())
    }

    /// Create a device with pre-filled registers
    pub fn with_registers(config: DeviceConfig, initial: &[(u8, u8)]) -> Self {
        Self::with_store(config, RegisterStore::with_values(initial.iter().copied()))
    }

    fn with_store(config: DeviceConfig, store: RegisterStore) -> Self {
        log::debug!(
            "mock device bus {} addr 0x{:02X}: opened",
            config.bus,
            config.address
        );
        Self {
            config,
            state: RwLock::new(Some(store)),
        }
    }

    /// Copy of every written register, in address order
    ///
    /// Empty once the device is closed.
    pub fn registers(&self) -> BTreeMap<u8, u8> {
        self.read_state()
            .as_ref()
            .map(RegisterStore::snapshot)
            .unwrap_or_default()
    }

    // The store holds plain bytes, so a panic under the lock cannot leave it
    // half-updated in a way later readers care about.
    fn read_state(&self) -> RwLockReadGuard<'_, Option<RegisterStore>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, Option<RegisterStore>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn log_failure(&self, op: &str, reg: u8, e: &Error) {
        log::error!(
            "mock device bus {} addr 0x{:02X}: {} 0x{:02X} failed: {}",
            self.config.bus,
            self.config.address,
            op,
            reg,
            e
        );
    }
}

impl RegisterDevice for MockDevice {
    fn read_register(&self, reg: u8) -> Result<u8> {
        let state = self.read_state();
        let Some(store) = state.as_ref() else {
            self.log_failure("read", reg, &Error::DeviceClosed);
            return Err(Error::DeviceClosed);
        };

        let value = store.get(reg);
        log::debug!(
            "mock device bus {} addr 0x{:02X}: read 0x{:02X} = 0x{:02X}",
            self.config.bus,
            self.config.address,
            reg,
            value
        );
        Ok(value)
    }

    fn write_register(&self, reg: u8, value: u8) -> Result<()> {
        let mut state = self.write_state();
        let Some(store) = state.as_mut() else {
            self.log_failure("write", reg, &Error::DeviceClosed);
            return Err(Error::DeviceClosed);
        };

        store.set(reg, value);
        log::debug!(
            "mock device bus {} addr 0x{:02X}: write 0x{:02X} = 0x{:02X}",
            self.config.bus,
            self.config.address,
            reg,
            value
        );
        Ok(())
    }

    fn read_bytes(&self, reg: u8, count: i32) -> Result<Vec<u8>> {
        let state = self.read_state();
        let Some(store) = state.as_ref() else {
            self.log_failure("read", reg, &Error::DeviceClosed);
            return Err(Error::DeviceClosed);
        };
        if count <= 0 {
            let e = Error::InvalidCount(count);
            self.log_failure("read", reg, &e);
            return Err(e);
        }

        let data = store.read_span(reg, count as usize);
        log::debug!(
            "mock device bus {} addr 0x{:02X}: read {} bytes from 0x{:02X}",
            self.config.bus,
            self.config.address,
            data.len(),
            reg
        );
        Ok(data)
    }

    fn write_bytes(&self, reg: u8, data: &[u8]) -> Result<()> {
        let mut state = self.write_state();
        let Some(store) = state.as_mut() else {
            self.log_failure("write", reg, &Error::DeviceClosed);
            return Err(Error::DeviceClosed);
        };
        if data.is_empty() {
            self.log_failure("write", reg, &Error::EmptyData);
            return Err(Error::EmptyData);
        }

        store.write_span(reg, data);
        log::debug!(
            "mock device bus {} addr 0x{:02X}: wrote {} bytes from 0x{:02X}",
            self.config.bus,
            self.config.address,
            data.len(),
            reg
        );
        Ok(())
    }

    fn close(&self) {
        let mut state = self.write_state();
        if state.take().is_some() {
            log::debug!(
                "mock device bus {} addr 0x{:02X}: closed",
                self.config.bus,
                self.config.address
            );
        }
    }

    fn is_closed(&self) -> bool {
        self.read_state().is_none()
    }

    fn config(&self) -> &DeviceConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn device() -> MockDevice {
        MockDevice::new(DeviceConfig::new(1, 0x48))
    }

    #[test]
    fn test_accessors() {
        let dev = device();
        assert_eq!(dev.address(), 0x48);
        assert_eq!(dev.bus(), 1);
        assert!(!dev.is_closed());
    }

    #[test]
    fn test_read_write_register() {
        let dev = device();
        assert_eq!(dev.read_register(0x10).unwrap(), 0);

        dev.write_register(0x10, 0x55).unwrap();
        assert_eq!(dev.read_register(0x10).unwrap(), 0x55);

        for reg in 0..=u8::MAX {
            dev.write_register(reg, reg ^ 0xA5).unwrap();
        }
        for reg in 0..=u8::MAX {
            assert_eq!(dev.read_register(reg).unwrap(), reg ^ 0xA5);
        }
    }

    #[test]
    fn test_read_write_bytes() {
        let dev = device();
        let data: [u8; 4] = [0x11, 0x22, 0x33, 0x44];
        dev.write_bytes(0x20, &data).unwrap();
        assert_eq!(dev.read_bytes(0x20, 4).unwrap(), data);
        assert_eq!(dev.read_register(0x23).unwrap(), 0x44);
        // Past the written span reads as zero
        assert_eq!(dev.read_bytes(0x22, 4).unwrap(), vec![0x33, 0x44, 0, 0]);
    }

    #[test]
    fn test_bytes_wraparound() {
        let dev = device();
        dev.write_bytes(0xFE, &[1, 2, 3]).unwrap();
        assert_eq!(dev.read_register(0xFE).unwrap(), 1);
        assert_eq!(dev.read_register(0xFF).unwrap(), 2);
        assert_eq!(dev.read_register(0x00).unwrap(), 3);
        assert_eq!(dev.read_bytes(0xFE, 3).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_invalid_count_and_empty_data() {
        let dev = device();
        assert_eq!(dev.read_bytes(0x00, 0), Err(Error::InvalidCount(0)));
        assert_eq!(dev.read_bytes(0x00, -1), Err(Error::InvalidCount(-1)));
        assert_eq!(dev.write_bytes(0x00, &[]), Err(Error::EmptyData));
        assert!(dev.registers().is_empty());
    }

    #[test]
    fn test_closed_device() {
        let dev = device();
        dev.write_register(0x10, 0x55).unwrap();
        dev.close();

        assert!(dev.is_closed());
        assert_eq!(dev.read_register(0x10), Err(Error::DeviceClosed));
        assert_eq!(dev.write_register(0x10, 1), Err(Error::DeviceClosed));
        assert_eq!(dev.read_bytes(0x10, 2), Err(Error::DeviceClosed));
        assert_eq!(dev.write_bytes(0x10, &[1]), Err(Error::DeviceClosed));
        // Closed wins over argument errors
        assert_eq!(dev.read_bytes(0x10, 0), Err(Error::DeviceClosed));
        assert_eq!(dev.write_bytes(0x10, &[]), Err(Error::DeviceClosed));

        // Metadata outlives the store
        assert_eq!(dev.address(), 0x48);
        assert_eq!(dev.bus(), 1);
        assert!(dev.registers().is_empty());

        // Idempotent
        dev.close();
        assert!(dev.is_closed());
    }

    #[test]
    fn test_with_registers() {
        let dev = MockDevice::with_registers(DeviceConfig::new(0, 0x68), &[(0x75, 0x68)]);
        assert_eq!(dev.read_register(0x75).unwrap(), 0x68);
        assert_eq!(dev.registers().len(), 1);
    }

    #[test]
    fn test_concurrent_writers() {
        let dev = Arc::new(device());
        let handles: Vec<_> = (0..32u8)
            .map(|i| {
                let dev = Arc::clone(&dev);
                thread::spawn(move || {
                    let reg = 0x10 + i;
                    dev.write_register(reg, reg).unwrap();
                    assert_eq!(dev.read_register(reg).unwrap(), reg);
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let regs = dev.registers();
        assert_eq!(regs.len(), 32);
        for i in 0..32u8 {
            assert_eq!(dev.read_register(0x10 + i).unwrap(), 0x10 + i);
        }
    }

    #[test]
    fn test_close_races_writers() {
        let dev = Arc::new(device());
        let writers: Vec<_> = (0..8u8)
            .map(|i| {
                let dev = Arc::clone(&dev);
                thread::spawn(move || {
                    for _ in 0..200 {
                        match dev.write_bytes(i * 8, &[i; 8]) {
                            Ok(()) | Err(Error::DeviceClosed) => {}
                            Err(e) => panic!("unexpected error: {}", e),
                        }
                    }
                })
            })
            .collect();
        dev.close();
        for writer in writers {
            writer.join().unwrap();
        }

        // Nothing gets through after close
        assert!(dev.registers().is_empty());
        assert_eq!(dev.write_register(0x00, 1), Err(Error::DeviceClosed));
    }
}
