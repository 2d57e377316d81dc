//! Device capability contract
//!
//! Every backend (the in-memory mock today, a kernel `i2c-dev` transport
//! later) implements [`RegisterDevice`]. Front ends only ever see this trait,
//! never a concrete backend type.

use crate::config::DeviceConfig;
use crate::error::Result;

/// Register-level access to one device on an I2C bus
///
/// Methods take `&self` so a device can be shared behind an `Arc` and moved
/// into the worker thread of [`with_timeout`](crate::resilience::with_timeout).
/// Implementations provide their own synchronization.
///
/// ## Lifecycle
///
/// A device starts open. After [`close`](Self::close) every register
/// operation fails with `DeviceClosed`, while [`address`](Self::address),
/// [`bus`](Self::bus) and [`config`](Self::config) keep working. There is no
/// reopen; open a new device instead.
///
/// ## Addressing
///
/// Multi-byte operations walk the 8-bit register space modulo 256: a span
/// starting at 0xFE continues at 0xFF, 0x00, 0x01...
///
/// ## Example
///
/// ```ignore
/// fn read_word(dev: &dyn RegisterDevice, reg: u8) -> Result<u16> {
///     let bytes = dev.read_bytes(reg, 2)?;
///     Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
/// }
/// ```
pub trait RegisterDevice: Send + Sync {
    /// Read a single register
    ///
    /// Registers that were never written read as 0.
    ///
    /// # Errors
    /// * `DeviceClosed` - If the device was closed
    fn read_register(&self, reg: u8) -> Result<u8>;

    /// Write a single register
    ///
    /// # Errors
    /// * `DeviceClosed` - If the device was closed
    fn write_register(&self, reg: u8, value: u8) -> Result<()>;

    /// Read `count` consecutive registers starting at `reg`
    ///
    /// # Errors
    /// * `DeviceClosed` - If the device was closed
    /// * `InvalidCount` - If `count <= 0`
    fn read_bytes(&self, reg: u8, count: i32) -> Result<Vec<u8>>;

    /// Write `data` to consecutive registers starting at `reg`
    ///
    /// # Errors
    /// * `DeviceClosed` - If the device was closed
    /// * `EmptyData` - If `data` is empty
    fn write_bytes(&self, reg: u8, data: &[u8]) -> Result<()>;

    /// Close the device and release its register storage
    ///
    /// Closing twice is a no-op.
    fn close(&self);

    /// Whether [`close`](Self::close) has been called
    fn is_closed(&self) -> bool;

    /// The configuration the device was opened with
    fn config(&self) -> &DeviceConfig;

    /// 7-bit device address
    fn address(&self) -> u8 {
        self.config().address
    }

    /// Bus number
    fn bus(&self) -> i32 {
        self.config().bus
    }
}

/// Information about a backend
#[derive(Debug, Clone)]
pub struct BackendInfo {
    /// Name of the backend
    pub name: &'static str,
    /// Alternative names/aliases
    pub aliases: &'static [&'static str],
    /// Description
    pub description: &'static str,
    /// Whether this backend talks to real hardware
    pub requires_hardware: bool,
}
