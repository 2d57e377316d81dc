//! DeviceHandle - an opened device, closed on drop
//!
//! Handle operations go straight to the backend: failures come back verbatim
//! and nothing is retried or timed out. Callers that want the `timeout` and
//! `retries` of a [`DeviceConfig`] applied opt in per call site through
//! [`DeviceHandle::resilient`].

use std::sync::Arc;
use std::time::Duration;

use sensorcli_core::error::{Error, Result};
use sensorcli_core::resilience::{with_timeout, RetryPolicy};
use sensorcli_core::{DeviceConfig, RegisterDevice};

/// Owned handle to an open device
///
/// Dropping the handle closes the device.
pub struct DeviceHandle {
    device: Arc<dyn RegisterDevice>,
}

impl DeviceHandle {
    /// Wrap an open device
    pub fn new(device: Arc<dyn RegisterDevice>) -> Self {
        Self { device }
    }

    /// Configuration the device was opened with
    pub fn config(&self) -> &DeviceConfig {
        self.device.config()
    }

    /// 7-bit device address
    pub fn address(&self) -> u8 {
        self.device.address()
    }

    /// Bus number
    pub fn bus(&self) -> i32 {
        self.device.bus()
    }

    /// Whether the device has been closed
    pub fn is_closed(&self) -> bool {
        self.device.is_closed()
    }

    /// Read a single register
    pub fn read_register(&self, reg: u8) -> Result<u8> {
        self.device.read_register(reg)
    }

    /// Write a single register
    pub fn write_register(&self, reg: u8, value: u8) -> Result<()> {
        self.device.write_register(reg, value)
    }

    /// Read `count` consecutive registers starting at `reg`
    pub fn read_bytes(&self, reg: u8, count: i32) -> Result<Vec<u8>> {
        self.device.read_bytes(reg, count)
    }

    /// Write `data` to consecutive registers starting at `reg`
    pub fn write_bytes(&self, reg: u8, data: &[u8]) -> Result<()> {
        self.device.write_bytes(reg, data)
    }

    /// Close the device
    pub fn close(&self) {
        self.device.close();
    }

    /// Operations bounded by `config.timeout` and retried up to
    /// `config.retries` times
    ///
    /// A timed-out attempt keeps running in the background, so a retried
    /// write may reach the device more than once. Only wrap writes that are
    /// safe to repeat.
    pub fn resilient(&self) -> Resilient<'_> {
        let config = self.config();
        Resilient {
            device: &self.device,
            timeout: config.timeout,
            policy: RetryPolicy::new(config.retries),
        }
    }
}

impl Drop for DeviceHandle {
    fn drop(&mut self) {
        self.device.close();
    }
}

impl std::fmt::Debug for DeviceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceHandle")
            .field("bus", &self.bus())
            .field("address", &format_args!("0x{:02X}", self.address()))
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Register operations run under a timeout and retry policy
///
/// Errors that cannot go away on their own (`DeviceClosed`, `InvalidCount`,
/// `EmptyData`) are returned on the first attempt.
#[derive(Clone)]
pub struct Resilient<'a> {
    device: &'a Arc<dyn RegisterDevice>,
    timeout: Duration,
    policy: RetryPolicy,
}

impl Resilient<'_> {
    /// Replace the retry schedule
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the per-attempt timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read a single register
    pub fn read_register(&self, reg: u8) -> Result<u8> {
        self.call(move |dev| dev.read_register(reg))
    }

    /// Write a single register
    pub fn write_register(&self, reg: u8, value: u8) -> Result<()> {
        self.call(move |dev| dev.write_register(reg, value))
    }

    /// Read `count` consecutive registers starting at `reg`
    pub fn read_bytes(&self, reg: u8, count: i32) -> Result<Vec<u8>> {
        self.call(move |dev| dev.read_bytes(reg, count))
    }

    /// Write `data` to consecutive registers starting at `reg`
    pub fn write_bytes(&self, reg: u8, data: &[u8]) -> Result<()> {
        let data = data.to_vec();
        self.call(move |dev| dev.write_bytes(reg, &data))
    }

    fn call<T, F>(&self, op: F) -> Result<T>
    where
        F: Fn(&dyn RegisterDevice) -> Result<T> + Send + Sync + 'static,
        T: Send + 'static,
    {
        let op = Arc::new(op);

        self.policy.run_while(
            || {
                let dev = Arc::clone(self.device);
                let op = Arc::clone(&op);
                with_timeout(self.timeout, move || (*op)(&*dev))
            },
            Error::is_retryable,
        )
    }
}

impl std::fmt::Debug for Resilient<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resilient")
            .field("timeout", &self.timeout)
            .field("policy", &self.policy)
            .finish()
    }
}
