//! sensorcli-core - Core library for I2C register debugging
//!
//! This crate provides the pieces every backend and front end share:
//!
//! - [`RegisterDevice`]: the capability contract a backend implements
//! - [`DeviceConfig`]: how to open a device (bus, address, timeout, retries)
//! - [`RegisterStore`]: sparse 8-bit register storage with wraparound spans
//! - [`resilience`]: timeout and retry combinators for fallible operations
//!
//! # Example
//!
//! ```ignore
//! use sensorcli_core::{resilience, RegisterDevice};
//!
//! fn read_id(dev: &dyn RegisterDevice) -> sensorcli_core::Result<u8> {
//!     resilience::with_retry(3, || dev.read_register(0x0F))
//! }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod config;
pub mod device;
pub mod error;
pub mod resilience;
pub mod store;

pub use config::DeviceConfig;
pub use device::{BackendInfo, RegisterDevice};
pub use error::{Error, Result};
pub use store::RegisterStore;
