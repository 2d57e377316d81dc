//! Backend registry and device handles
//!
//! This crate is the only way front ends open devices. It validates a
//! [`DeviceConfig`], selects the backend, and returns a [`DeviceHandle`].
//! Handle operations reach the backend directly; the config's timeout and
//! retry budget only apply through [`DeviceHandle::resilient`]. Callers never
//! name a concrete backend type.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     CLI (bin/sensorcli)                   │
//! │  - Only imports sensorcli-bus and sensorcli-core          │
//! └──────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │                 sensorcli-bus (this crate)                │
//! │  - open / open_with_config: validate, pick backend        │
//! │  - DeviceHandle: close on drop, opt-in timeout + retry    │
//! └──────────────────────────────────────────────────────────┘
//!                              │
//!              ┌───────────────┴───────────────┐
//!              ▼                               ▼
//! ┌──────────────────────────┐   ┌──────────────────────────┐
//! │    sensorcli-core        │   │  Backend crates          │
//! │  - RegisterDevice trait  │   │  - sensorcli-mock        │
//! │  - resilience            │   │                          │
//! └──────────────────────────┘   └──────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use sensorcli_bus::open;
//!
//! let handle = open(1, 0x48)?;
//! handle.write_register(0x01, 0x60)?;
//! let config = handle.read_register(0x01)?;
//!
//! // Opt in to the configured timeout and retries
//! let id = handle.resilient().read_register(0x0F)?;
//! ```

mod handle;
mod registry;

pub use handle::{DeviceHandle, Resilient};
pub use registry::{
    available_backends, backend_names_short, open, open_device, open_with_config,
};

// Re-export core types that the CLI needs
pub use sensorcli_core::{BackendInfo, DeviceConfig, Error, RegisterDevice, Result};
