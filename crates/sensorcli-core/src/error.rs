//! Error types for sensorcli-core

use std::time::Duration;

use thiserror::Error;

/// Core error type shared by every backend and combinator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    // Construction errors
    /// Device address outside the usable 7-bit range
    #[error("invalid device address 0x{0:02X} (valid range 0x03-0x77)")]
    InvalidAddress(u8),
    /// Negative bus number
    #[error("invalid bus number {0}")]
    InvalidBus(i32),
    /// The configuration asks for a backend that is not available
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    // Operation errors
    /// Operation attempted after the device was closed
    #[error("device is closed")]
    DeviceClosed,
    /// Non-positive byte count requested
    #[error("invalid byte count {0}")]
    InvalidCount(i32),
    /// Zero-length write buffer
    #[error("write data is empty")]
    EmptyData,
    /// Bus transfer failed
    #[error("transfer failed: {0}")]
    Transfer(String),

    // Resilience errors
    /// Operation did not finish within its bound
    #[error("operation timed out after {0:?}")]
    Timeout(Duration),
    /// Every attempt failed; carries the last failure
    #[error("operation failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        /// Total number of invocations made
        attempts: u32,
        /// Failure returned by the final attempt
        source: Box<Error>,
    },
    /// The operation panicked before producing a result
    #[error("operation panicked")]
    OperationPanicked,
    /// The worker thread for a bounded operation could not be started
    #[error("failed to spawn worker thread: {0}")]
    WorkerSpawn(String),
}

impl Error {
    /// Whether retrying the same operation could succeed
    ///
    /// Transfer failures and timeouts are transient. Argument errors and a
    /// closed device fail the same way every time.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transfer(_) | Self::Timeout(_) | Self::OperationPanicked
        )
    }

    /// Returns the innermost failure, unwrapping any `RetriesExhausted` layers
    pub fn root_cause(&self) -> &Error {
        match self {
            Self::RetriesExhausted { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Result type alias using the core Error type
pub type Result<T> = std::result::Result<T, Error>;
