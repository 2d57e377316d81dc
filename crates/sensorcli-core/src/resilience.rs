//! Timeout and retry combinators
//!
//! These wrap any fallible operation and know nothing about backends. The
//! core never applies them on its own; callers (usually a device handle)
//! opt in explicitly.
//!
//! ```ignore
//! let dev = Arc::clone(&device);
//! let value = with_retry(3, || {
//!     let dev = Arc::clone(&dev);
//!     with_timeout(Duration::from_millis(100), move || dev.read_register(0x00))
//! })?;
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::config::{DEFAULT_RETRIES, DEFAULT_TIMEOUT};
use crate::error::{Error, Result};

/// Base delay before the first retry
pub const DEFAULT_BACKOFF_BASE: Duration = Duration::from_millis(10);
/// Multiplier applied to the delay after each failed attempt
pub const DEFAULT_BACKOFF_FACTOR: u32 = 2;

const WORKER_THREAD_NAME: &str = "sensorcli-timeout";

fn effective_bound(bound: Duration) -> Duration {
    if bound.is_zero() {
        DEFAULT_TIMEOUT
    } else {
        bound
    }
}

/// Run `op` on a worker thread and wait at most `bound` for its result
///
/// A zero `bound` is replaced by the 1 s default.
///
/// This is a race, not a cancellation: when the bound fires the caller gets
/// `Timeout` and the worker keeps running until `op` returns, with its result
/// discarded. Only wrap operations that are safe to finish in the
/// background. See [`with_timeout_cancellable`] for a cooperative variant.
///
/// # Errors
/// * `Timeout` - If `op` did not finish within the bound
/// * `OperationPanicked` - If `op` panicked
/// * Any error returned by `op`
pub fn with_timeout<T, F>(bound: Duration, op: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    race(effective_bound(bound), op, || {})
}

/// Like [`with_timeout`], but hands `op` a [`CancelToken`]
///
/// The token is cancelled when the bound fires. An operation that polls
/// [`CancelToken::is_cancelled`] can then stop early instead of running to
/// completion unobserved. The caller never waits for the operation to notice.
pub fn with_timeout_cancellable<T, F>(bound: Duration, op: F) -> Result<T>
where
    F: FnOnce(&CancelToken) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let token = CancelToken::new();
    let worker_token = token.clone();
    race(
        effective_bound(bound),
        move || op(&worker_token),
        move || token.cancel(),
    )
}

fn race<T, F, C>(bound: Duration, op: F, on_timeout: C) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
    C: FnOnce(),
{
    let (tx, rx) = mpsc::channel();

    thread::Builder::new()
        .name(WORKER_THREAD_NAME.into())
        .spawn(move || {
            // The receiver is gone once the caller has timed out
            let _ = tx.send(op());
        })
        .map_err(|e| Error::WorkerSpawn(e.to_string()))?;

    match rx.recv_timeout(bound) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => {
            log::debug!("operation timed out after {:?}", bound);
            on_timeout();
            Err(Error::Timeout(bound))
        }
        Err(RecvTimeoutError::Disconnected) => Err(Error::OperationPanicked),
    }
}

/// Cancellation flag shared between a caller and a bounded operation
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token that is not cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Retry schedule with exponential backoff
///
/// The delay after failed attempt `i` (0-indexed) is
/// `base_delay * factor^i`. No delay follows the final attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the initial attempt
    pub max_retries: u32,
    /// Delay after the first failed attempt
    pub base_delay: Duration,
    /// Growth factor between consecutive delays
    pub factor: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_RETRIES)
    }
}

impl RetryPolicy {
    /// Policy with the default 10 ms base and doubling factor
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay: DEFAULT_BACKOFF_BASE,
            factor: DEFAULT_BACKOFF_FACTOR,
        }
    }

    /// Total number of invocations this policy allows
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay to sleep after failed attempt `attempt` (0-indexed)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.factor
            .checked_pow(attempt)
            .and_then(|scale| self.base_delay.checked_mul(scale))
            .unwrap_or(Duration::MAX)
    }

    /// Invoke `op` until it succeeds or the policy is exhausted
    ///
    /// Blocks the calling thread during backoff sleeps.
    ///
    /// # Errors
    /// * `RetriesExhausted` - Carrying the error of the final attempt
    pub fn run<T, F>(&self, op: F) -> Result<T>
    where
        F: FnMut() -> Result<T>,
    {
        self.run_while(op, |_| true)
    }

    /// Like [`run`](Self::run), but stops early on errors `retryable` rejects
    ///
    /// A rejected error is returned as-is, not wrapped in `RetriesExhausted`.
    pub fn run_while<T, F, P>(&self, mut op: F, retryable: P) -> Result<T>
    where
        F: FnMut() -> Result<T>,
        P: Fn(&Error) -> bool,
    {
        let mut attempt = 0u32;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(e) if !retryable(&e) => return Err(e),
                Err(e) if attempt >= self.max_retries => {
                    let attempts = attempt.saturating_add(1);
                    log::warn!("giving up after {} attempts: {}", attempts, e);
                    return Err(Error::RetriesExhausted {
                        attempts,
                        source: Box::new(e),
                    });
                }
                Err(e) => {
                    let delay = self.delay_for(attempt);
                    log::debug!(
                        "attempt {}/{} failed: {} (retrying in {:?})",
                        attempt + 1,
                        self.max_attempts(),
                        e,
                        delay
                    );
                    thread::sleep(delay);
                    attempt += 1;
                }
            }
        }
    }
}

/// Invoke `op` up to `max_retries + 1` times with `10ms * 2^i` backoff
///
/// Shorthand for `RetryPolicy::new(max_retries).run(op)`.
pub fn with_retry<T, F>(max_retries: u32, op: F) -> Result<T>
where
    F: FnMut() -> Result<T>,
{
    RetryPolicy::new(max_retries).run(op)
}
