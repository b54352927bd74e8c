//! Cooperative cancellation tokens.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::compute::PiError;

/// Cooperative cancellation token shared between the coordinator and all
/// in-flight compute units.
///
/// # Example
/// ```
/// use picalc_core::progress::CancellationToken;
///
/// let token = CancellationToken::new();
/// assert!(!token.is_cancelled());
///
/// token.cancel();
/// assert!(token.is_cancelled());
/// assert!(token.check_cancelled().is_err());
/// ```
#[derive(Clone, Debug)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a new cancellation token.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Check if cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Check for cancellation, returning an error if cancelled.
    ///
    /// Use this as a checkpoint in compute-unit loops.
    pub fn check_cancelled(&self) -> Result<(), PiError> {
        if self.is_cancelled() {
            Err(PiError::Cancelled)
        } else {
            Ok(())
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// A cancellation token paired with an absolute deadline.
///
/// The run is considered cancelled if either `cancel()` was called or the
/// deadline has passed.
#[derive(Clone, Debug)]
pub struct DeadlineToken {
    inner: CancellationToken,
    deadline: Instant,
}

impl DeadlineToken {
    /// Create a deadline token expiring after `timeout`.
    #[must_use]
    pub fn new(inner: CancellationToken, timeout: Duration) -> Self {
        Self {
            inner,
            deadline: Instant::now() + timeout,
        }
    }

    /// Check if cancellation has been requested (manual or deadline).
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.is_cancelled() || Instant::now() >= self.deadline
    }

    /// Get the remaining time before the deadline.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    /// Get the inner [`CancellationToken`] for passing to compute units.
    #[must_use]
    pub fn token(&self) -> &CancellationToken {
        &self.inner
    }
}
