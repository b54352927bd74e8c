//! The `ComputeUnit` trait and the core error type.
//!
//! `ComputeUnit` is the seam between the orchestration layer and whatever
//! actually produces a partial sum: the coordinator dispatches one invocation
//! per work item and never looks behind the trait.

use crate::progress::CancellationToken;
use crate::range::WorkItem;

/// Error type for partial-sum computations and run coordination.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PiError {
    /// A computation error occurred inside a compute unit.
    #[error("compute error: {0}")]
    Compute(String),

    /// Configuration error (malformed range, bad worker count).
    #[error("configuration error: {0}")]
    Config(String),

    /// Computation was cancelled.
    #[error("computation cancelled")]
    Cancelled,

    /// Computation timed out.
    #[error("computation timed out after {0}")]
    Timeout(String),
}

/// One unit of partial-sum computation, invoked once per [`WorkItem`].
///
/// Contract: given an item with `start <= end`, produce the partial value for
/// that half-open range, or an error, exactly once. A degenerate item
/// (`start == end`) must yield `Ok(0.0)`, never an error. Implementations
/// should check `cancel` periodically and bail out with
/// [`PiError::Cancelled`] once it fires.
pub trait ComputeUnit: Send + Sync {
    /// Compute the partial sum for `item`.
    fn compute(&self, cancel: &CancellationToken, item: WorkItem) -> Result<f64, PiError>;

    /// Get the name of this compute unit.
    fn name(&self) -> &str;
}
