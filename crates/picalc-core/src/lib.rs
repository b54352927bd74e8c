//! # picalc-core
//!
//! Core library for PiCalc-rs: work-range partitioning, the `ComputeUnit`
//! seam invoked by the orchestration layer, and the bundled Gregory-Leibniz
//! series implementation.

pub mod compute;
pub mod constants;
pub mod leibniz;
pub mod progress;
pub mod range;

// Re-exports
pub use compute::{ComputeUnit, PiError};
pub use constants::{exit_codes, DEFAULT_RANGE_END, DEFAULT_WORKERS, PI_REFERENCE};
pub use leibniz::GregoryLeibniz;
pub use progress::{CancellationToken, DeadlineToken};
pub use range::{default_partition, partition_range, WorkItem};
