//! # picalc-orchestration
//!
//! Fan-out/fan-in coordination: dispatch one worker per work item, collect
//! partial sums over a channel, and emit exactly one final report.

pub mod coordinator;

pub use coordinator::{collect, dispatch, run, Completion, CoordinationError, RunSummary};
