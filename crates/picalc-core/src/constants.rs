//! Constants for default work partitioning and process exit codes.

/// Reference value of pi to 80 decimal places, printed next to the computed
/// total so convergence can be eyeballed.
pub const PI_REFERENCE: &str =
    "3.14159265358979323846264338327950288419716939937510582097494459230781640628620899";

/// Upper bound of the default computation range.
pub const DEFAULT_RANGE_END: u64 = 4_000_000;

/// Default number of workers when splitting a range evenly.
pub const DEFAULT_WORKERS: usize = 4;

/// Built-in partition bounds: four million-wide slices plus a degenerate
/// final slice, matching the historical driver configuration.
pub const DEFAULT_PARTITION_BOUNDS: [(u64, u64); 5] = [
    (0, 1_000_000),
    (1_000_000, 2_000_000),
    (2_000_000, 3_000_000),
    (3_000_000, 4_000_000),
    (4_000_000, 4_000_000),
];

/// Process exit codes.
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;
    /// Generic error (including a failed compute unit).
    pub const ERROR_GENERIC: i32 = 1;
    /// Run timed out.
    pub const ERROR_TIMEOUT: i32 = 2;
    /// Invalid configuration.
    pub const ERROR_CONFIG: i32 = 4;
    /// Run cancelled by user (Ctrl+C).
    pub const ERROR_CANCELED: i32 = 130;
}
