//! Application configuration from CLI flags and environment.

use clap::Parser;

use picalc_core::compute::PiError;
use picalc_core::range::{default_partition, partition_range, WorkItem};
use picalc_core::{DEFAULT_RANGE_END, DEFAULT_WORKERS};

/// PiCalc-rs — concurrent pi approximation via fan-out/fan-in partial sums.
#[derive(Parser, Debug, Default)]
#[command(name = "picalc", version, about)]
pub struct AppConfig {
    /// Upper bound of the computation range.
    #[arg(short = 'e', long, env = "PICALC_RANGE_END")]
    pub range_end: Option<u64>,

    /// Number of workers to split the range across.
    #[arg(short, long, env = "PICALC_WORKERS")]
    pub workers: Option<usize>,

    /// Timeout duration (e.g., "30s", "5m").
    #[arg(long, default_value = "5m")]
    pub timeout: String,

    /// Verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet mode (only output the computed total).
    #[arg(short, long)]
    pub quiet: bool,
}

impl AppConfig {
    /// Parse CLI arguments.
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Build the work partition this run will dispatch.
    ///
    /// With no range or worker flags the built-in partition is used; any
    /// explicit flag switches to an even split, with defaults filling the
    /// other dimension. Fails fast on a bad worker count, before dispatch.
    pub fn partition(&self) -> Result<Vec<WorkItem>, PiError> {
        if self.range_end.is_none() && self.workers.is_none() {
            return Ok(default_partition());
        }
        partition_range(
            self.range_end.unwrap_or(DEFAULT_RANGE_END),
            self.workers.unwrap_or(DEFAULT_WORKERS),
        )
    }

    /// Parse the timeout string into a Duration.
    ///
    /// A malformed value is a configuration error, surfaced before any
    /// dispatch rather than silently replaced with a default.
    pub fn timeout_duration(&self) -> Result<std::time::Duration, PiError> {
        parse_duration(&self.timeout)
            .ok_or_else(|| PiError::Config(format!("invalid timeout: {:?}", self.timeout)))
    }
}

/// Parse a duration string like "5m", "1h", "30s".
fn parse_duration(s: &str) -> Option<std::time::Duration> {
    let s = s.trim();
    if let Some(mins) = s.strip_suffix('m') {
        let n: u64 = mins.parse().ok()?;
        Some(std::time::Duration::from_secs(n * 60))
    } else if let Some(hours) = s.strip_suffix('h') {
        let n: u64 = hours.parse().ok()?;
        Some(std::time::Duration::from_secs(n * 3600))
    } else if let Some(ms) = s.strip_suffix("ms") {
        let n: u64 = ms.parse().ok()?;
        Some(std::time::Duration::from_millis(n))
    } else if let Some(secs) = s.strip_suffix('s') {
        let n: u64 = secs.parse().ok()?;
        Some(std::time::Duration::from_secs(n))
    } else {
        let n: u64 = s.parse().ok()?;
        Some(std::time::Duration::from_secs(n))
    }
}
