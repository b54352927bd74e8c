//! Work items and range partitioning.
//!
//! A [`WorkItem`] is one half-open slice `[start, end)` of the total
//! computation range. The partitioner produces an ordered sequence of items
//! that covers the requested range with no gaps and no overlaps; the item's
//! position in that sequence is its identity for logging purposes.

use std::fmt;

use crate::compute::PiError;
use crate::constants::DEFAULT_PARTITION_BOUNDS;

/// One unit of dispatched work: a half-open range `[start, end)`.
///
/// Immutable once created. `start == end` is a valid degenerate item and
/// contributes a partial sum of zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkItem {
    start: u64,
    end: u64,
}

impl WorkItem {
    /// Create a work item, failing fast on `start > end`.
    ///
    /// Bounds are never clamped or reordered: a malformed range is a
    /// configuration error surfaced before any dispatch occurs.
    pub fn new(start: u64, end: u64) -> Result<Self, PiError> {
        if start > end {
            return Err(PiError::Config(format!(
                "invalid range: start {start} > end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Lower bound (inclusive).
    #[must_use]
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Upper bound (exclusive).
    #[must_use]
    pub fn end(&self) -> u64 {
        self.end
    }

    /// Number of integers covered by this item.
    #[must_use]
    pub fn width(&self) -> u64 {
        self.end - self.start
    }

    /// Whether this item covers no integers at all.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Split `[0, end)` evenly across `workers` items.
///
/// The remainder of an uneven division is folded into the last item, so the
/// union of all items is exactly `[0, end)` with no gaps and no overlaps.
/// `workers == 0` is a configuration error; `end == 0` yields `workers`
/// degenerate items rather than failing, mirroring the degenerate-range
/// policy of [`WorkItem`].
pub fn partition_range(end: u64, workers: usize) -> Result<Vec<WorkItem>, PiError> {
    if workers == 0 {
        return Err(PiError::Config("worker count must be at least 1".into()));
    }

    let workers_u64 = workers as u64;
    let chunk = end / workers_u64;
    let mut items = Vec::with_capacity(workers);
    for i in 0..workers_u64 {
        let start = i * chunk;
        let stop = if i == workers_u64 - 1 { end } else { start + chunk };
        items.push(WorkItem::new(start, stop)?);
    }
    Ok(items)
}

/// The built-in partition: four million-wide slices plus a degenerate tail.
#[must_use]
pub fn default_partition() -> Vec<WorkItem> {
    DEFAULT_PARTITION_BOUNDS
        .iter()
        .map(|&(start, end)| WorkItem { start, end })
        .collect()
}
