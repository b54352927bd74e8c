//! Gregory-Leibniz series compute unit.
//!
//! pi = 4/1 - 4/3 + 4/5 - 4/7 + ...
//!
//! Each invocation sums the terms whose denominators fall in the item's
//! half-open range, so disjoint items produce disjoint slices of the series
//! and their partial sums add up to the full prefix sum.

use crate::compute::{ComputeUnit, PiError};
use crate::progress::CancellationToken;
use crate::range::WorkItem;

/// Steps between cancellation checkpoints inside the summation loop.
const CANCEL_CHECK_INTERVAL: u64 = 65_536;

/// The Gregory-Leibniz series, slowly convergent but embarrassingly
/// parallel: term k depends on nothing but k.
#[derive(Debug, Clone, Copy, Default)]
pub struct GregoryLeibniz;

impl GregoryLeibniz {
    /// Create a new series unit.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ComputeUnit for GregoryLeibniz {
    #[allow(clippy::cast_precision_loss)]
    fn compute(&self, cancel: &CancellationToken, item: WorkItem) -> Result<f64, PiError> {
        // First odd denominator at or above the range start; term (k-1)/2
        // fixes the sign, so a slice starting mid-series stays aligned with
        // the alternation.
        let mut k = item.start().max(1);
        if k % 2 == 0 {
            k += 1;
        }
        let mut sign = if ((k - 1) / 2) % 2 == 0 { 1.0 } else { -1.0 };

        let mut sum = 0.0f64;
        let mut steps = 0u64;
        while k < item.end() {
            sum += sign * 4.0 / (k as f64);
            sign = -sign;
            k += 2;

            steps += 1;
            if steps % CANCEL_CHECK_INTERVAL == 0 {
                cancel.check_cancelled()?;
            }
        }
        Ok(sum)
    }

    fn name(&self) -> &str {
        "GregoryLeibniz"
    }
}
