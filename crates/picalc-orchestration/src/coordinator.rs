//! Core coordination: concurrent fan-out of work items and single-consumer
//! fan-in of their partial sums.
//!
//! All accumulation state lives in [`collect`], which is the only consumer of
//! the fan-in channel. Workers never touch shared mutable state; they send one
//! [`Completion`] each and exit. The final total is the buffered partials
//! summed in work-item order, so the reported value does not depend on which
//! worker finished first.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use tracing::{debug, warn};

use picalc_core::compute::{ComputeUnit, PiError};
use picalc_core::progress::{CancellationToken, DeadlineToken};
use picalc_core::range::WorkItem;

/// One completion notification from a worker, exactly one per dispatched item.
#[derive(Debug, Clone)]
pub struct Completion {
    /// Position of the work item in the dispatched sequence.
    pub index: usize,
    /// The partial sum, or the error that ended the computation.
    pub outcome: Result<f64, PiError>,
}

/// Final report of a successful run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Sum of all partial results, accumulated in work-item order.
    pub total: f64,
    /// Number of work items that contributed.
    pub items: usize,
    /// Wall-clock time from first dispatch to last completion.
    pub duration: Duration,
}

/// Errors that terminate a run.
#[derive(Debug, thiserror::Error)]
pub enum CoordinationError {
    /// A work item's computation failed; the run aborts on first failure.
    #[error("work item {index} {item} failed: {source}")]
    Compute {
        /// Position of the failing item.
        index: usize,
        /// Bounds of the failing item.
        item: WorkItem,
        /// The underlying compute error.
        #[source]
        source: PiError,
    },

    /// The deadline passed with work items still outstanding.
    #[error("run timed out with {outstanding} work items outstanding")]
    Timeout {
        /// Items that had not reported when the deadline passed.
        outstanding: usize,
    },

    /// All senders vanished before every item reported (a worker died
    /// without sending its completion).
    #[error("fan-in channel disconnected with {outstanding} work items outstanding")]
    Disconnected {
        /// Items that had not reported at disconnect.
        outstanding: usize,
    },

    /// The run was misconfigured before any dispatch happened.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Fan-out: spawn one worker thread per work item.
///
/// Each worker invokes the compute unit once and sends exactly one
/// [`Completion`]. A send failure means the consumer already aborted; the
/// straggler's result is discarded, which is the intended post-abort behavior.
pub fn dispatch(
    unit: &Arc<dyn ComputeUnit>,
    items: &[WorkItem],
    cancel: &CancellationToken,
    tx: &Sender<Completion>,
) {
    for (index, item) in items.iter().copied().enumerate() {
        let unit = Arc::clone(unit);
        let cancel = cancel.clone();
        let tx = tx.clone();
        thread::spawn(move || {
            debug!(index, %item, unit = unit.name(), "worker computing");
            let outcome = unit.compute(&cancel, item);
            let _ = tx.send(Completion { index, outcome });
        });
    }
}

/// Fan-in: consume completions until every item has reported or one fails.
///
/// This function owns the accumulator and the completion state outright, so
/// no synchronization is needed beyond the channel itself. It returns exactly
/// one result per call:
///
/// - every item reported success: `Ok` with the total summed in item order;
/// - any item reported failure: `Err(Compute)` naming the item, after
///   cancelling the token so in-flight workers stop at their next checkpoint;
/// - the deadline passed first: `Err(Timeout)`, also cancelling;
/// - duplicate or out-of-range completions are protocol violations: logged
///   and ignored, never double-counted.
pub fn collect(
    rx: &Receiver<Completion>,
    items: &[WorkItem],
    deadline: &DeadlineToken,
) -> Result<RunSummary, CoordinationError> {
    let n = items.len();
    let started = Instant::now();
    let mut partials: Vec<Option<f64>> = vec![None; n];
    let mut remaining = n;
    let mut running_total = 0.0f64;

    while remaining > 0 {
        let completion = match rx.recv_timeout(deadline.remaining()) {
            Ok(c) => c,
            Err(RecvTimeoutError::Timeout) => {
                deadline.token().cancel();
                return Err(CoordinationError::Timeout {
                    outstanding: remaining,
                });
            }
            Err(RecvTimeoutError::Disconnected) => {
                return Err(CoordinationError::Disconnected {
                    outstanding: remaining,
                });
            }
        };

        let Completion { index, outcome } = completion;
        if index >= n {
            warn!(index, total_items = n, "completion for unknown work item ignored");
            continue;
        }

        match outcome {
            Ok(value) => {
                if partials[index].is_some() {
                    warn!(index, value, "duplicate completion ignored");
                    continue;
                }
                partials[index] = Some(value);
                running_total += value;
                remaining -= 1;
                debug!(index, value, running_total, remaining, "partial result received");
            }
            Err(source) => {
                // A second report for an item that already succeeded is a
                // protocol violation like any other duplicate; it must not
                // abort a run whose real completions are all fine.
                if partials[index].is_some() {
                    warn!(index, %source, "duplicate failure completion ignored");
                    continue;
                }
                deadline.token().cancel();
                return Err(CoordinationError::Compute {
                    index,
                    item: items[index],
                    source,
                });
            }
        }
    }

    // Index-order summation makes the reported total independent of the
    // completion interleaving. The running total above is trace-only.
    let total: f64 = partials.iter().flatten().sum();
    Ok(RunSummary {
        total,
        items: n,
        duration: started.elapsed(),
    })
}

/// Dispatch all work items and collect their results.
pub fn run(
    unit: &Arc<dyn ComputeUnit>,
    items: &[WorkItem],
    cancel: &CancellationToken,
    timeout: Duration,
) -> Result<RunSummary, CoordinationError> {
    if items.is_empty() {
        return Err(CoordinationError::Config("no work items to dispatch".into()));
    }

    let deadline = DeadlineToken::new(cancel.clone(), timeout);
    let (tx, rx) = crossbeam_channel::unbounded();
    dispatch(unit, items, cancel, &tx);
    // Our sender handle must go away so a dead worker surfaces as a
    // disconnect instead of a timeout.
    drop(tx);
    collect(&rx, items, &deadline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use picalc_core::leibniz::GregoryLeibniz;
    use picalc_core::range::{default_partition, partition_range};

    const TIMEOUT: Duration = Duration::from_secs(30);

    /// Mock unit returning a fixed value for every item.
    struct FixedUnit(f64);

    impl ComputeUnit for FixedUnit {
        fn compute(&self, _cancel: &CancellationToken, _item: WorkItem) -> Result<f64, PiError> {
            Ok(self.0)
        }
        fn name(&self) -> &str {
            "Fixed"
        }
    }

    /// Mock unit failing for one specific item index (by matching its start).
    struct FailAt {
        fail_start: u64,
    }

    impl ComputeUnit for FailAt {
        fn compute(&self, _cancel: &CancellationToken, item: WorkItem) -> Result<f64, PiError> {
            if item.start() == self.fail_start {
                Err(PiError::Compute("injected failure".into()))
            } else {
                Ok(1.0)
            }
        }
        fn name(&self) -> &str {
            "FailAt"
        }
    }

    fn items(n: usize) -> Vec<WorkItem> {
        partition_range(n as u64 * 100, n).unwrap()
    }

    fn feed(
        items: &[WorkItem],
        completions: Vec<Completion>,
    ) -> Result<RunSummary, CoordinationError> {
        let (tx, rx) = crossbeam_channel::unbounded();
        for c in completions {
            tx.send(c).unwrap();
        }
        drop(tx);
        let deadline = DeadlineToken::new(CancellationToken::new(), TIMEOUT);
        collect(&rx, items, &deadline)
    }

    fn success(index: usize, value: f64) -> Completion {
        Completion {
            index,
            outcome: Ok(value),
        }
    }

    #[test]
    fn end_to_end_fixed_unit_over_default_partition() {
        let unit: Arc<dyn ComputeUnit> = Arc::new(FixedUnit(1.0));
        let items = default_partition();
        let summary = run(&unit, &items, &CancellationToken::new(), TIMEOUT).unwrap();
        assert_eq!(summary.items, 5);
        assert!((summary.total - 5.0).abs() < 1e-9);
    }

    #[test]
    fn single_item_reports_once() {
        let unit: Arc<dyn ComputeUnit> = Arc::new(FixedUnit(2.5));
        let items = items(1);
        let summary = run(&unit, &items, &CancellationToken::new(), TIMEOUT).unwrap();
        assert!((summary.total - 2.5).abs() < 1e-9);
    }

    #[test]
    fn accumulation_is_order_independent() {
        let values = [0.1, 0.2, 0.3, 0.4, 0.5];
        let expected: f64 = values.iter().sum();
        let items = items(5);

        let forward: Vec<Completion> =
            (0..5).map(|i| success(i, values[i])).collect();
        let reverse: Vec<Completion> =
            (0..5).rev().map(|i| success(i, values[i])).collect();
        let shuffled: Vec<Completion> = [2usize, 0, 4, 1, 3]
            .iter()
            .map(|&i| success(i, values[i]))
            .collect();

        for order in [forward, reverse, shuffled] {
            let summary = feed(&items, order).unwrap();
            assert!((summary.total - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn ordered_summation_is_bit_exact_across_interleavings() {
        // Values chosen so as-completed float addition would differ in the
        // last bits between orders; index-order summation must not.
        let values = [1e16, 1.0, -1e16, 1.0, 1.0];
        let items = items(5);

        let forward: Vec<Completion> =
            (0..5).map(|i| success(i, values[i])).collect();
        let reverse: Vec<Completion> =
            (0..5).rev().map(|i| success(i, values[i])).collect();

        let a = feed(&items, forward).unwrap().total;
        let b = feed(&items, reverse).unwrap().total;
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn fail_fast_at_first_middle_and_last() {
        for fail_index in [0usize, 2, 4] {
            let items = items(5);
            let unit: Arc<dyn ComputeUnit> = Arc::new(FailAt {
                fail_start: items[fail_index].start(),
            });
            let err = run(&unit, &items, &CancellationToken::new(), TIMEOUT).unwrap_err();
            match err {
                CoordinationError::Compute { index, item, .. } => {
                    assert_eq!(index, fail_index);
                    assert_eq!(item, items[fail_index]);
                }
                other => panic!("expected Compute error, got {other}"),
            }
        }
    }

    #[test]
    fn failure_cancels_outstanding_work() {
        let items = items(5);
        let unit: Arc<dyn ComputeUnit> = Arc::new(FailAt {
            fail_start: items[0].start(),
        });
        let cancel = CancellationToken::new();
        let _ = run(&unit, &items, &cancel, TIMEOUT).unwrap_err();
        assert!(cancel.is_cancelled());
    }

    #[test]
    fn duplicate_completion_is_ignored() {
        let items = items(3);
        let completions = vec![
            success(0, 1.0),
            success(1, 2.0),
            success(1, 2.0), // duplicate, must not double-count
            success(2, 3.0),
        ];
        let summary = feed(&items, completions).unwrap();
        assert!((summary.total - 6.0).abs() < 1e-9);
        assert_eq!(summary.items, 3);
    }

    #[test]
    fn duplicate_failure_after_success_is_ignored() {
        let items = items(2);
        let completions = vec![
            success(0, 1.0),
            Completion {
                index: 0,
                outcome: Err(PiError::Compute("spurious".into())),
            },
            success(1, 2.0),
        ];
        let summary = feed(&items, completions).unwrap();
        assert!((summary.total - 3.0).abs() < 1e-9);
    }

    #[test]
    fn first_failure_for_an_item_still_aborts() {
        // The duplicate guard must not swallow a genuine first failure.
        let items = items(2);
        let completions = vec![
            success(1, 2.0),
            Completion {
                index: 0,
                outcome: Err(PiError::Compute("real".into())),
            },
        ];
        let err = feed(&items, completions).unwrap_err();
        assert!(matches!(err, CoordinationError::Compute { index: 0, .. }));
    }

    #[test]
    fn out_of_range_completion_is_ignored() {
        let items = items(2);
        let completions = vec![success(7, 100.0), success(0, 1.0), success(1, 2.0)];
        let summary = feed(&items, completions).unwrap();
        assert!((summary.total - 3.0).abs() < 1e-9);
    }

    #[test]
    fn timeout_when_workers_never_report() {
        let items = items(3);
        let (tx, rx) = crossbeam_channel::unbounded::<Completion>();
        let deadline = DeadlineToken::new(CancellationToken::new(), Duration::from_millis(20));
        let err = collect(&rx, &items, &deadline).unwrap_err();
        assert!(matches!(
            err,
            CoordinationError::Timeout { outstanding: 3 }
        ));
        assert!(deadline.token().is_cancelled());
        drop(tx);
    }

    #[test]
    fn disconnect_before_all_reports_is_an_error() {
        let items = items(3);
        let completions = vec![success(0, 1.0)];
        let err = feed(&items, completions).unwrap_err();
        assert!(matches!(
            err,
            CoordinationError::Disconnected { outstanding: 2 }
        ));
    }

    #[test]
    fn empty_partition_is_rejected_before_dispatch() {
        let unit: Arc<dyn ComputeUnit> = Arc::new(FixedUnit(1.0));
        let err = run(&unit, &[], &CancellationToken::new(), TIMEOUT).unwrap_err();
        assert!(matches!(err, CoordinationError::Config(_)));
    }

    #[test]
    fn degenerate_item_contributes_zero_through_series() {
        let unit: Arc<dyn ComputeUnit> = Arc::new(GregoryLeibniz::new());
        let items = vec![
            WorkItem::new(0, 10_000).unwrap(),
            WorkItem::new(10_000, 10_000).unwrap(),
        ];
        let summary = run(&unit, &items, &CancellationToken::new(), TIMEOUT).unwrap();

        let whole = run(
            &unit,
            &[WorkItem::new(0, 10_000).unwrap()],
            &CancellationToken::new(),
            TIMEOUT,
        )
        .unwrap();
        assert!((summary.total - whole.total).abs() < 1e-12);
    }

    #[test]
    fn series_partition_approximates_pi() {
        let unit: Arc<dyn ComputeUnit> = Arc::new(GregoryLeibniz::new());
        let items = partition_range(4_000_000, 4).unwrap();
        let summary = run(&unit, &items, &CancellationToken::new(), TIMEOUT).unwrap();
        assert!((summary.total - std::f64::consts::PI).abs() < 1e-6);
    }
}
