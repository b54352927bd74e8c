//! CLI result presentation.

use picalc_core::PI_REFERENCE;
use picalc_orchestration::coordinator::RunSummary;

/// Print the final report: the pi reference line and the computed total.
pub fn present_summary(summary: &RunSummary, quiet: bool, verbose: bool) {
    if quiet {
        println!("{}", summary.total);
        return;
    }

    println!("PI target:  {PI_REFERENCE}");
    println!("Final Sum:  {}", summary.total);

    if verbose {
        println!(
            "({} work items in {:.3?})",
            summary.items, summary.duration
        );
    }
}
