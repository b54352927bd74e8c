//! Application entry point and dispatch.

use std::sync::Arc;

use tracing::info;

use picalc_core::compute::{ComputeUnit, PiError};
use picalc_core::leibniz::GregoryLeibniz;
use picalc_core::progress::CancellationToken;
use picalc_orchestration::coordinator::{self, CoordinationError};

use crate::config::AppConfig;
use crate::output::present_summary;

/// Run the application.
pub fn run(config: &AppConfig) -> Result<(), CoordinationError> {
    let items = config.partition().map_err(config_error)?;
    let timeout = config.timeout_duration().map_err(config_error)?;

    let unit: Arc<dyn ComputeUnit> = Arc::new(GregoryLeibniz::new());
    let cancel = CancellationToken::new();

    // Set up Ctrl+C handler
    let cancel_clone = cancel.clone();
    ctrlc_handler(cancel_clone);

    if config.verbose && !config.quiet {
        for (index, item) in items.iter().enumerate() {
            println!("worker [{index}] computing: {item}");
        }
    }

    let summary = coordinator::run(&unit, &items, &cancel, timeout)?;
    info!(
        total = summary.total,
        items = summary.items,
        duration = ?summary.duration,
        "run complete"
    );

    present_summary(&summary, config.quiet, config.verbose);
    Ok(())
}

fn config_error(err: PiError) -> CoordinationError {
    match err {
        PiError::Config(msg) => CoordinationError::Config(msg),
        other => CoordinationError::Config(other.to_string()),
    }
}

fn ctrlc_handler(cancel: CancellationToken) {
    ctrlc::set_handler(move || {
        cancel.cancel();
    })
    .expect("Error setting Ctrl+C handler");
}
