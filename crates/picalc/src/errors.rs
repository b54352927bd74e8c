//! Error handling and exit codes.

use picalc_core::compute::PiError;
use picalc_core::constants::exit_codes;
use picalc_orchestration::coordinator::CoordinationError;

/// Handle a run error and return the appropriate exit code.
pub fn handle_error(err: &CoordinationError) -> i32 {
    match err {
        CoordinationError::Compute {
            source: PiError::Cancelled,
            ..
        } => exit_codes::ERROR_CANCELED,
        CoordinationError::Compute { .. } | CoordinationError::Disconnected { .. } => {
            exit_codes::ERROR_GENERIC
        }
        CoordinationError::Timeout { .. } => exit_codes::ERROR_TIMEOUT,
        CoordinationError::Config(_) => exit_codes::ERROR_CONFIG,
    }
}
