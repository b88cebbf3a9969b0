use std::time::Duration;

use tracing::{info, warn};
use trackvault_domain::TrackVaultError;

/// Log the outcome of a command execution with structured fields.
///
/// `command` is a logical identifier such as `"monitoring::get_metrics"`;
/// never forward user data through it.
#[inline]
pub fn log_command_execution(
    command: &str,
    elapsed: Duration,
    success: bool,
    error_type: Option<&str>,
) {
    let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

    if success {
        info!(command, duration_ms, "command_execution_success");
    } else {
        let error_type = error_type.unwrap_or("unknown");
        warn!(command, duration_ms, error_type, "command_execution_failure");
    }
}

/// Convert a `TrackVaultError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &TrackVaultError) -> &'static str {
    error.label()
}
