//! `tracing-subscriber` installation

use tracing_subscriber::EnvFilter;
use trackvault_domain::{LoggingConfig, Result, TrackVaultError};

/// Filter from `RUST_LOG` when set, otherwise from `config.level`.
///
/// # Errors
/// Returns `TrackVaultError::Config` if the configured directive is invalid.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level).map_err(|e| {
        TrackVaultError::Config(format!("Invalid log level '{}': {e}", config.level))
    })
}

/// Install the global subscriber: human-readable by default, JSON lines when
/// `config.json` is set.
///
/// # Errors
/// Fails on an invalid filter or when a global subscriber is already set.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = build_filter(config)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    let installed = if config.json {
        builder.json().with_current_span(true).try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| {
        TrackVaultError::Internal(format!("failed to install tracing subscriber: {e}"))
    })?;
    tracing::debug!(level = %config.level, json = config.json, "tracing initialised");
    Ok(())
}
