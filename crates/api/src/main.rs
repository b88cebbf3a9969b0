//! TrackVault - resilient backend access with health monitoring
//!
//! Loads configuration, installs logging, starts the health monitor and the
//! monitoring-view poller, and runs until Ctrl-C.

use anyhow::Context;
use trackvault_infra::config::loader;
use trackvault_infra::observability::init_tracing;
use trackvault_lib::AppContext;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env first so it can feed TRACKVAULT_* variables to the loader
    let dotenv = dotenvy::dotenv();

    let config = loader::load_or_default().context("failed to load configuration")?;
    init_tracing(&config.logging).context("failed to initialise logging")?;

    match dotenv {
        Ok(path) => tracing::info!(path = %path.display(), "loaded .env"),
        Err(e) => tracing::debug!(error = %e, "no .env file loaded"),
    }

    let ctx = AppContext::new_with_config(config).context("failed to build application context")?;
    ctx.start().await.context("failed to start background tasks")?;
    tracing::info!("TrackVault running, press Ctrl-C to stop");

    let mut view = ctx.view_receiver();
    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal.context("failed to listen for shutdown signal")?;
                break;
            }
            changed = view.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = view.borrow_and_update().clone();
                tracing::info!(
                    status = %current.metrics.status,
                    consecutive_failures = current.metrics.consecutive_failures,
                    total_operations = current.metrics.total_operations,
                    in_flight = current.operations.len(),
                    "monitoring view updated"
                );
            }
        }
    }

    tracing::info!("shutting down");
    ctx.shutdown().await.context("shutdown failed")?;
    Ok(())
}
