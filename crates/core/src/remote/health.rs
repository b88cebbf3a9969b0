//! Background health monitor for the remote backend
//!
//! Probes the backend on a fixed interval, independent of user-triggered
//! operations, and folds every result into the shared [`RemoteMetrics`]:
//! - Success records the response time, clears the failure streak and marks
//!   the backend healthy
//! - Failure (including a probe timeout) records the elapsed time anyway and
//!   extends the streak: degraded from 1 failure, unhealthy from 3
//!
//! An initial probe runs as soon as the monitor starts.
//!
//! # Lifecycle
//!
//! The monitor owns its task handle. `start()` spawns the worker, `stop()`
//! cancels it through a [`CancellationToken`] and joins it with a 5 second
//! bound.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use trackvault_domain::constants::{DEFAULT_HEALTH_INTERVAL_SECS, DEFAULT_PROBE_TIMEOUT_SECS};
use trackvault_domain::{HealthSnapshot, HealthStatus, Result, TrackVaultError};

use super::metrics::{RemoteMetrics, StatusTransition};
use super::ports::{HealthProbe, HealthStatusListener};

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Probe cadence and per-probe timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthMonitorConfig {
    pub interval: Duration,
    pub probe_timeout: Duration,
}

impl Default for HealthMonitorConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_HEALTH_INTERVAL_SECS),
            probe_timeout: Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS),
        }
    }
}

/// Shared state used by both `probe_once` and the background worker.
#[derive(Clone)]
struct ProbeContext {
    probe: Arc<dyn HealthProbe>,
    metrics: Arc<RemoteMetrics>,
    listener: Option<Arc<dyn HealthStatusListener>>,
    probe_timeout: Duration,
}

impl ProbeContext {
    async fn run(&self) -> StatusTransition {
        let started = Instant::now();
        let result = tokio::time::timeout(self.probe_timeout, self.probe.probe()).await;
        let elapsed = started.elapsed();

        let transition = match result {
            Ok(Ok(report)) => {
                debug!(elapsed_ms = millis(elapsed), "health probe succeeded");
                self.metrics.record_probe_success(elapsed, report)
            }
            Ok(Err(error)) => {
                warn!(error = %error, elapsed_ms = millis(elapsed), "health probe failed");
                self.metrics.record_probe_failure(elapsed)
            }
            Err(_) => {
                warn!(timeout_ms = millis(self.probe_timeout), "health probe timed out");
                self.metrics.record_probe_failure(elapsed)
            }
        };

        if transition.changed() {
            info!(
                previous_status = %transition.previous,
                new_status = %transition.current,
                consecutive_failures = self.metrics.consecutive_failures(),
                "backend health status changed"
            );
            if let Some(listener) = &self.listener {
                listener.on_health_changed(transition.previous, transition.current).await;
            }
        }

        transition
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Detached handle running on-demand probes against the monitor's metrics
/// and listener.
#[derive(Clone)]
pub struct ProbeHandle {
    context: ProbeContext,
}

impl ProbeHandle {
    pub async fn probe_once(&self) -> HealthStatus {
        self.context.run().await.current
    }
}

/// Health monitor with explicit lifecycle
pub struct HealthMonitor {
    context: ProbeContext,
    interval: Duration,
    task_handle: Option<JoinHandle<()>>,
    cancellation: CancellationToken,
}

impl HealthMonitor {
    pub fn new(
        probe: Arc<dyn HealthProbe>,
        metrics: Arc<RemoteMetrics>,
        config: HealthMonitorConfig,
    ) -> Self {
        Self {
            context: ProbeContext { probe, metrics, listener: None, probe_timeout: config.probe_timeout },
            interval: config.interval,
            task_handle: None,
            cancellation: CancellationToken::new(),
        }
    }

    /// Forward status transitions to `listener`.
    pub fn with_listener(mut self, listener: Arc<dyn HealthStatusListener>) -> Self {
        self.set_listener(listener);
        self
    }

    /// Takes effect on the next `start()`; a running worker keeps its listener.
    pub fn set_listener(&mut self, listener: Arc<dyn HealthStatusListener>) {
        self.context.listener = Some(listener);
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start background monitoring.
    ///
    /// Fails with [`TrackVaultError::Internal`] when already running.
    pub fn start(&mut self) -> Result<()> {
        if self.task_handle.is_some() {
            return Err(TrackVaultError::Internal("Health monitor already running".to_string()));
        }

        // a stopped monitor can be restarted with a fresh token
        self.cancellation = CancellationToken::new();
        let cancel = self.cancellation.clone();
        let context = self.context.clone();
        let interval = self.interval;

        info!(
            interval_secs = interval.as_secs(),
            probe_timeout_secs = context.probe_timeout.as_secs(),
            "starting backend health monitor"
        );

        self.task_handle = Some(tokio::spawn(health_worker(context, interval, cancel)));
        Ok(())
    }

    /// Stop background monitoring and wait for the worker to exit.
    pub async fn stop(&mut self) -> Result<()> {
        self.cancellation.cancel();

        if let Some(mut handle) = self.task_handle.take() {
            match tokio::time::timeout(SHUTDOWN_TIMEOUT, &mut handle).await {
                Ok(joined) => {
                    joined.map_err(|e| TrackVaultError::Internal(format!("Task join failed: {e}")))?;
                }
                Err(_) => {
                    handle.abort();
                    warn!("health monitor worker did not stop in time, aborted");
                    return Err(TrackVaultError::Internal(
                        "Health monitor shutdown timeout".to_string(),
                    ));
                }
            }
            info!("backend health monitor stopped");
        }

        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.task_handle.is_some() && !self.cancellation.is_cancelled()
    }

    /// Run one probe right now, outside the schedule.
    pub async fn probe_once(&self) -> HealthStatus {
        self.context.run().await.current
    }

    /// Handle for on-demand probes that does not borrow the monitor.
    pub fn probe_handle(&self) -> ProbeHandle {
        ProbeHandle { context: self.context.clone() }
    }

    pub fn snapshot(&self) -> HealthSnapshot {
        self.context.metrics.health_snapshot()
    }
}

async fn health_worker(context: ProbeContext, interval: Duration, cancel: CancellationToken) {
    // first tick completes immediately, giving the initial probe
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("health monitor worker shutting down");
                break;
            }
            _ = ticker.tick() => {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = context.run() => {}
                }
            }
        }
    }
}
