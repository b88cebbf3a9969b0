//! Periodic refresh of the operator monitoring view.
//!
//! Reads `get_metrics()`, `get_operation_queue()` and the health snapshot
//! from a [`ResilienceLayer`] every poll interval and publishes the result on
//! a `tokio::sync::watch` channel. Subscribers are woken only when the view
//! actually changed, which keeps an idle backend quiet.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};
use trackvault_core::ResilienceLayer;
use trackvault_domain::{HealthSnapshot, MetricsSnapshot, Operation};

use crate::scheduling::error::{SchedulerError, SchedulerResult};

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Everything the monitoring panel renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonitoringView {
    pub metrics: MetricsSnapshot,
    pub operations: Vec<Operation>,
    pub health: HealthSnapshot,
}

impl MonitoringView {
    pub fn capture(layer: &ResilienceLayer) -> Self {
        Self {
            metrics: layer.get_metrics(),
            operations: layer.get_operation_queue(),
            health: layer.health_snapshot(),
        }
    }
}

/// Publishes [`MonitoringView`] snapshots at a fixed interval.
pub struct MonitorPoller {
    layer: Arc<ResilienceLayer>,
    interval: Duration,
    sender: Arc<watch::Sender<MonitoringView>>,
    cancellation_token: CancellationToken,
    task_handle: Option<JoinHandle<()>>,
}

impl MonitorPoller {
    pub fn new(layer: Arc<ResilienceLayer>, interval: Duration) -> Self {
        let (sender, _) = watch::channel(MonitoringView::capture(&layer));
        Self {
            layer,
            interval,
            sender: Arc::new(sender),
            cancellation_token: CancellationToken::new(),
            task_handle: None,
        }
    }

    /// Receiver that always holds the latest view.
    pub fn subscribe(&self) -> watch::Receiver<MonitoringView> {
        self.sender.subscribe()
    }

    pub fn latest(&self) -> MonitoringView {
        self.sender.borrow().clone()
    }

    /// Start polling; the first refresh happens immediately.
    ///
    /// # Errors
    ///
    /// Returns error if the poller is already running
    #[instrument(skip(self), fields(interval_secs = self.interval.as_secs()))]
    pub fn start(&mut self) -> SchedulerResult<()> {
        if self.is_running() {
            return Err(SchedulerError::AlreadyRunning);
        }

        // fresh token so a stopped poller can be restarted
        self.cancellation_token = CancellationToken::new();
        let cancel = self.cancellation_token.clone();
        let layer = Arc::clone(&self.layer);
        let sender = Arc::clone(&self.sender);
        let interval = self.interval;

        self.task_handle = Some(tokio::spawn(poll_loop(layer, sender, interval, cancel)));
        info!("Monitor poller started");
        Ok(())
    }

    /// Stop polling and wait for the task to finish.
    ///
    /// # Errors
    ///
    /// Returns error if the poller is not running or does not stop in time
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> SchedulerResult<()> {
        let Some(handle) = self.task_handle.take() else {
            return Err(SchedulerError::NotRunning);
        };

        self.cancellation_token.cancel();
        tokio::time::timeout(SHUTDOWN_TIMEOUT, handle)
            .await
            .map_err(|_| SchedulerError::Timeout { seconds: SHUTDOWN_TIMEOUT.as_secs() })??;

        info!("Monitor poller stopped");
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.task_handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }
}

async fn poll_loop(
    layer: Arc<ResilienceLayer>,
    sender: Arc<watch::Sender<MonitoringView>>,
    interval: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("Monitor poll loop cancelled");
                break;
            }
            _ = ticker.tick() => {
                let view = MonitoringView::capture(&layer);
                let changed = sender.send_if_modified(|current| {
                    if *current == view {
                        return false;
                    }
                    *current = view;
                    true
                });
                debug!(changed, in_flight = layer.registry().len(), "Monitoring view refreshed");
            }
        }
    }
}
