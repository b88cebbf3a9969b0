//! Composition of the remote-operation components behind one handle.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::info;
use trackvault_common::RetryConfig;
use trackvault_domain::{
    Config, HealthSnapshot, HealthStatus, MetricsSnapshot, Operation, OperationKind, Result,
    TrackVaultError,
};

use super::batch::{BatchExecutor, BatchOperation, BatchOutcome};
use super::breaker::CircuitBreaker;
use super::health::{HealthMonitor, HealthMonitorConfig};
use super::metrics::RemoteMetrics;
use super::ports::{HealthProbe, HealthStatusListener};
use super::registry::OperationRegistry;
use super::retry::RetryExecutor;

/// Validated settings for a [`ResilienceLayer`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResilienceConfig {
    pub retry: RetryConfig,
    pub health: HealthMonitorConfig,
    pub breaker_failure_threshold: u32,
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            retry: RetryConfig::default(),
            health: HealthMonitorConfig::default(),
            breaker_failure_threshold: trackvault_domain::constants::BREAKER_FAILURE_THRESHOLD,
        }
    }
}

impl TryFrom<&Config> for ResilienceConfig {
    type Error = TrackVaultError;

    fn try_from(config: &Config) -> Result<Self> {
        let settings = &config.retry;
        let mut builder = RetryConfig::builder()
            .max_retries(settings.max_retries)
            .base_delay(Duration::from_millis(settings.base_delay_ms))
            .max_delay(Duration::from_millis(settings.max_delay_ms))
            .backoff_multiplier(settings.backoff_multiplier)
            .retryable_status_codes(settings.retryable_status_codes.iter().copied());
        if let Some(timeout_ms) = settings.attempt_timeout_ms {
            builder = builder.attempt_timeout(Duration::from_millis(timeout_ms));
        }
        let retry = builder.build().map_err(|e| TrackVaultError::Config(e.to_string()))?;

        if config.health.interval_secs == 0 {
            return Err(TrackVaultError::Config("health.interval_secs must be greater than 0".into()));
        }
        if config.health.probe_timeout_secs == 0 {
            return Err(TrackVaultError::Config(
                "health.probe_timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(Self {
            retry,
            health: HealthMonitorConfig {
                interval: Duration::from_secs(config.health.interval_secs),
                probe_timeout: Duration::from_secs(config.health.probe_timeout_secs),
            },
            breaker_failure_threshold: config.health.breaker_failure_threshold,
        })
    }
}

/// Registry, metrics, executor, breaker, batch runner and health monitor
/// sharing one set of counters.
pub struct ResilienceLayer {
    registry: Arc<OperationRegistry>,
    metrics: Arc<RemoteMetrics>,
    executor: Arc<RetryExecutor>,
    breaker: CircuitBreaker,
    batch: BatchExecutor,
    monitor: Mutex<HealthMonitor>,
}

impl ResilienceLayer {
    pub fn new(config: ResilienceConfig, probe: Arc<dyn HealthProbe>) -> Self {
        let registry = Arc::new(OperationRegistry::new());
        let metrics = Arc::new(RemoteMetrics::new());
        let executor =
            Arc::new(RetryExecutor::new(config.retry, Arc::clone(&registry), Arc::clone(&metrics)));
        let breaker =
            CircuitBreaker::with_threshold(Arc::clone(&metrics), config.breaker_failure_threshold);
        let batch = BatchExecutor::new(Arc::clone(&executor));
        let monitor = HealthMonitor::new(probe, Arc::clone(&metrics), config.health);

        Self { registry, metrics, executor, breaker, batch, monitor: Mutex::new(monitor) }
    }

    /// Forward health transitions to `listener`.
    pub fn with_health_listener(mut self, listener: Arc<dyn HealthStatusListener>) -> Self {
        self.monitor.get_mut().set_listener(listener);
        self
    }

    /// Guarded, retried execution of one remote operation.
    pub async fn execute<T, F, Fut>(
        &self,
        kind: OperationKind,
        endpoint: &str,
        operation: F,
    ) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.breaker.guard(|| self.executor.execute(kind, endpoint, operation)).await
    }

    /// Best-effort execution; never fails as a whole.
    pub async fn run_batch<T, F, Fut>(&self, operations: Vec<BatchOperation<F>>) -> BatchOutcome<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.batch.run_batch(operations).await
    }

    pub fn get_metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn get_operation_queue(&self) -> Vec<Operation> {
        self.registry.snapshot()
    }

    pub fn health_snapshot(&self) -> HealthSnapshot {
        self.metrics.health_snapshot()
    }

    /// Probe the backend immediately, outside the schedule.
    ///
    /// The monitor lock is released before the probe runs, so a slow probe
    /// never delays `start` or `shutdown`.
    pub async fn probe_now(&self) -> HealthStatus {
        let handle = self.monitor.lock().await.probe_handle();
        handle.probe_once().await
    }

    pub async fn start(&self) -> Result<()> {
        self.monitor.lock().await.start()
    }

    pub async fn is_monitoring(&self) -> bool {
        self.monitor.lock().await.is_running()
    }

    /// Stop the health monitor and drop any leftover operation records.
    pub async fn shutdown(&self) -> Result<()> {
        let stopped = self.monitor.lock().await.stop().await;
        let abandoned = self.registry.len();
        self.registry.clear();
        info!(abandoned_operations = abandoned, "resilience layer shut down");
        stopped
    }

    pub fn registry(&self) -> &Arc<OperationRegistry> {
        &self.registry
    }

    pub fn metrics(&self) -> &Arc<RemoteMetrics> {
        &self.metrics
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    pub fn executor(&self) -> &Arc<RetryExecutor> {
        &self.executor
    }
}
