//! Async retry executor for remote operations.
//!
//! Every call is tracked in the [`OperationRegistry`] for its whole lifetime
//! and its terminal outcome is folded into the shared [`RemoteMetrics`].

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument, warn};
use trackvault_common::{RetryConfig, RetryDecision, RetryPolicy};
use trackvault_domain::{
    new_operation_id, Operation, OperationId, OperationKind, OperationPatch, OperationStatus,
    Result, TrackVaultError,
};

use super::metrics::RemoteMetrics;
use super::policy::StatusAwarePolicy;
use super::registry::OperationRegistry;

/// Everything observed while driving one operation to completion.
#[derive(Debug)]
pub struct RetryOutcome<T> {
    pub result: Result<T>,
    /// Attempts made, including the first one.
    pub attempts: u32,
    /// Delays slept between attempts, in order.
    pub delays: Vec<Duration>,
    /// Final state of the record, already removed from the registry.
    pub operation: Operation,
}

impl<T> RetryOutcome<T> {
    pub fn into_result(self) -> Result<T> {
        self.result
    }

    pub fn total_delay(&self) -> Duration {
        self.delays.iter().sum()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.operation.last_error.as_deref()
    }
}

/// Runs operations with bounded retry and exponential backoff.
pub struct RetryExecutor<P = StatusAwarePolicy> {
    config: RetryConfig,
    policy: P,
    registry: Arc<OperationRegistry>,
    metrics: Arc<RemoteMetrics>,
}

impl RetryExecutor<StatusAwarePolicy> {
    /// Executor classifying failures against `config.retryable_status_codes`.
    pub fn new(
        config: RetryConfig,
        registry: Arc<OperationRegistry>,
        metrics: Arc<RemoteMetrics>,
    ) -> Self {
        let policy = StatusAwarePolicy::from_config(&config);
        Self::with_policy(config, policy, registry, metrics)
    }
}

impl<P> RetryExecutor<P>
where
    P: RetryPolicy<TrackVaultError>,
{
    pub fn with_policy(
        config: RetryConfig,
        policy: P,
        registry: Arc<OperationRegistry>,
        metrics: Arc<RemoteMetrics>,
    ) -> Self {
        Self { config, policy, registry, metrics }
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<OperationRegistry> {
        &self.registry
    }

    pub fn metrics(&self) -> &Arc<RemoteMetrics> {
        &self.metrics
    }

    /// Run `operation` under a freshly generated operation id.
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
        self.execute_with_id(new_operation_id(), kind, endpoint, operation).await
    }

    /// Run `operation` under a caller-supplied id.
    pub async fn execute_with_id<T, F, Fut>(
        &self,
        id: OperationId,
        kind: OperationKind,
        endpoint: &str,
        operation: F,
    ) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.execute_with_outcome(id, kind, endpoint, operation).await.into_result()
    }

    /// Run `operation` and report the attempts and delays it took.
    #[instrument(skip_all, fields(operation_id = %id, kind = %kind, endpoint = %endpoint))]
    pub async fn execute_with_outcome<T, F, Fut>(
        &self,
        id: OperationId,
        kind: OperationKind,
        endpoint: &str,
        mut operation: F,
    ) -> RetryOutcome<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut record = Operation::new(id, kind, endpoint);
        self.registry.register(record.clone());

        let mut attempt: u32 = 0;
        let mut delays = Vec::new();

        loop {
            debug!(attempt, "starting attempt");

            match self.run_attempt(&mut operation).await {
                Ok(value) => {
                    self.transition(&mut record, OperationPatch::status(OperationStatus::Success));
                    self.metrics.record_success();
                    self.registry.remove(&id);
                    debug!(attempt, "operation succeeded");
                    return RetryOutcome {
                        result: Ok(value),
                        attempts: attempt + 1,
                        delays,
                        operation: record,
                    };
                }
                Err(error) => {
                    let message = error.to_string();
                    let decision = if attempt >= self.config.max_retries {
                        RetryDecision::Stop
                    } else {
                        self.policy.should_retry(&error, attempt)
                    };

                    if decision == RetryDecision::Stop {
                        self.transition(
                            &mut record,
                            OperationPatch::status(OperationStatus::Failed).with_error(message),
                        );
                        let streak = self.metrics.record_failure();
                        self.registry.remove(&id);
                        warn!(
                            attempt,
                            error_kind = error.label(),
                            error = %error,
                            consecutive_failures = streak,
                            "operation failed"
                        );
                        return RetryOutcome {
                            result: Err(error),
                            attempts: attempt + 1,
                            delays,
                            operation: record,
                        };
                    }

                    self.transition(&mut record, OperationPatch::default().with_error(message));
                    let delay = self.config.delay_for_attempt(attempt);
                    warn!(
                        attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %error,
                        "attempt failed, retrying"
                    );

                    tokio::time::sleep(delay).await;
                    delays.push(delay);
                    attempt += 1;
                    self.transition(
                        &mut record,
                        OperationPatch::status(OperationStatus::Retrying).with_retry_count(attempt),
                    );
                }
            }
        }
    }

    async fn run_attempt<T, F, Fut>(&self, operation: &mut F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        match self.config.attempt_timeout {
            Some(limit) => match tokio::time::timeout(limit, operation()).await {
                Ok(result) => result,
                Err(_) => Err(TrackVaultError::Timeout(format!(
                    "attempt exceeded {}ms",
                    limit.as_millis()
                ))),
            },
            None => operation().await,
        }
    }

    fn transition(&self, record: &mut Operation, patch: OperationPatch) {
        record.apply(&patch);
        self.registry.update(&record.id, &patch);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use trackvault_common::policies::AlwaysRetry;

    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn executor(config: RetryConfig) -> RetryExecutor {
        RetryExecutor::new(
            config,
            Arc::new(OperationRegistry::new()),
            Arc::new(RemoteMetrics::new()),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn retryable_failure_uses_full_backoff_schedule() {
        let executor = executor(RetryConfig::default());
        let calls = AtomicU32::new(0);

        let outcome = executor
            .execute_with_outcome(new_operation_id(), OperationKind::Read, "GET /library", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<(), _>(TrackVaultError::http(503, "busy")) }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(outcome.attempts, 4);
        assert_eq!(outcome.delays, vec![ms(1000), ms(2000), ms(4000)]);
        assert_eq!(outcome.operation.status, OperationStatus::Failed);
        assert_eq!(outcome.operation.retry_count, 3);
        assert_eq!(outcome.last_error(), Some("HTTP 503: busy"));
        assert!(executor.registry().is_empty());
        assert_eq!(executor.metrics().error_count(), 1);
        assert_eq!(executor.metrics().consecutive_failures(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn fatal_failure_stops_immediately() {
        let executor = executor(RetryConfig::default());
        let started = tokio::time::Instant::now();

        let outcome = executor
            .execute_with_outcome(new_operation_id(), OperationKind::Delete, "DELETE /songs/7", || async {
                Err::<(), _>(TrackVaultError::http(404, "missing"))
            })
            .await;

        assert_eq!(outcome.attempts, 1);
        assert!(outcome.delays.is_empty());
        assert_eq!(started.elapsed(), Duration::ZERO);
        assert_eq!(outcome.operation.retry_count, 0);
        assert_eq!(outcome.operation.status, OperationStatus::Failed);
        assert!(matches!(outcome.result, Err(TrackVaultError::Http { status: 404, .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn client_error_mentioning_timeout_is_not_retried() {
        let executor = executor(RetryConfig::default());
        let calls = AtomicU32::new(0);
        let started = tokio::time::Instant::now();

        let result = executor
            .execute(OperationKind::Write, "POST /playlists", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<(), _>(TrackVaultError::http(400, "invalid timeout value")) }
            })
            .await;

        assert_eq!(result.unwrap_err().status_code(), Some(400));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn recovers_after_transient_failures() {
        let executor = executor(RetryConfig::default());
        let calls = AtomicU32::new(0);

        let value = executor
            .execute(OperationKind::Read, "GET /playlists", || {
                let call = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if call < 2 {
                        Err(TrackVaultError::Network("connection reset".into()))
                    } else {
                        Ok(call)
                    }
                }
            })
            .await
            .unwrap();

        assert_eq!(value, 2);
        assert_eq!(executor.metrics().success_count(), 1);
        assert_eq!(executor.metrics().consecutive_failures(), 0);
        assert!(executor.registry().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn zero_retries_means_single_attempt() {
        let config = RetryConfig::builder().max_retries(0).build().unwrap();
        let executor = executor(config);
        let calls = AtomicU32::new(0);

        let result = executor
            .execute(OperationKind::Write, "POST /playlists", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<(), _>(TrackVaultError::Timeout("slow".into())) }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn attempt_timeout_is_retryable() {
        let config = RetryConfig::builder()
            .max_retries(1)
            .base_delay(ms(10))
            .attempt_timeout(ms(50))
            .build()
            .unwrap();
        let executor = executor(config);
        let calls = AtomicU32::new(0);

        let value = executor
            .execute(OperationKind::Read, "GET /library", || {
                let call = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if call == 0 {
                        tokio::time::sleep(Duration::from_secs(60)).await;
                    }
                    Ok("library")
                }
            })
            .await
            .unwrap();

        assert_eq!(value, "library");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn registry_shows_retrying_record_while_backing_off() {
        let registry = Arc::new(OperationRegistry::new());
        let executor = Arc::new(RetryExecutor::with_policy(
            RetryConfig::builder().max_retries(1).build().unwrap(),
            AlwaysRetry,
            Arc::clone(&registry),
            Arc::new(RemoteMetrics::new()),
        ));
        let id = new_operation_id();

        let task = {
            let executor = Arc::clone(&executor);
            tokio::spawn(async move {
                executor
                    .execute_with_id(id, OperationKind::Update, "PATCH /songs/1", || async {
                        Err::<(), _>(TrackVaultError::InvalidInput("rejected".into()))
                    })
                    .await
            })
        };

        // first attempt fails and the executor sleeps for the base delay
        tokio::time::sleep(ms(500)).await;
        let pending = registry.get(&id).unwrap();
        assert_eq!(pending.retry_count, 0);
        assert_eq!(pending.last_error.as_deref(), Some("Invalid input: rejected"));

        let result = task.await.unwrap();
        assert!(result.is_err());
        assert!(registry.get(&id).is_none());
    }
}
