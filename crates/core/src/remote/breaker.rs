//! Circuit breaker consulted before any remote operation is issued.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};
use trackvault_domain::constants::BREAKER_FAILURE_THRESHOLD;
use trackvault_domain::{HealthStatus, Result, TrackVaultError};

use super::metrics::RemoteMetrics;

/// Call refused because the backend is judged unhealthy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("backend unhealthy after {consecutive_failures} consecutive failures (threshold {threshold})")]
pub struct CircuitRejection {
    pub consecutive_failures: u32,
    pub threshold: u32,
}

impl From<CircuitRejection> for TrackVaultError {
    fn from(rejection: CircuitRejection) -> Self {
        Self::ServiceUnhealthy(rejection.to_string())
    }
}

/// Stateless guard over the shared metrics.
///
/// Open while the shared status is [`HealthStatus::Unhealthy`] *and* the
/// shared failure streak has reached the threshold. Probes and operations
/// both feed that streak. There is no separate half-open state: the next
/// successful probe or operation closes it.
#[derive(Debug)]
pub struct CircuitBreaker {
    metrics: Arc<RemoteMetrics>,
    failure_threshold: u32,
    rejected: AtomicU64,
}

impl CircuitBreaker {
    pub fn new(metrics: Arc<RemoteMetrics>) -> Self {
        Self::with_threshold(metrics, BREAKER_FAILURE_THRESHOLD)
    }

    /// A threshold of zero is clamped to `1`.
    pub fn with_threshold(metrics: Arc<RemoteMetrics>, failure_threshold: u32) -> Self {
        Self { metrics, failure_threshold: failure_threshold.max(1), rejected: AtomicU64::new(0) }
    }

    pub fn failure_threshold(&self) -> u32 {
        self.failure_threshold
    }

    pub fn is_open(&self) -> bool {
        self.check().is_err()
    }

    pub fn rejected_count(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }

    /// `Err` when a call issued now would be refused.
    pub fn check(&self) -> std::result::Result<(), CircuitRejection> {
        let consecutive_failures = self.metrics.consecutive_failures();
        if self.metrics.status() == HealthStatus::Unhealthy
            && consecutive_failures >= self.failure_threshold
        {
            return Err(CircuitRejection { consecutive_failures, threshold: self.failure_threshold });
        }
        Ok(())
    }

    /// Run `operation` unless the breaker is open.
    ///
    /// The operation is not even constructed when the call is refused.
    /// Its own errors are returned unchanged.
    pub async fn guard<T, F, Fut>(&self, operation: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Err(rejection) = self.check() {
            self.rejected.fetch_add(1, Ordering::Relaxed);
            warn!(
                consecutive_failures = rejection.consecutive_failures,
                threshold = rejection.threshold,
                "circuit open, rejecting call"
            );
            return Err(rejection.into());
        }

        match operation().await {
            Ok(value) => {
                self.metrics.reset_consecutive_failures();
                Ok(value)
            }
            Err(error) => {
                let streak = self.metrics.increment_consecutive_failures();
                debug!(consecutive_failures = streak, error = %error, "guarded call failed");
                Err(error)
            }
        }
    }
}
