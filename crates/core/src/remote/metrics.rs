//! Process-wide health and outcome counters for the remote backend.
//!
//! One [`RemoteMetrics`] instance is shared (behind `Arc`) by the retry
//! executor, the circuit breaker and the health monitor. All three mutate
//! the same `consecutive_failures` counter, and `status` is always derived
//! from it: healthy at 0, degraded at 1..=2, unhealthy from 3.

use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use trackvault_common::SlidingWindow;
use trackvault_domain::constants::RESPONSE_TIME_WINDOW;
use trackvault_domain::{BackendHealthReport, HealthSnapshot, HealthStatus, MetricsSnapshot};

#[derive(Debug)]
struct MetricsState {
    response_times: SlidingWindow<Duration>,
    success_count: u64,
    error_count: u64,
    consecutive_failures: u32,
    status: HealthStatus,
    last_checked_at: Option<DateTime<Utc>>,
    probe_count: u64,
    backend: BackendHealthReport,
}

impl MetricsState {
    fn new(window: usize) -> Self {
        Self {
            response_times: SlidingWindow::new(window),
            success_count: 0,
            error_count: 0,
            consecutive_failures: 0,
            status: HealthStatus::Healthy,
            last_checked_at: None,
            probe_count: 0,
            backend: BackendHealthReport::default(),
        }
    }

    fn total(&self) -> u64 {
        self.success_count + self.error_count
    }

    fn error_rate(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.error_count as f64 / total as f64,
        }
    }

    fn set_consecutive_failures(&mut self, value: u32) -> StatusTransition {
        let previous = self.status;
        self.consecutive_failures = value;
        self.status = HealthStatus::from_consecutive_failures(value);
        StatusTransition { previous, current: self.status }
    }

    fn bump_consecutive_failures(&mut self) -> StatusTransition {
        let next = self.consecutive_failures.saturating_add(1);
        self.set_consecutive_failures(next)
    }

    fn average_response_time_ms(&self) -> f64 {
        self.response_times.mean().as_secs_f64() * 1000.0
    }
}

/// Status change produced by a health probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTransition {
    pub previous: HealthStatus,
    pub current: HealthStatus,
}

impl StatusTransition {
    #[must_use]
    pub fn changed(&self) -> bool {
        self.previous != self.current
    }
}

/// Shared metrics aggregate
#[derive(Debug)]
pub struct RemoteMetrics {
    state: Mutex<MetricsState>,
}

impl Default for RemoteMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteMetrics {
    pub fn new() -> Self {
        Self::with_window(RESPONSE_TIME_WINDOW)
    }

    /// Metrics keeping the last `window` probe response times.
    pub fn with_window(window: usize) -> Self {
        Self { state: Mutex::new(MetricsState::new(window)) }
    }

    /// A remote operation completed successfully.
    pub fn record_success(&self) {
        let mut state = self.state.lock();
        state.success_count += 1;
        state.set_consecutive_failures(0);
    }

    /// A remote operation failed terminally. Returns the new failure streak.
    pub fn record_failure(&self) -> u32 {
        let mut state = self.state.lock();
        state.error_count += 1;
        state.bump_consecutive_failures();
        state.consecutive_failures
    }

    pub fn reset_consecutive_failures(&self) {
        self.state.lock().set_consecutive_failures(0);
    }

    /// Bump the failure streak without touching the outcome counters.
    pub fn increment_consecutive_failures(&self) -> u32 {
        let mut state = self.state.lock();
        state.bump_consecutive_failures();
        state.consecutive_failures
    }

    /// Health probe answered in time with a healthy body.
    pub fn record_probe_success(
        &self,
        elapsed: Duration,
        report: BackendHealthReport,
    ) -> StatusTransition {
        let mut state = self.state.lock();
        state.response_times.push(elapsed);
        let transition = state.set_consecutive_failures(0);
        state.backend = report;
        state.probe_count += 1;
        state.last_checked_at = Some(Utc::now());
        transition
    }

    /// Health probe failed or timed out after `elapsed`.
    pub fn record_probe_failure(&self, elapsed: Duration) -> StatusTransition {
        let mut state = self.state.lock();
        state.response_times.push(elapsed);
        let transition = state.bump_consecutive_failures();
        state.error_count += 1;
        state.probe_count += 1;
        state.last_checked_at = Some(Utc::now());
        transition
    }

    pub fn status(&self) -> HealthStatus {
        self.state.lock().status
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.state.lock().consecutive_failures
    }

    pub fn success_count(&self) -> u64 {
        self.state.lock().success_count
    }

    pub fn error_count(&self) -> u64 {
        self.state.lock().error_count
    }

    /// Retained probe response times, oldest first.
    pub fn response_times(&self) -> Vec<Duration> {
        self.state.lock().response_times.to_vec()
    }

    /// Operator-facing counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let state = self.state.lock();
        let total = state.total();
        let success_rate = if total == 0 { 1.0 } else { state.success_count as f64 / total as f64 };
        MetricsSnapshot {
            is_healthy: state.status == HealthStatus::Healthy,
            status: state.status,
            consecutive_failures: state.consecutive_failures,
            total_operations: total,
            success_rate,
            average_response_time_ms: state.average_response_time_ms(),
            error_rate: state.error_rate(),
            last_checked_at: state.last_checked_at,
        }
    }

    /// Probe-side view including the backend-reported fields.
    pub fn health_snapshot(&self) -> HealthSnapshot {
        let state = self.state.lock();
        HealthSnapshot {
            status: state.status,
            last_checked_at: state.last_checked_at,
            average_response_time_ms: state.average_response_time_ms(),
            error_rate: state.error_rate(),
            consecutive_failures: state.consecutive_failures,
            probe_count: state.probe_count,
            response_times_ms: state
                .response_times
                .iter()
                .map(|sample| u64::try_from(sample.as_millis()).unwrap_or(u64::MAX))
                .collect(),
            backend: state.backend.clone(),
        }
    }
}
