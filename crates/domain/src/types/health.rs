//! Backend health and monitoring snapshots

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::{DEGRADED_AFTER_FAILURES, UNHEALTHY_AFTER_FAILURES};
use crate::impl_domain_status_conversions;

/// Health verdict for the backend service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl_domain_status_conversions!(HealthStatus {
    Healthy => "healthy",
    Degraded => "degraded",
    Unhealthy => "unhealthy",
});

impl HealthStatus {
    /// Verdict for a run of consecutive failures.
    ///
    /// `0` is healthy, `1..=2` degraded, `3+` unhealthy.
    pub fn from_consecutive_failures(consecutive_failures: u32) -> Self {
        if consecutive_failures >= UNHEALTHY_AFTER_FAILURES {
            Self::Unhealthy
        } else if consecutive_failures >= DEGRADED_AFTER_FAILURES {
            Self::Degraded
        } else {
            Self::Healthy
        }
    }
}

/// Body returned by the backend health endpoint.
///
/// Only `ok`/`status` are interpreted. `connectionPool` and any other
/// top-level counters are carried through to the snapshot untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendHealthReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ok: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_pool: Option<Value>,
    #[serde(flatten)]
    pub summary: Map<String, Value>,
}

impl BackendHealthReport {
    /// An empty body counts as OK; an explicit `ok: false` or a failing
    /// `status` label does not.
    pub fn is_ok(&self) -> bool {
        if self.ok == Some(false) {
            return false;
        }
        !matches!(
            self.status.as_deref().map(str::to_ascii_lowercase).as_deref(),
            Some("error" | "down" | "unhealthy" | "fail" | "failed")
        )
    }
}

/// Point-in-time view of backend health as measured by the prober.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthSnapshot {
    pub status: HealthStatus,
    pub last_checked_at: Option<DateTime<Utc>>,
    pub average_response_time_ms: f64,
    pub error_rate: f64,
    pub consecutive_failures: u32,
    pub probe_count: u64,
    /// Samples currently held in the response-time window, oldest first.
    pub response_times_ms: Vec<u64>,
    pub backend: BackendHealthReport,
}

/// Operator-facing metrics, safe to poll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub is_healthy: bool,
    pub status: HealthStatus,
    pub consecutive_failures: u32,
    pub total_operations: u64,
    pub success_rate: f64,
    pub average_response_time_ms: f64,
    pub error_rate: f64,
    pub last_checked_at: Option<DateTime<Utc>>,
}
