//! Application health report and the health transition log
//!
//! [`AppHealth`] aggregates component checks into a score;
//! [`HealthTransitionLog`] is the listener the resilience layer notifies on
//! backend status changes.

use std::collections::VecDeque;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::info;
use trackvault_core::HealthStatusListener;
use trackvault_domain::HealthStatus;

const HEALTHY_SCORE_THRESHOLD: f64 = 0.8;
const TRANSITION_HISTORY: usize = 20;

/// Overall health of the application
///
/// # Example
/// ```no_run
/// use trackvault_lib::utils::health::{AppHealth, ComponentHealth};
///
/// let mut status = AppHealth::new();
/// status = status.add_component(ComponentHealth::healthy("backend"));
/// status = status.add_component(ComponentHealth::unhealthy("monitor_poller", "not running"));
/// status.calculate_score();
///
/// assert_eq!(status.score, 0.5);
/// assert!(!status.is_healthy);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppHealth {
    pub is_healthy: bool,

    /// `healthy_components / total_components`, from 0.0 to 1.0
    pub score: f64,

    pub message: Option<String>,

    pub components: Vec<ComponentHealth>,

    pub checked_at: DateTime<Utc>,
}

impl AppHealth {
    /// Healthy with score 1.0 and no components
    pub fn new() -> Self {
        Self {
            is_healthy: true,
            score: 1.0,
            message: None,
            components: Vec::new(),
            checked_at: Utc::now(),
        }
    }

    pub fn add_component(mut self, component: ComponentHealth) -> Self {
        self.components.push(component);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Recompute `score` and `is_healthy` (80% threshold) from the components.
    pub fn calculate_score(&mut self) {
        if self.components.is_empty() {
            return;
        }

        let healthy_count = self.components.iter().filter(|c| c.is_healthy).count();

        self.score = healthy_count as f64 / self.components.len() as f64;
        self.is_healthy = self.score >= HEALTHY_SCORE_THRESHOLD;
    }
}

impl Default for AppHealth {
    fn default() -> Self {
        Self::new()
    }
}

/// Health of an individual component
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub name: String,
    pub is_healthy: bool,
    pub message: Option<String>,
}

impl ComponentHealth {
    pub fn healthy(name: impl Into<String>) -> Self {
        Self { name: name.into(), is_healthy: true, message: None }
    }

    pub fn unhealthy(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self { name: name.into(), is_healthy: false, message: Some(message.into()) }
    }
}

/// One backend status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthTransition {
    pub previous: HealthStatus,
    pub current: HealthStatus,
    pub at: DateTime<Utc>,
}

/// Keeps the most recent backend status changes for the health report.
#[derive(Debug, Default)]
pub struct HealthTransitionLog {
    transitions: Mutex<VecDeque<HealthTransition>>,
}

impl HealthTransitionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<HealthTransition> {
        self.transitions.lock().back().copied()
    }

    /// Oldest first.
    pub fn history(&self) -> Vec<HealthTransition> {
        self.transitions.lock().iter().copied().collect()
    }
}

#[async_trait]
impl HealthStatusListener for HealthTransitionLog {
    async fn on_health_changed(&self, previous: HealthStatus, current: HealthStatus) {
        info!(%previous, %current, "backend health transition recorded");
        let mut transitions = self.transitions.lock();
        if transitions.len() == TRANSITION_HISTORY {
            transitions.pop_front();
        }
        transitions.push_back(HealthTransition { previous, current, at: Utc::now() });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_uses_eighty_percent_threshold() {
        let mut status = AppHealth::new()
            .add_component(ComponentHealth::healthy("backend"))
            .add_component(ComponentHealth::healthy("health_monitor"))
            .add_component(ComponentHealth::healthy("monitor_poller"))
            .add_component(ComponentHealth::healthy("operation_queue"))
            .add_component(ComponentHealth::unhealthy("config", "defaults in use"));
        status.calculate_score();

        assert_eq!(status.score, 0.8);
        assert!(status.is_healthy);
    }

    #[tokio::test]
    async fn transition_log_is_bounded() {
        let log = HealthTransitionLog::new();
        for _ in 0..15 {
            log.on_health_changed(HealthStatus::Healthy, HealthStatus::Degraded).await;
            log.on_health_changed(HealthStatus::Degraded, HealthStatus::Healthy).await;
        }

        let history = log.history();
        assert_eq!(history.len(), TRANSITION_HISTORY);
        assert_eq!(log.last().map(|t| t.current), Some(HealthStatus::Healthy));
    }
}
