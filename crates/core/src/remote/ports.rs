//! Port interfaces for backend health monitoring
//!
//! Implemented by infrastructure adapters (HTTP probe) and by whatever wants
//! to react to health transitions (UI event bridge, logs).

use async_trait::async_trait;
use trackvault_domain::{BackendHealthReport, HealthStatus, Result};

/// Single health check against the backend.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// Query the health endpoint and return its decoded body.
    ///
    /// Transport failures, non-2xx responses and bodies reporting a failing
    /// status are all errors.
    async fn probe(&self) -> Result<BackendHealthReport>;
}

/// Receives health status transitions.
#[async_trait]
pub trait HealthStatusListener: Send + Sync {
    /// Called only when the status actually changes, not on every probe.
    async fn on_health_changed(&self, previous: HealthStatus, current: HealthStatus);
}
