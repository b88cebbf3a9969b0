//! Monitoring commands - read-only views of the resilience layer
//!
//! Safe to poll: none of these mutate state, and repeated calls without
//! remote activity return identical results. `probe_backend` is the one
//! exception and is meant for a manual "check now" button.

use trackvault_domain::{HealthSnapshot, HealthStatus, MetricsSnapshot, Operation, Result};
use trackvault_infra::MonitoringView;

use crate::context::AppContext;
use crate::utils::command_helpers::execute_command;

/// Aggregate metrics: health flag, failure streak, totals and rates.
pub async fn get_metrics(ctx: &AppContext) -> Result<MetricsSnapshot> {
    execute_command("monitoring::get_metrics", || async { Ok(ctx.layer.get_metrics()) }).await
}

/// Operations still pending or retrying, oldest first.
pub async fn get_operation_queue(ctx: &AppContext) -> Result<Vec<Operation>> {
    execute_command("monitoring::get_operation_queue", || async {
        Ok(ctx.layer.get_operation_queue())
    })
    .await
}

pub async fn get_backend_health(ctx: &AppContext) -> Result<HealthSnapshot> {
    execute_command("monitoring::get_backend_health", || async { Ok(ctx.layer.health_snapshot()) })
        .await
}

/// Last view published by the poller; may lag live state by one poll interval.
pub async fn get_monitoring_view(ctx: &AppContext) -> Result<MonitoringView> {
    execute_command("monitoring::get_monitoring_view", || async { Ok(ctx.monitoring_view()) })
        .await
}

/// Probe the backend now, outside the schedule.
pub async fn probe_backend(ctx: &AppContext) -> Result<HealthStatus> {
    execute_command("monitoring::probe_backend", || async { Ok(ctx.layer.probe_now().await) })
        .await
}
