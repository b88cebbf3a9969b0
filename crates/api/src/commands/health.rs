//! Health check command for frontend monitoring

use crate::context::AppContext;
use crate::utils::health::AppHealth;

/// Get application health status
///
/// # Example Response
/// ```json
/// {
///   "is_healthy": false,
///   "score": 0.75,
///   "message": "backend went healthy -> degraded at 2026-10-19T08:15:02+00:00",
///   "components": [
///     { "name": "backend", "is_healthy": false, "message": "degraded after 1 consecutive failures" },
///     { "name": "circuit_breaker", "is_healthy": true, "message": null },
///     { "name": "health_monitor", "is_healthy": true, "message": null },
///     { "name": "monitor_poller", "is_healthy": true, "message": null }
///   ],
///   "checked_at": "2026-10-19T08:15:04.120Z"
/// }
/// ```
pub async fn get_app_health(ctx: &AppContext) -> AppHealth {
    ctx.health_check().await
}
