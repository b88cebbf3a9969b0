//! Application constants
//!
//! Centralized location for the thresholds and defaults of the remote-operation
//! layer.

// Retry defaults
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_BASE_DELAY_MS: u64 = 1_000;
pub const DEFAULT_MAX_DELAY_MS: u64 = 30_000;
pub const DEFAULT_BACKOFF_MULTIPLIER: f64 = 2.0;
pub const DEFAULT_RETRYABLE_STATUS_CODES: [u16; 6] = [408, 429, 500, 502, 503, 504];

// Health probing
pub const RESPONSE_TIME_WINDOW: usize = 10;
pub const DEFAULT_HEALTH_INTERVAL_SECS: u64 = 30;
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_HEALTH_PATH: &str = "/health";
pub const DEGRADED_AFTER_FAILURES: u32 = 1;
pub const UNHEALTHY_AFTER_FAILURES: u32 = 3;

// Circuit breaker
pub const BREAKER_FAILURE_THRESHOLD: u32 = 5;

// Monitoring view
pub const DEFAULT_MONITOR_POLL_SECS: u64 = 5;

// Backend
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
