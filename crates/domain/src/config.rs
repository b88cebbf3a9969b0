//! Configuration management

use serde::{Deserialize, Serialize};

use crate::constants::{
    BREAKER_FAILURE_THRESHOLD, DEFAULT_BACKEND_URL, DEFAULT_BACKOFF_MULTIPLIER,
    DEFAULT_BASE_DELAY_MS, DEFAULT_HEALTH_INTERVAL_SECS, DEFAULT_HEALTH_PATH,
    DEFAULT_MAX_DELAY_MS, DEFAULT_MAX_RETRIES, DEFAULT_MONITOR_POLL_SECS,
    DEFAULT_PROBE_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_RETRYABLE_STATUS_CODES,
};

/// Application configuration
///
/// Every section carries `#[serde(default)]`, so a config file only needs to
/// name the values it overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub retry: RetrySettings,
    pub health: HealthSettings,
    pub monitoring: MonitoringSettings,
    pub logging: LoggingConfig,
}

/// Backend service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
    #[serde(skip_serializing)]
    pub api_token: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            api_token: None,
        }
    }
}

/// Retry budget and backoff shape, in serializable units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_multiplier: f64,
    pub retryable_status_codes: Vec<u16>,
    /// Per-attempt bound; unset leaves attempts unbounded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempt_timeout_ms: Option<u64>,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay_ms: DEFAULT_BASE_DELAY_MS,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
            backoff_multiplier: DEFAULT_BACKOFF_MULTIPLIER,
            retryable_status_codes: DEFAULT_RETRYABLE_STATUS_CODES.to_vec(),
            attempt_timeout_ms: None,
        }
    }
}

/// Health probing and circuit breaker thresholds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthSettings {
    pub interval_secs: u64,
    pub probe_timeout_secs: u64,
    pub path: String,
    pub breaker_failure_threshold: u32,
}

impl Default for HealthSettings {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_HEALTH_INTERVAL_SECS,
            probe_timeout_secs: DEFAULT_PROBE_TIMEOUT_SECS,
            path: DEFAULT_HEALTH_PATH.to_string(),
            breaker_failure_threshold: BREAKER_FAILURE_THRESHOLD,
        }
    }
}

/// Operator view polling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringSettings {
    pub poll_interval_secs: u64,
}

impl Default for MonitoringSettings {
    fn default() -> Self {
        Self { poll_interval_secs: DEFAULT_MONITOR_POLL_SECS }
    }
}

/// Logging output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), json: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_retry_policy() {
        let config = Config::default();
        assert_eq!(config.retry.max_retries, 3);
        assert_eq!(config.retry.base_delay_ms, 1_000);
        assert_eq!(config.retry.max_delay_ms, 30_000);
        assert_eq!(config.retry.retryable_status_codes, vec![408, 429, 500, 502, 503, 504]);
        assert_eq!(config.health.interval_secs, 30);
        assert_eq!(config.health.probe_timeout_secs, 5);
        assert_eq!(config.monitoring.poll_interval_secs, 5);
    }

    #[test]
    fn partial_documents_fill_missing_sections() {
        let json = r#"{ "retry": { "max_retries": 1 }, "backend": { "base_url": "http://nas:9000" } }"#;
        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(config.retry.max_retries, 1);
        assert_eq!(config.retry.base_delay_ms, 1_000);
        assert_eq!(config.backend.base_url, "http://nas:9000");
        assert_eq!(config.health, HealthSettings::default());
    }

    #[test]
    fn api_token_is_never_serialized() {
        let mut config = Config::default();
        config.backend.api_token = Some("secret".to_string());
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }
}
