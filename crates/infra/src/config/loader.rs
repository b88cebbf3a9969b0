//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. If `TRACKVAULT_BACKEND_URL` is set, build the config from environment
//!    variables, using defaults for anything not set
//! 2. Otherwise load from a file, probing the standard locations
//! 3. `TRACKVAULT_API_TOKEN` is applied on top in both cases, so the token
//!    never has to live in a file
//! 4. The result is validated before it is returned
//!
//! ## Environment Variables
//! - `TRACKVAULT_BACKEND_URL`: Backend base URL (selects environment loading)
//! - `TRACKVAULT_API_TOKEN`: Bearer token for the backend
//! - `TRACKVAULT_REQUEST_TIMEOUT_SECS`: Per-request HTTP timeout
//! - `TRACKVAULT_MAX_RETRIES`: Retries after the first attempt
//! - `TRACKVAULT_BASE_DELAY_MS` / `TRACKVAULT_MAX_DELAY_MS`: Backoff bounds
//! - `TRACKVAULT_BACKOFF_MULTIPLIER`: Backoff growth factor
//! - `TRACKVAULT_ATTEMPT_TIMEOUT_MS`: Optional bound on a single attempt
//! - `TRACKVAULT_HEALTH_INTERVAL_SECS`: Health probe interval
//! - `TRACKVAULT_PROBE_TIMEOUT_SECS`: Health probe timeout
//! - `TRACKVAULT_HEALTH_PATH`: Health endpoint path
//! - `TRACKVAULT_BREAKER_THRESHOLD`: Failures before the breaker opens
//! - `TRACKVAULT_MONITOR_POLL_SECS`: Monitoring view refresh interval
//! - `TRACKVAULT_LOG_LEVEL`: Default log filter
//! - `TRACKVAULT_LOG_JSON`: JSON log output (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./trackvault.toml`, `./trackvault.json`, `./config.toml`,
//!    `./config.json` (current working directory)
//! 2. The same names in the parent directory
//! 3. The same names next to the executable

use std::path::{Path, PathBuf};
use std::str::FromStr;

use trackvault_domain::{Config, Result, TrackVaultError};

use crate::errors::InfraError;
use crate::http::client::parse_base_url;

const CONFIG_FILE_NAMES: [&str; 4] =
    ["trackvault.toml", "trackvault.json", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `TrackVaultError::Config` if no source yields a valid config.
pub fn load() -> Result<Config> {
    let config = match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            config
        }
        Err(e) => {
            tracing::debug!(error = %e, "Environment config unavailable, trying file");
            load_from_file(None)?
        }
    };
    finish(config)
}

/// Like [`load`], but falls back to [`Config::default`] when no config
/// source exists at all. Invalid configs are still errors.
pub fn load_or_default() -> Result<Config> {
    if std::env::var_os("TRACKVAULT_BACKEND_URL").is_none() && probe_config_paths().is_none() {
        tracing::warn!("No configuration found, using defaults");
        return finish(Config::default());
    }
    load()
}

/// Load configuration from environment variables
///
/// `TRACKVAULT_BACKEND_URL` is required; every other variable is optional.
///
/// # Errors
/// Returns `TrackVaultError::Config` if the URL is missing or a variable
/// has an invalid value.
pub fn load_from_env() -> Result<Config> {
    let mut config = Config::default();
    config.backend.base_url = env_var("TRACKVAULT_BACKEND_URL")?;

    if let Some(v) = env_parse("TRACKVAULT_REQUEST_TIMEOUT_SECS")? {
        config.backend.request_timeout_secs = v;
    }
    if let Some(v) = env_parse("TRACKVAULT_MAX_RETRIES")? {
        config.retry.max_retries = v;
    }
    if let Some(v) = env_parse("TRACKVAULT_BASE_DELAY_MS")? {
        config.retry.base_delay_ms = v;
    }
    if let Some(v) = env_parse("TRACKVAULT_MAX_DELAY_MS")? {
        config.retry.max_delay_ms = v;
    }
    if let Some(v) = env_parse("TRACKVAULT_BACKOFF_MULTIPLIER")? {
        config.retry.backoff_multiplier = v;
    }
    if let Some(v) = env_parse("TRACKVAULT_ATTEMPT_TIMEOUT_MS")? {
        config.retry.attempt_timeout_ms = Some(v);
    }
    if let Some(v) = env_parse("TRACKVAULT_HEALTH_INTERVAL_SECS")? {
        config.health.interval_secs = v;
    }
    if let Some(v) = env_parse("TRACKVAULT_PROBE_TIMEOUT_SECS")? {
        config.health.probe_timeout_secs = v;
    }
    if let Ok(path) = std::env::var("TRACKVAULT_HEALTH_PATH") {
        config.health.path = path;
    }
    if let Some(v) = env_parse("TRACKVAULT_BREAKER_THRESHOLD")? {
        config.health.breaker_failure_threshold = v;
    }
    if let Some(v) = env_parse("TRACKVAULT_MONITOR_POLL_SECS")? {
        config.monitoring.poll_interval_secs = v;
    }
    if let Ok(level) = std::env::var("TRACKVAULT_LOG_LEVEL") {
        config.logging.level = level;
    }
    config.logging.json = env_bool("TRACKVAULT_LOG_JSON", config.logging.json);

    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations. Format is chosen by
/// extension (`.toml` or `.json`); missing fields take their defaults.
///
/// # Errors
/// Returns `TrackVaultError::Config` if the file is missing or malformed.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(TrackVaultError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            TrackVaultError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path).map_err(InfraError::from)?;
    parse_config(&contents, &config_path)
}

fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => Ok(toml::from_str(contents).map_err(InfraError::from)?),
        "json" => serde_json::from_str(contents)
            .map_err(|e| TrackVaultError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(TrackVaultError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe the standard locations for a configuration file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        let parent = cwd.join("..");
        dirs.extend([cwd, parent]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

/// Check values the resilience layer and HTTP client cannot work with.
///
/// # Errors
/// Returns `TrackVaultError::Config` naming the first offending field.
pub fn validate(config: &Config) -> Result<()> {
    parse_base_url(&config.backend.base_url)?;

    if config.backend.request_timeout_secs == 0 {
        return Err(invalid("backend.request_timeout_secs must be greater than 0"));
    }
    if config.health.interval_secs == 0 {
        return Err(invalid("health.interval_secs must be greater than 0"));
    }
    if config.health.probe_timeout_secs == 0 {
        return Err(invalid("health.probe_timeout_secs must be greater than 0"));
    }
    if !config.health.path.starts_with('/') {
        return Err(invalid("health.path must start with '/'"));
    }
    if config.monitoring.poll_interval_secs == 0 {
        return Err(invalid("monitoring.poll_interval_secs must be greater than 0"));
    }
    if config.retry.base_delay_ms > config.retry.max_delay_ms {
        return Err(invalid("retry.base_delay_ms must not exceed retry.max_delay_ms"));
    }
    if !(config.retry.backoff_multiplier.is_finite() && config.retry.backoff_multiplier > 1.0) {
        return Err(invalid("retry.backoff_multiplier must be a finite number greater than 1"));
    }
    Ok(())
}

fn finish(mut config: Config) -> Result<Config> {
    if let Ok(token) = std::env::var("TRACKVAULT_API_TOKEN") {
        if !token.trim().is_empty() {
            config.backend.api_token = Some(token);
        }
    }
    validate(&config)?;
    Ok(config)
}

fn invalid(message: &str) -> TrackVaultError {
    TrackVaultError::Config(message.to_string())
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        TrackVaultError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Parse an optional environment variable; unset yields `Ok(None)`.
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| TrackVaultError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(None),
    }
}

/// Accepts `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
