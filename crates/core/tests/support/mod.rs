//! Shared test helpers for `trackvault-core` integration tests.
//!
//! In-memory fakes for the core ports so tests can script backend failures
//! and drive the health monitor without a network.

#![allow(dead_code)]

pub mod backend;
pub mod probe;

use std::sync::Arc;
use std::time::Duration;

use trackvault_common::RetryConfig;
use trackvault_core::{HealthMonitorConfig, ResilienceConfig, ResilienceLayer};

pub use backend::FakeLibraryBackend;
pub use probe::ScriptedProbe;

/// Default retry budget with the documented 30 s / 5 s probe cadence.
pub fn resilience_config() -> ResilienceConfig {
    ResilienceConfig {
        retry: RetryConfig::default(),
        health: HealthMonitorConfig {
            interval: Duration::from_secs(30),
            probe_timeout: Duration::from_secs(5),
        },
        breaker_failure_threshold: 5,
    }
}

pub fn layer_with_probe(probe: Arc<ScriptedProbe>) -> Arc<ResilienceLayer> {
    Arc::new(ResilienceLayer::new(resilience_config(), probe))
}
