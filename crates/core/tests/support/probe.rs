use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use trackvault_core::HealthProbe;
use trackvault_domain::{BackendHealthReport, Result, TrackVaultError};

/// Health probe whose answer can be flipped between healthy and down.
pub struct ScriptedProbe {
    healthy: AtomicBool,
    calls: AtomicU32,
    latency: Duration,
}

impl ScriptedProbe {
    pub fn healthy() -> Self {
        Self { healthy: AtomicBool::new(true), calls: AtomicU32::new(0), latency: Duration::ZERO }
    }

    pub fn down() -> Self {
        let probe = Self::healthy();
        probe.set_healthy(false);
        probe
    }

    /// Respond only after `latency`, letting tests exercise the probe timeout.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HealthProbe for ScriptedProbe {
    async fn probe(&self) -> Result<BackendHealthReport> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.healthy.load(Ordering::SeqCst) {
            Ok(serde_json::from_value(serde_json::json!({
                "status": "ok",
                "connectionPool": { "active": 1, "idle": 4 },
                "tracks": 42
            }))?)
        } else {
            Err(TrackVaultError::Network("connection refused".to_string()))
        }
    }
}
