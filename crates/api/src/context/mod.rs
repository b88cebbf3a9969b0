//! Application context - dependency injection container

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use trackvault_core::{LibraryService, ResilienceConfig, ResilienceLayer};
use trackvault_domain::{Config, HealthStatus, Result, TrackVaultError};
use trackvault_infra::config::loader;
use trackvault_infra::{
    HttpClient, HttpHealthProbe, HttpLibraryBackend, MonitorPoller, MonitoringView, SchedulerError,
};

use crate::utils::health::{AppHealth, ComponentHealth, HealthTransitionLog};

const USER_AGENT: &str = concat!("trackvault/", env!("CARGO_PKG_VERSION"));

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub layer: Arc<ResilienceLayer>,
    pub library: LibraryService<HttpLibraryBackend>,
    pub health_log: Arc<HealthTransitionLog>,
    poller: Mutex<MonitorPoller>,
    view: watch::Receiver<MonitoringView>,
}

impl AppContext {
    /// Create a context from the configuration found by the loader, or the
    /// defaults when there is none.
    pub fn new() -> Result<Self> {
        Self::new_with_config(loader::load_or_default()?)
    }

    /// Create a context from an explicit configuration.
    ///
    /// Nothing is started; call [`AppContext::start`] once a runtime is up.
    pub fn new_with_config(config: Config) -> Result<Self> {
        loader::validate(&config)?;
        let resilience = ResilienceConfig::try_from(&config)?;

        let request_timeout = Duration::from_secs(config.backend.request_timeout_secs);
        let library_client = build_client(&config, request_timeout)?;
        // probe requests are bounded by the probe timeout, not the request timeout
        let probe_client = build_client(&config, resilience.health.probe_timeout)?;
        let probe = HttpHealthProbe::new(probe_client, &config.health.path)?;

        let health_log = Arc::new(HealthTransitionLog::new());
        let layer = Arc::new(
            ResilienceLayer::new(resilience, Arc::new(probe))
                .with_health_listener(Arc::clone(&health_log) as _),
        );

        let backend = Arc::new(HttpLibraryBackend::new(library_client));
        let library = LibraryService::new(backend, Arc::clone(&layer));

        let poller = MonitorPoller::new(
            Arc::clone(&layer),
            Duration::from_secs(config.monitoring.poll_interval_secs),
        );
        let view = poller.subscribe();

        tracing::info!(
            backend = %config.backend.base_url,
            health_path = %config.health.path,
            "application context created"
        );

        Ok(Self { config, layer, library, health_log, poller: Mutex::new(poller), view })
    }

    /// Start health monitoring and the monitoring-view poller.
    pub async fn start(&self) -> Result<()> {
        self.layer.start().await?;
        self.poller.lock().await.start()?;
        tracing::info!("background tasks started");
        Ok(())
    }

    /// Stop background tasks and drop in-flight operation records.
    ///
    /// Safe to call when nothing was started.
    pub async fn shutdown(&self) -> Result<()> {
        let poller_result = match self.poller.lock().await.stop().await {
            Ok(()) | Err(SchedulerError::NotRunning) => Ok(()),
            Err(err) => Err(TrackVaultError::from(err)),
        };
        let layer_result = self.layer.shutdown().await;
        tracing::info!("application context shut down");
        poller_result.and(layer_result)
    }

    /// Latest view published by the poller.
    pub fn monitoring_view(&self) -> MonitoringView {
        self.view.borrow().clone()
    }

    pub fn view_receiver(&self) -> watch::Receiver<MonitoringView> {
        self.view.clone()
    }

    pub async fn health_check(&self) -> AppHealth {
        let metrics = self.layer.get_metrics();
        let mut status = AppHealth::new();

        status = status.add_component(match metrics.status {
            HealthStatus::Healthy => ComponentHealth::healthy("backend"),
            other => ComponentHealth::unhealthy(
                "backend",
                format!("{other} after {} consecutive failures", metrics.consecutive_failures),
            ),
        });

        let breaker = self.layer.breaker();
        status = status.add_component(if breaker.is_open() {
            ComponentHealth::unhealthy(
                "circuit_breaker",
                format!("open, {} calls rejected", breaker.rejected_count()),
            )
        } else {
            ComponentHealth::healthy("circuit_breaker")
        });

        status = status.add_component(if self.layer.is_monitoring().await {
            ComponentHealth::healthy("health_monitor")
        } else {
            ComponentHealth::unhealthy("health_monitor", "not running")
        });

        status = status.add_component(if self.poller.lock().await.is_running() {
            ComponentHealth::healthy("monitor_poller")
        } else {
            ComponentHealth::unhealthy("monitor_poller", "not running")
        });

        if let Some(transition) = self.health_log.last() {
            status = status.with_message(format!(
                "backend went {} -> {} at {}",
                transition.previous,
                transition.current,
                transition.at.to_rfc3339()
            ));
        }

        status.calculate_score();
        status
    }
}

fn build_client(config: &Config, timeout: Duration) -> Result<HttpClient> {
    let mut builder = HttpClient::builder()
        .base_url(config.backend.base_url.clone())
        .timeout(timeout)
        .user_agent(USER_AGENT);
    if let Some(token) = &config.backend.api_token {
        builder = builder.bearer_token(token.clone());
    }
    builder.build()
}
