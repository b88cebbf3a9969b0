//! Health endpoint probe

use async_trait::async_trait;
use reqwest::Method;
use tracing::debug;
use trackvault_core::HealthProbe;
use trackvault_domain::{BackendHealthReport, Result, TrackVaultError};
use url::Url;

use crate::http::HttpClient;

/// Probes `GET {base_url}{path}` and decodes the body.
///
/// Build the client with the probe timeout so a stalled backend fails at the
/// transport as well as in the monitor.
#[derive(Clone, Debug)]
pub struct HttpHealthProbe {
    client: HttpClient,
    url: Url,
}

impl HttpHealthProbe {
    pub fn new(client: HttpClient, path: &str) -> Result<Self> {
        let url = client.url(path)?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl HealthProbe for HttpHealthProbe {
    async fn probe(&self) -> Result<BackendHealthReport> {
        let response = self.client.send(self.client.request(Method::GET, self.url.clone())).await?;
        let body = response
            .text()
            .await
            .map_err(|e| TrackVaultError::Network(format!("failed to read health body: {e}")))?;

        let report = if body.trim().is_empty() {
            BackendHealthReport::default()
        } else {
            serde_json::from_str::<BackendHealthReport>(&body)?
        };

        if !report.is_ok() {
            let status = report.status.as_deref().unwrap_or("not ok");
            return Err(TrackVaultError::Internal(format!("backend reported status '{status}'")));
        }

        debug!(url = %self.url, "health endpoint answered ok");
        Ok(report)
    }
}
