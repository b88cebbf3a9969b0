//! Conversions from external infrastructure errors into domain errors.
//!
//! The mapping decides retry behaviour downstream: the retry policy only
//! sees [`TrackVaultError`] variants, so a reqwest timeout must surface as
//! `Timeout`, a refused connection as `Network`, and an error status as
//! `Http` with its numeric code intact.

use reqwest::Error as HttpError;
use trackvault_domain::TrackVaultError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub TrackVaultError);

impl From<InfraError> for TrackVaultError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<TrackVaultError> for InfraError {
    fn from(value: TrackVaultError) -> Self {
        InfraError(value)
    }
}

trait IntoTrackVaultError {
    fn into_trackvault(self) -> TrackVaultError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → TrackVaultError */
/* -------------------------------------------------------------------------- */

impl IntoTrackVaultError for HttpError {
    fn into_trackvault(self) -> TrackVaultError {
        if self.is_timeout() {
            return TrackVaultError::Timeout(format!("HTTP request timed out: {self}"));
        }

        if self.is_connect() {
            return TrackVaultError::Network(format!("HTTP connection failure: {self}"));
        }

        if let Some(status) = self.status() {
            let reason = status.canonical_reason().unwrap_or("unknown status");
            return TrackVaultError::http(status.as_u16(), reason);
        }

        if self.is_decode() {
            return TrackVaultError::Serialization(format!("invalid response body: {self}"));
        }

        if self.is_builder() {
            return TrackVaultError::Config(format!("invalid HTTP request: {self}"));
        }

        TrackVaultError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_trackvault())
    }
}

/* -------------------------------------------------------------------------- */
/* config sources → TrackVaultError */
/* -------------------------------------------------------------------------- */

impl From<toml::de::Error> for InfraError {
    fn from(value: toml::de::Error) -> Self {
        InfraError(TrackVaultError::Config(format!("Invalid TOML format: {value}")))
    }
}

impl From<url::ParseError> for InfraError {
    fn from(value: url::ParseError) -> Self {
        InfraError(TrackVaultError::Config(format!("Invalid URL: {value}")))
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        InfraError(TrackVaultError::Config(format!("Failed to read config file: {value}")))
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;
    use std::time::Duration;

    use reqwest::{Client, StatusCode};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client() -> Client {
        Client::builder().no_proxy().build().unwrap()
    }

    #[tokio::test]
    async fn error_status_keeps_numeric_code() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(StatusCode::SERVICE_UNAVAILABLE))
            .mount(&server)
            .await;

        let error = client().get(server.uri()).send().await.unwrap().error_for_status().unwrap_err();

        let mapped: TrackVaultError = InfraError::from(error).into();
        assert_eq!(mapped, TrackVaultError::http(503, "Service Unavailable"));
    }

    #[tokio::test]
    async fn refused_connection_maps_to_network() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let error = client().get(format!("http://{addr}")).send().await.unwrap_err();

        let mapped: TrackVaultError = InfraError::from(error).into();
        assert!(matches!(mapped, TrackVaultError::Network(_)), "got {mapped:?}");
    }

    #[tokio::test]
    async fn slow_response_maps_to_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let client = Client::builder().no_proxy().timeout(Duration::from_millis(50)).build().unwrap();
        let error = client.get(server.uri()).send().await.unwrap_err();

        let mapped: TrackVaultError = InfraError::from(error).into();
        assert!(mapped.is_timeout(), "got {mapped:?}");
    }

    #[test]
    fn bad_toml_is_a_config_error() {
        let error = toml::from_str::<toml::Table>("retry = [").unwrap_err();
        let mapped: TrackVaultError = InfraError::from(error).into();
        assert!(matches!(mapped, TrackVaultError::Config(message) if message.contains("TOML")));
    }
}
