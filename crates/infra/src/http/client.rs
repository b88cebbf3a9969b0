use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use trackvault_domain::constants::{DEFAULT_BACKEND_URL, DEFAULT_REQUEST_TIMEOUT_SECS};
use trackvault_domain::{Result, TrackVaultError};
use url::Url;

use crate::errors::InfraError;

const MAX_ERROR_BODY_CHARS: usize = 200;

/// Single-attempt HTTP client bound to one backend base URL.
///
/// Retries are deliberately absent here; the resilience layer owns them and
/// needs to see every failed attempt. Non-2xx responses become
/// [`TrackVaultError::Http`] with the numeric status preserved.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: ReqwestClient,
    base_url: Url,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve `path` against the base URL, keeping any base path prefix.
    pub fn url(&self, path: &str) -> Result<Url> {
        self.base_url.join(path.trim_start_matches('/')).map_err(|e| InfraError::from(e).into())
    }

    /// Append percent-encoded path segments to the base URL.
    ///
    /// Use this for paths carrying ids so a `/` or `?` inside an id cannot
    /// change the route.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                TrackVaultError::Config(format!("base URL cannot hold a path: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client.request(method, url)
    }

    /// Execute the request once; non-success statuses are returned as errors.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let request = builder.build().map_err(|err| TrackVaultError::from(InfraError::from(err)))?;
        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending HTTP request");

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|err| TrackVaultError::from(InfraError::from(err)))?;

        let status = response.status();
        debug!(%method, %url, %status, "received HTTP response");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(TrackVaultError::http(status.as_u16(), error_message(status, &body)))
    }

    pub async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let url = self.endpoint(segments)?;
        decode(self.send(self.request(Method::GET, url)).await?).await
    }

    pub async fn get_json_with_query<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<T> {
        let url = self.endpoint(segments)?;
        decode(self.send(self.request(Method::GET, url).query(query)).await?).await
    }

    /// Send `body` as JSON with `method` and decode the JSON reply.
    pub async fn send_json<B, T>(&self, method: Method, segments: &[&str], body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments)?;
        decode(self.send(self.request(method, url).json(body)).await?).await
    }

    /// Issue a DELETE; any response body is ignored.
    pub async fn delete(&self, segments: &[&str]) -> Result<()> {
        let url = self.endpoint(segments)?;
        self.send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    response.json::<T>().await.map_err(|err| InfraError::from(err).into())
}

/// Prefer the backend's own `error`/`message` field, then the raw body, then
/// the canonical reason phrase.
fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    let reason = || status.canonical_reason().unwrap_or("unknown status").to_string();
    let body = body.trim();
    if body.is_empty() {
        return reason();
    }

    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error", "message"] {
            if let Some(serde_json::Value::String(text)) = map.get(key) {
                return text.clone();
            }
        }
        return reason();
    }

    body.chars().take(MAX_ERROR_BODY_CHARS).collect()
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    base_url: String,
    timeout: Duration,
    user_agent: Option<String>,
    bearer_token: Option<String>,
    default_headers: Option<HeaderMap>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: None,
            bearer_token: None,
            default_headers: None,
        }
    }
}

impl HttpClientBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Whole-request timeout applied by reqwest.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Send `Authorization: Bearer <token>` with every request.
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub fn default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    pub fn build(self) -> Result<HttpClient> {
        let base_url = parse_base_url(&self.base_url)?;
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        let mut headers = self.default_headers.unwrap_or_default();
        if let Some(token) = self.bearer_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                TrackVaultError::Config("API token contains invalid header characters".into())
            })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        if !headers.is_empty() {
            builder = builder.default_headers(headers);
        }

        let client = builder.build().map_err(|err| TrackVaultError::from(InfraError::from(err)))?;

        Ok(HttpClient { client, base_url })
    }
}

/// Parse and normalise a base URL so relative joins append to its path.
pub(crate) fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim()).map_err(InfraError::from)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(TrackVaultError::Config(format!(
            "backend URL must use http or https, got '{}'",
            url.scheme()
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use reqwest::StatusCode;
    use serde::Deserialize;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Pong {
        pong: bool,
    }

    fn client_for(server: &MockServer) -> HttpClient {
        HttpClient::builder().base_url(server.uri()).build().expect("http client")
    }

    #[tokio::test]
    async fn returns_successful_response_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"pong": true})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let pong: Pong = client.get_json(&["ping"]).await.expect("response");

        assert_eq!(pong, Pong { pong: true });
    }

    #[tokio::test]
    async fn server_errors_are_not_retried_here() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let error = client.get_json::<Pong>(&["ping"]).await.unwrap_err();

        assert_eq!(error, TrackVaultError::http(500, "Internal Server Error"));
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn error_body_message_is_preferred() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(
                ResponseTemplate::new(StatusCode::NOT_FOUND)
                    .set_body_json(serde_json::json!({"error": "song t9 not found"})),
            )
            .mount(&server)
            .await;

        let error = client_for(&server).delete(&["songs", "t9"]).await.unwrap_err();

        assert_eq!(error, TrackVaultError::http(404, "song t9 not found"));
    }

    #[tokio::test]
    async fn base_path_prefix_is_kept() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/search"))
            .and(query_param("q", "night drive"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client =
            HttpClient::builder().base_url(format!("{}/api", server.uri())).build().unwrap();
        let hits: Vec<serde_json::Value> =
            client.get_json_with_query(&["search"], &[("q", "night drive")]).await.unwrap();

        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn bearer_token_is_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("authorization", "Bearer s3cret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"pong": true})))
            .expect(1)
            .mount(&server)
            .await;

        let client =
            HttpClient::builder().base_url(server.uri()).bearer_token("s3cret").build().unwrap();

        assert!(client.get_json::<Pong>(&["ping"]).await.is_ok());
    }

    #[tokio::test]
    async fn undecodable_body_is_serialization_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let error = client_for(&server).get_json::<Pong>(&["ping"]).await.unwrap_err();

        assert!(matches!(error, TrackVaultError::Serialization(_)), "got {error:?}");
    }

    #[tokio::test]
    async fn network_failure_surfaces_as_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener); // release the port so that requests fail with ECONNREFUSED

        let client = HttpClient::builder().base_url(format!("http://{addr}")).build().unwrap();

        match client.get_json::<Pong>(&["ping"]).await {
            Err(TrackVaultError::Network(_)) => {}
            other => panic!("expected network error, got {other:?}"),
        }
    }

    #[test]
    fn ids_are_encoded_as_single_segments() {
        let client = HttpClient::builder().base_url("http://nas:9000/api").build().unwrap();

        let url = client.endpoint(&["songs", "a/b?c"]).unwrap();

        assert_eq!(url.as_str(), "http://nas:9000/api/songs/a%2Fb%3Fc");
        assert_eq!(client.url("/health").unwrap().as_str(), "http://nas:9000/api/health");
    }

    #[test]
    fn rejects_non_http_base_urls() {
        assert!(matches!(parse_base_url("ftp://nas"), Err(TrackVaultError::Config(_))));
        assert!(matches!(parse_base_url("not a url"), Err(TrackVaultError::Config(_))));
        assert_eq!(parse_base_url("http://nas:9000/api").unwrap().as_str(), "http://nas:9000/api/");
    }
}
