#![allow(dead_code)]

use serde_json::json;
use trackvault_domain::Config;
use trackvault_lib::context::AppContext;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Config pointing at `server` with millisecond backoff.
pub fn test_config(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.backend.base_url = server.uri();
    config.backend.request_timeout_secs = 2;
    config.retry.base_delay_ms = 10;
    config.retry.max_delay_ms = 40;
    config.health.probe_timeout_secs = 1;
    config.monitoring.poll_interval_secs = 1;
    config
}

/// Mock backend answering the health endpoint with `ok`.
pub async fn healthy_backend() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "connectionPool": {"active": 0, "idle": 4},
            "songs": 3
        })))
        .mount(&server)
        .await;
    server
}

pub fn context_for(server: &MockServer) -> AppContext {
    AppContext::new_with_config(test_config(server)).expect("context should build")
}
