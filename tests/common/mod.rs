//! Common test utilities for integration tests

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use appconfig_demo::domain::models::ConfigEntries;
use appconfig_demo::infrastructure::providers::InMemoryProvider;
use appconfig_demo::{Application, Config};

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
#[allow(dead_code)]
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Entries from `(key, value)` pairs
pub fn entries(pairs: &[(&str, &str)]) -> ConfigEntries {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

/// Service config with the background jobs disabled
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.schedule.enabled = false;
    config
}

/// Application wired to an in-memory provider seeded with `pairs`
pub async fn app_with(pairs: &[(&str, &str)]) -> (Application, Arc<InMemoryProvider>) {
    setup_test_logging();
    let provider = Arc::new(InMemoryProvider::new(entries(pairs)));
    let app = Application::with_provider(&test_config(), provider.clone()).await;
    (app, provider)
}

/// Send one request through the router and decode the JSON body
pub async fn call(router: Router, method: Method, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[allow(dead_code)]
pub async fn get(router: Router, uri: &str) -> (StatusCode, Value) {
    call(router, Method::GET, uri).await
}

#[allow(dead_code)]
pub async fn post(router: Router, uri: &str) -> (StatusCode, Value) {
    call(router, Method::POST, uri).await
}
