//! Common test utilities for integration tests.

use al_api::{ApiServer, AppState, WebTriggerResponse};
use al_connectors::testing::{sample_asset, seeded_mock};
use al_connectors::MockAssetsConnector;
use al_core::SyncSettings;
use axum::{
    body::Body,
    http::{Method, StatusCode},
    Router,
};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

/// Creates a mock holding a "Network Assets" type with two assets.
pub async fn create_test_connector() -> Arc<MockAssetsConnector> {
    let (mock, type_id, ids) =
        seeded_mock("11", "Network Assets", &["Name", "Key", "IP"]).await;
    mock.seed_asset(sample_asset(
        "301",
        &type_id,
        &[
            (ids[0].as_str(), json!("core-switch")),
            (ids[1].as_str(), json!("NA-301")),
            (ids[2].as_str(), json!("10.1.0.1")),
        ],
    ))
    .await;
    mock.seed_asset(sample_asset(
        "302",
        &type_id,
        &[(ids[0].as_str(), json!("edge-router"))],
    ))
    .await;
    Arc::new(mock)
}

/// Creates a router with the full middleware stack over `connector`.
pub fn create_router(connector: Arc<MockAssetsConnector>) -> Router {
    let state = AppState::new(connector, SyncSettings::default());
    ApiServer::with_state(state).router()
}

/// Creates a seeded connector and a router over it.
pub async fn create_test_router() -> (Router, Arc<MockAssetsConnector>) {
    let connector = create_test_connector().await;
    (create_router(connector.clone()), connector)
}

/// Helper to make GET requests.
pub fn get_request(uri: &str) -> axum::extract::Request<Body> {
    axum::extract::Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Helper to make POST requests with a JSON body.
pub fn post_json_request(uri: &str, body: &str) -> axum::extract::Request<Body> {
    axum::extract::Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Wraps `body` text in a web-trigger request payload.
pub fn trigger_payload(body: &str) -> String {
    json!({ "body": body, "method": "POST" }).to_string()
}

/// Sends request and parses JSON response.
pub async fn send_request<T: DeserializeOwned>(
    app: Router,
    request: axum::extract::Request<Body>,
) -> (StatusCode, T) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let parsed: T = serde_json::from_slice(&body).unwrap_or_else(|e| {
        panic!(
            "Failed to parse response: {} - Body: {:?}",
            e,
            String::from_utf8_lossy(&body)
        )
    });
    (status, parsed)
}

/// Sends a trigger request and returns the envelope.
pub async fn send_trigger(app: Router, uri: &str, body: &str) -> WebTriggerResponse {
    let (status, envelope): (StatusCode, WebTriggerResponse) =
        send_request(app, post_json_request(uri, body)).await;
    assert_eq!(status, StatusCode::OK, "Triggers always answer 200");
    envelope
}
