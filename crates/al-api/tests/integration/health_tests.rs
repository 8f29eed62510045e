//! Health check endpoint integration tests.

use axum::http::StatusCode;
use serde_json::Value;

use super::common::{create_test_router, get_request, send_request};

#[tokio::test]
async fn test_health_endpoint_reports_connector() {
    let (app, _) = create_test_router().await;

    let (status, body): (StatusCode, Value) = send_request(app, get_request("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["connector"]["name"], "mock");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_health_endpoint_unhealthy_connector() {
    let (app, connector) = create_test_router().await;
    connector.fail_listing(true);

    let (status, body): (StatusCode, Value) = send_request(app, get_request("/health")).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "unhealthy");
}

#[tokio::test]
async fn test_ready_endpoint_error_body() {
    let (app, connector) = create_test_router().await;
    connector.fail_listing(true);

    let (status, body): (StatusCode, Value) = send_request(app, get_request("/ready")).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "SERVICE_UNAVAILABLE");
}

#[tokio::test]
async fn test_live_endpoint_returns_ok() {
    let (app, _) = create_test_router().await;
    let response = tower::ServiceExt::oneshot(app, get_request("/live"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
