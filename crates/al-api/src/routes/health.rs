//! Health check endpoints.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use std::time::Instant;

use al_connectors::{Connector, ConnectorHealth};

use crate::dto::{ConnectorHealthResponse, HealthResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// Start time for uptime calculation.
static START_TIME: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();

/// Initialize the start time.
pub fn init_start_time() {
    START_TIME.get_or_init(Instant::now);
}

/// Creates health check routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/live", get(liveness_check))
}

/// Reports connector health, version and uptime.
///
/// Healthy and degraded connectors answer 200, anything else 503.
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let uptime = START_TIME.get().map(|t| t.elapsed().as_secs()).unwrap_or(0);

    let (status, detail) = match state.connector.health_check().await {
        Ok(ConnectorHealth::Healthy) => ("healthy", None),
        Ok(ConnectorHealth::Degraded(reason)) => ("degraded", Some(reason)),
        Ok(ConnectorHealth::Unhealthy(reason)) => ("unhealthy", Some(reason)),
        Ok(ConnectorHealth::Unknown) => ("unknown", None),
        Err(e) => ("unhealthy", Some(e.to_string())),
    };

    let http_status = match status {
        "healthy" | "degraded" => StatusCode::OK,
        _ => StatusCode::SERVICE_UNAVAILABLE,
    };

    (
        http_status,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            connector: ConnectorHealthResponse {
                name: state.connector.name().to_string(),
                status: status.to_string(),
                detail,
            },
            uptime_seconds: uptime,
        }),
    )
}

/// Readiness probe: 200 once the remote API answers.
async fn readiness_check(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    if state.connector.test_connection().await? {
        Ok(StatusCode::OK)
    } else {
        Err(ApiError::ServiceUnavailable(
            "Assets API is not reachable".to_string(),
        ))
    }
}

/// Liveness probe.
async fn liveness_check() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;
    use al_connectors::MockAssetsConnector;
    use al_core::SyncSettings;
    use axum::{body::Body, http::Request};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn create_test_router(mock: Arc<MockAssetsConnector>) -> Router {
        let state = AppState::new(mock, SyncSettings::default());
        Router::new().merge(routes()).with_state(state)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health_check_healthy() {
        let app = create_test_router(Arc::new(MockAssetsConnector::new("assets")));

        let response = app.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let health: HealthResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(health.status, "healthy");
        assert_eq!(health.connector.name, "assets");
    }

    #[tokio::test]
    async fn test_health_check_unhealthy() {
        let mock = Arc::new(MockAssetsConnector::new("assets"));
        mock.fail_listing(true);
        let app = create_test_router(mock);

        let response = app.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_readiness_follows_connection() {
        let mock = Arc::new(MockAssetsConnector::new("assets"));
        let app = create_test_router(mock.clone());
        let response = app.clone().oneshot(get("/ready")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        mock.fail_listing(true);
        let response = app.oneshot(get("/ready")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_liveness() {
        let app = create_test_router(Arc::new(MockAssetsConnector::new("assets")));
        let response = app.oneshot(get("/live")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
