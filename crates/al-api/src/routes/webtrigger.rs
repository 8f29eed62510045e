//! Web-trigger endpoints.
//!
//! Every handler answers 200 with the web-trigger envelope.

use axum::{body::Bytes, extract::State, routing::post, Extension, Json, Router};
use tracing::Instrument;

use crate::dto::{WebTriggerRequest, WebTriggerResponse};
use crate::middleware::RequestId;
use crate::state::AppState;
use crate::triggers;

/// Creates web-trigger routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/create-assets", post(create_assets))
        .route("/list-assets", post(list_assets))
        .route("/knowledge-base", post(knowledge_base))
        .route("/ping", post(ping))
}

fn request_id(extension: Option<Extension<RequestId>>) -> String {
    extension
        .map(|Extension(id)| id.0)
        .unwrap_or_else(|| "unknown".to_string())
}

async fn create_assets(
    State(state): State<AppState>,
    request_id_ext: Option<Extension<RequestId>>,
    body: Bytes,
) -> Json<WebTriggerResponse> {
    let span = al_observability::trigger_span!("create-assets", request_id(request_id_ext));
    let request = WebTriggerRequest::from_bytes(&body);

    Json(
        triggers::create_assets(&state.upserter, &request)
            .instrument(span)
            .await,
    )
}

async fn list_assets(
    State(state): State<AppState>,
    request_id_ext: Option<Extension<RequestId>>,
) -> Json<WebTriggerResponse> {
    let span = al_observability::trigger_span!("list-assets", request_id(request_id_ext));
    Json(triggers::list_assets(&state.catalog).instrument(span).await)
}

async fn knowledge_base(
    State(state): State<AppState>,
    request_id_ext: Option<Extension<RequestId>>,
) -> Json<WebTriggerResponse> {
    let span = al_observability::trigger_span!("knowledge-base", request_id(request_id_ext));
    Json(triggers::knowledge_base(&state.catalog).instrument(span).await)
}

async fn ping() -> Json<WebTriggerResponse> {
    Json(triggers::ping())
}
