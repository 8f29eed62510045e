//! Web-trigger operations.
//!
//! Each trigger turns its outcome into a [`WebTriggerResponse`]; failures are
//! logged and reported as the `null` payload, never as an error.

use crate::dto::{WebTriggerRequest, WebTriggerResponse};
use al_core::{decode_body, AssetCatalog, AssetUpserter};
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

/// Upserts the asset described by the request body and echoes the parsed
/// request.
pub async fn create_assets(
    upserter: &AssetUpserter,
    request: &WebTriggerRequest,
) -> WebTriggerResponse {
    debug!(
        method = request.method.as_deref().unwrap_or("-"),
        headers = ?request.headers.keys().collect::<Vec<_>>(),
        "Handling create-assets trigger"
    );

    let raw = match decode_body(request.body_text().as_deref()) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %e, "Rejecting web-trigger request");
            return WebTriggerResponse::failure();
        }
    };

    match upserter.upsert_raw(&raw).await {
        Ok(outcome) => {
            info!(
                asset_id = %outcome.asset.id,
                object_type_id = %outcome.object_type_id,
                skipped = outcome.skipped_attributes.len(),
                "Asset upserted"
            );
            WebTriggerResponse::new(Some(Value::Object(outcome.parsed)))
        }
        Err(e) => {
            error!(error = %e, "Error processing request");
            WebTriggerResponse::failure()
        }
    }
}

/// Lists the assets of the default object type.
pub async fn list_assets(catalog: &AssetCatalog) -> WebTriggerResponse {
    match catalog.list_assets().await {
        Ok(payload) => WebTriggerResponse::new(Some(payload)),
        Err(e) => {
            error!(error = %e, "Error fetching assets");
            WebTriggerResponse::failure()
        }
    }
}

/// Lists the assets of every object type in the schema.
pub async fn knowledge_base(catalog: &AssetCatalog) -> WebTriggerResponse {
    let records = catalog.knowledge_base().await;
    WebTriggerResponse::new(Some(Value::Array(
        records.into_iter().map(Value::Object).collect(),
    )))
}

/// Answers with a random number.
pub fn ping() -> WebTriggerResponse {
    WebTriggerResponse::new(Some(json!(rand::random::<f64>())))
}
