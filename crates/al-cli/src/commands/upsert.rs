//! Upsert command - runs the asset upsert trigger once.

use al_api::triggers::create_assets;
use al_api::WebTriggerRequest;
use al_connectors::AssetsConnector;
use al_core::{AssetUpserter, SyncSettings};
use anyhow::{Context, Result};
use std::sync::Arc;

/// Reads the payload argument; `@path` reads the payload from a file.
pub fn read_payload(argument: &str) -> Result<String> {
    match argument.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read payload file: {}", path)),
        None => Ok(argument.to_string()),
    }
}

/// Upserts one asset and returns the web-trigger envelope as JSON.
pub async fn run_upsert(
    connector: Arc<dyn AssetsConnector>,
    settings: &SyncSettings,
    payload: String,
) -> Result<serde_json::Value> {
    let upserter = AssetUpserter::new(connector, settings);
    let response = create_assets(&upserter, &WebTriggerRequest::with_body(payload)).await;
    Ok(serde_json::to_value(&response)?)
}
