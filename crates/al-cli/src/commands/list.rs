//! List command - runs the listing triggers once.

use al_api::triggers::{knowledge_base, list_assets};
use al_api::WebTriggerResponse;
use al_connectors::AssetsConnector;
use al_core::{AssetCatalog, SyncSettings};
use std::sync::Arc;

/// Which listing to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListTarget {
    /// Assets of the default object type.
    DefaultType,
    /// Assets of every object type in the schema.
    KnowledgeBase,
}

/// Runs a listing and returns its envelope.
pub async fn run_list(
    connector: Arc<dyn AssetsConnector>,
    settings: SyncSettings,
    target: ListTarget,
) -> WebTriggerResponse {
    let catalog = AssetCatalog::new(connector, settings);
    match target {
        ListTarget::DefaultType => list_assets(&catalog).await,
        ListTarget::KnowledgeBase => knowledge_base(&catalog).await,
    }
}
