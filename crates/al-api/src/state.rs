//! Application state shared across handlers.

use al_connectors::{AssetsConnector, Connector};
use al_core::{AssetCatalog, AssetUpserter, SyncSettings};
use std::sync::Arc;
use tracing::info;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Connector to the remote asset store.
    pub connector: Arc<dyn AssetsConnector>,
    /// Schema settings.
    pub settings: Arc<SyncSettings>,
    /// Upsert orchestrator.
    pub upserter: Arc<AssetUpserter>,
    /// Listing service.
    pub catalog: Arc<AssetCatalog>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(connector: Arc<dyn AssetsConnector>, settings: SyncSettings) -> Self {
        info!(
            connector = connector.name(),
            schema_id = %settings.schema_id,
            "Application state initialized"
        );

        Self {
            upserter: Arc::new(AssetUpserter::new(connector.clone(), &settings)),
            catalog: Arc::new(AssetCatalog::new(connector.clone(), settings.clone())),
            settings: Arc::new(settings),
            connector,
        }
    }
}
