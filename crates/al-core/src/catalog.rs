//! Read-side listings of stored assets.

use crate::flatten::{attribute_names, flatten_asset, FlattenOptions};
use crate::settings::SyncSettings;
use al_connectors::{object_type_aql, AssetsConnector, AssetsConnectorExt, ConnectorResult};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Key of the asset array in the listing payload.
pub const NETWORK_ASSETS_KEY: &str = "networkAssets";

/// Lists assets as flattened records.
pub struct AssetCatalog {
    connector: Arc<dyn AssetsConnector>,
    settings: SyncSettings,
}

impl AssetCatalog {
    pub fn new(connector: Arc<dyn AssetsConnector>, settings: SyncSettings) -> Self {
        Self {
            connector,
            settings,
        }
    }

    /// Lists the first page of assets of the default object type.
    ///
    /// Returns `{"networkAssets": [...]}`. Attribute names are resolved from
    /// the object type of the first asset. A failed query is an error; a
    /// failed attribute lookup only leaves the records empty.
    #[instrument(skip(self), fields(object_type = %self.settings.default_object_type))]
    pub async fn list_assets(&self) -> ConnectorResult<Value> {
        let aql = object_type_aql(&self.settings.default_object_type);
        let assets = self
            .connector
            .query_assets(&aql, self.settings.page)
            .await?;

        let Some(first) = assets.first() else {
            return Ok(json!({ NETWORK_ASSETS_KEY: [] }));
        };

        let definitions = self
            .connector
            .list_attributes_or_empty(&first.object_type.id)
            .await;
        let names = attribute_names(&definitions);
        let options = FlattenOptions::listing();

        let records: Vec<Value> = assets
            .iter()
            .map(|asset| Value::Object(flatten_asset(asset, &names, &options)))
            .collect();
        debug!(count = records.len(), "Listed assets");

        Ok(json!({ NETWORK_ASSETS_KEY: records }))
    }

    /// Lists the first page of assets of every object type in the schema.
    ///
    /// Object types whose query fails are logged and left out.
    #[instrument(skip(self), fields(schema_id = %self.settings.schema_id))]
    pub async fn knowledge_base(&self) -> Vec<Map<String, Value>> {
        let object_types = self
            .connector
            .list_object_types_or_empty(&self.settings.schema_id)
            .await;
        let options = FlattenOptions::knowledge_base();

        let mut records = Vec::new();
        for object_type in &object_types {
            let definitions = self
                .connector
                .list_attributes_or_empty(&object_type.id)
                .await;
            let names = attribute_names(&definitions);

            let aql = object_type_aql(&object_type.name);
            let assets = self
                .connector
                .query_assets_or_empty(&aql, self.settings.page)
                .await;
            records.extend(
                assets
                    .iter()
                    .map(|asset| flatten_asset(asset, &names, &options)),
            );
        }

        debug!(
            object_types = object_types.len(),
            count = records.len(),
            "Built knowledge base"
        );
        records
    }
}
