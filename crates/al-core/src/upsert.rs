//! Asset upsert orchestration.
//!
//! An upsert reconciles the schema, creates the asset and then, when the
//! request names an asset it replaces, deletes that asset.

use crate::reconcile::{ReconcileError, SchemaReconciler};
use crate::request::{parse_request, AssetRequest, RequestError};
use crate::settings::SyncSettings;
use al_connectors::{Asset, AssetsConnector, ConnectorError};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument, warn};

/// Errors that make an upsert fail.
#[derive(Error, Debug)]
pub enum UpsertError {
    #[error("Invalid request: {0}")]
    Request(#[from] RequestError),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    #[error("Failed to create asset of object type {object_type_id}: {source}")]
    AssetCreation {
        object_type_id: String,
        #[source]
        source: ConnectorError,
    },
}

/// Deletion of the asset replaced by an upsert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Supersede {
    pub asset_id: String,
    pub deleted: bool,
}

/// Outcome of a successful upsert.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpsertOutcome {
    /// The request as parsed, before null attributes and unknown fields
    /// were dropped. This is what the trigger echoes.
    pub parsed: Map<String, Value>,
    pub request: AssetRequest,
    pub object_type_id: String,
    pub created_object_type: bool,
    pub asset: Asset,
    pub created_attributes: Vec<String>,
    pub skipped_attributes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub superseded: Option<Supersede>,
}

/// Creates assets from requests, creating missing schema on the way.
pub struct AssetUpserter {
    connector: Arc<dyn AssetsConnector>,
    reconciler: SchemaReconciler,
}

impl AssetUpserter {
    pub fn new(connector: Arc<dyn AssetsConnector>, settings: &SyncSettings) -> Self {
        Self {
            reconciler: SchemaReconciler::new(connector.clone(), settings.schema_id.clone()),
            connector,
        }
    }

    /// Reconciles, creates the asset and deletes `supersede` afterwards.
    ///
    /// The delete is attempted exactly once and only after the asset was
    /// created. Its result is reported but never fails the upsert.
    pub async fn upsert(
        &self,
        request: &AssetRequest,
        supersede: Option<&str>,
    ) -> Result<UpsertOutcome, UpsertError> {
        self.upsert_parsed(request, request.to_map(), supersede).await
    }

    #[instrument(
        name = "upsert",
        skip(self, request, parsed),
        fields(object_type = %request.object_type)
    )]
    async fn upsert_parsed(
        &self,
        request: &AssetRequest,
        parsed: Map<String, Value>,
        supersede: Option<&str>,
    ) -> Result<UpsertOutcome, UpsertError> {
        let reconciled = self.reconciler.reconcile(request).await?;

        info!(attributes = reconciled.attributes.len(), "Creating asset");
        let asset = self
            .connector
            .create_asset(&reconciled.object_type_id, reconciled.attributes)
            .await
            .map_err(|source| UpsertError::AssetCreation {
                object_type_id: reconciled.object_type_id.clone(),
                source,
            })?;
        info!(asset_id = %asset.id, "Asset created");

        let superseded = match supersede {
            Some(old_id) => {
                let deleted = self.connector.delete_asset(old_id).await;
                if deleted {
                    info!(asset_id = %old_id, "Deleted superseded asset");
                } else {
                    warn!(asset_id = %old_id, "Failed to delete superseded asset");
                }
                Some(Supersede {
                    asset_id: old_id.to_string(),
                    deleted,
                })
            }
            None => None,
        };

        Ok(UpsertOutcome {
            parsed,
            request: request.clone(),
            object_type_id: reconciled.object_type_id,
            created_object_type: reconciled.created_object_type,
            asset,
            created_attributes: reconciled.created_attributes,
            skipped_attributes: reconciled.skipped,
            superseded,
        })
    }

    /// Parses a decoded trigger body and upserts it.
    ///
    /// The asset named by `attributes.id` is superseded.
    pub async fn upsert_raw(&self, raw: &Value) -> Result<UpsertOutcome, UpsertError> {
        let parsed = parse_request(raw);
        let request = AssetRequest::from_parsed(parsed.clone())?;
        let supersede = request.supersede_id();
        self.upsert_parsed(&request, parsed, supersede.as_deref()).await
    }
}
