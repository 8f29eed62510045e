//! Schema reconciliation.
//!
//! Resolves the object type and attribute ids an [`AssetRequest`] refers to,
//! creating whatever is missing in the remote schema. Names are matched
//! case-insensitively and ids are resolved once per request.

use crate::request::AssetRequest;
use al_connectors::{
    AssetsConnector, AssetsConnectorExt, AttributeDefinition, AttributePayload, ConnectorError,
};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// Errors that abort reconciliation.
#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("Failed to create object type '{name}': {source}")]
    ObjectTypeCreation {
        name: String,
        #[source]
        source: ConnectorError,
    },
}

/// Result of reconciling a request against the remote schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciledAsset {
    /// Id of the resolved (or newly created) object type.
    pub object_type_id: String,
    /// Whether the object type had to be created.
    pub created_object_type: bool,
    /// Attribute payloads in request order.
    pub attributes: Vec<AttributePayload>,
    /// Attributes created during this reconciliation.
    pub created_attributes: Vec<String>,
    /// Attributes left out because they could not be created.
    pub skipped: Vec<String>,
}

/// Reconciles requests against one object schema.
pub struct SchemaReconciler {
    connector: Arc<dyn AssetsConnector>,
    schema_id: String,
}

impl SchemaReconciler {
    pub fn new(connector: Arc<dyn AssetsConnector>, schema_id: impl Into<String>) -> Self {
        Self {
            connector,
            schema_id: schema_id.into(),
        }
    }

    pub fn schema_id(&self) -> &str {
        &self.schema_id
    }

    /// Resolves the object type and every attribute of `request`.
    ///
    /// Failing to create the object type is fatal and happens before any
    /// attribute lookup. Failing to create an attribute only drops that
    /// attribute. Nothing created here is rolled back.
    #[instrument(skip(self, request), fields(object_type = %request.object_type))]
    pub async fn reconcile(
        &self,
        request: &AssetRequest,
    ) -> Result<ReconciledAsset, ReconcileError> {
        let (object_type_id, created_object_type) =
            self.resolve_object_type(&request.object_type).await?;

        let mut known = self
            .connector
            .list_attributes_or_empty(&object_type_id)
            .await;

        let mut attributes = Vec::with_capacity(request.attributes.len());
        let mut created_attributes = Vec::new();
        let mut skipped = Vec::new();

        for (name, value) in &request.attributes {
            let attribute_id = match find_by_name(&known, name, |a| &a.name) {
                Some(existing) => {
                    debug!(attribute = %name, id = %existing.id, "Using existing attribute");
                    existing.id.clone()
                }
                None => match self.connector.create_attribute(&object_type_id, name).await {
                    Ok(id) => {
                        info!(attribute = %name, id = %id, "Created attribute");
                        known.push(AttributeDefinition {
                            id: id.clone(),
                            name: name.clone(),
                        });
                        created_attributes.push(name.clone());
                        id
                    }
                    Err(e) => {
                        warn!(
                            attribute = %name,
                            error = %e,
                            "Failed to create attribute, skipping"
                        );
                        skipped.push(name.clone());
                        continue;
                    }
                },
            };

            attributes.push(AttributePayload::single(attribute_id, value.clone()));
        }

        Ok(ReconciledAsset {
            object_type_id,
            created_object_type,
            attributes,
            created_attributes,
            skipped,
        })
    }

    async fn resolve_object_type(&self, name: &str) -> Result<(String, bool), ReconcileError> {
        let object_types = self
            .connector
            .list_object_types_or_empty(&self.schema_id)
            .await;
        debug!(count = object_types.len(), "Fetched object types");

        if let Some(existing) = find_by_name(&object_types, name, |t| &t.name) {
            debug!(id = %existing.id, "Found object type");
            return Ok((existing.id.clone(), false));
        }

        info!(object_type = %name, "Object type not found, creating it");
        let id = self
            .connector
            .create_object_type(&self.schema_id, name)
            .await
            .map_err(|source| ReconcileError::ObjectTypeCreation {
                name: name.to_string(),
                source,
            })?;

        Ok((id, true))
    }
}

fn find_by_name<'a, T>(items: &'a [T], name: &str, key: impl Fn(&T) -> &String) -> Option<&'a T> {
    let wanted = name.to_lowercase();
    items.iter().find(|item| key(item).to_lowercase() == wanted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use al_connectors::assets::mock::MockCall;
    use al_connectors::testing::seeded_mock;
    use al_connectors::MockAssetsConnector;
    use serde_json::json;

    fn request() -> AssetRequest {
        AssetRequest::new(
            "servers",
            [("name", json!("web-1")), ("Owner", json!("ops"))],
        )
    }

    #[tokio::test]
    async fn test_reuses_existing_schema_case_insensitively() {
        let (mock, type_id, ids) = seeded_mock("11", "Servers", &["Name", "OWNER"]).await;
        let mock = Arc::new(mock);
        let reconciler = SchemaReconciler::new(mock.clone(), "11");

        let reconciled = reconciler.reconcile(&request()).await.unwrap();

        assert_eq!(reconciled.object_type_id, type_id);
        assert!(!reconciled.created_object_type);
        assert!(reconciled.created_attributes.is_empty());
        assert_eq!(
            reconciled.attributes,
            vec![
                AttributePayload::single(ids[0].clone(), json!("web-1")),
                AttributePayload::single(ids[1].clone(), json!("ops")),
            ]
        );
    }

    #[tokio::test]
    async fn test_second_run_creates_nothing() {
        let mock = Arc::new(MockAssetsConnector::new("mock"));
        let reconciler = SchemaReconciler::new(mock.clone(), "11");

        let first = reconciler.reconcile(&request()).await.unwrap();
        assert!(first.created_object_type);
        assert_eq!(first.created_attributes, vec!["name", "Owner"]);

        let second = reconciler.reconcile(&request()).await.unwrap();
        assert!(!second.created_object_type);
        assert!(second.created_attributes.is_empty());
        assert_eq!(second.attributes, first.attributes);

        let creations = mock
            .calls()
            .await
            .into_iter()
            .filter(|c| {
                matches!(
                    c,
                    MockCall::CreateObjectType(_) | MockCall::CreateAttribute { .. }
                )
            })
            .count();
        assert_eq!(creations, 3);
    }

    #[tokio::test]
    async fn test_failed_attribute_is_skipped() {
        let (mock, _, _) = seeded_mock("11", "Servers", &["Name"]).await;
        mock.fail_attribute_creation("Owner").await;
        let reconciler = SchemaReconciler::new(Arc::new(mock), "11");

        let reconciled = reconciler.reconcile(&request()).await.unwrap();

        assert_eq!(reconciled.attributes.len(), 1);
        assert_eq!(reconciled.skipped, vec!["Owner"]);
    }

    #[tokio::test]
    async fn test_object_type_failure_is_fatal() {
        let mock = Arc::new(MockAssetsConnector::new("mock"));
        mock.fail_object_type_creation(true);
        let reconciler = SchemaReconciler::new(mock.clone(), "11");

        let err = reconciler.reconcile(&request()).await.unwrap_err();
        assert!(matches!(
            err,
            ReconcileError::ObjectTypeCreation { ref name, .. } if name == "servers"
        ));

        let calls = mock.calls().await;
        assert!(!calls
            .iter()
            .any(|c| matches!(c, MockCall::ListAttributes(_) | MockCall::CreateAttribute { .. })));
    }

    #[tokio::test]
    async fn test_case_variant_keys_create_once() {
        let (mock, _, _) = seeded_mock("11", "Servers", &[]).await;
        let mock = Arc::new(mock);
        let reconciler = SchemaReconciler::new(mock.clone(), "11");
        let request = AssetRequest::new(
            "Servers",
            [("Rack", json!("A1")), ("rack", json!("A2"))],
        );

        let reconciled = reconciler.reconcile(&request).await.unwrap();

        assert_eq!(reconciled.created_attributes, vec!["Rack"]);
        assert_eq!(reconciled.attributes.len(), 2);
        assert_eq!(
            reconciled.attributes[0].object_type_attribute_id,
            reconciled.attributes[1].object_type_attribute_id
        );
    }

    #[tokio::test]
    async fn test_listing_failure_degrades_to_creation() {
        let mock = Arc::new(MockAssetsConnector::new("mock"));
        mock.seed_object_type("11", "Servers").await;
        mock.fail_listing(true);
        let reconciler = SchemaReconciler::new(mock.clone(), "11");

        let reconciled = reconciler.reconcile(&request()).await.unwrap();

        assert!(reconciled.created_object_type);
        assert_eq!(mock.object_types("11").await.len(), 2);
    }
}
