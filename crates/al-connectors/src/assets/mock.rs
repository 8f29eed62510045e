//! Mock assets connector for testing.
//!
//! Keeps an in-memory schema (object types, attributes, assets), records
//! every call and supports failure injection per operation.

use crate::traits::{
    Asset, AssetAttribute, AssetObjectType, AssetsConnector, AttributeDefinition,
    AttributePayload, AttributeValue, ConnectorError, ConnectorHealth, ConnectorResult,
    ObjectType, Page,
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// A call received by the mock.
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    ListObjectTypes(String),
    ListAttributes(String),
    CreateObjectType(String),
    CreateAttribute {
        object_type_id: String,
        name: String,
    },
    CreateAsset {
        object_type_id: String,
        attributes: Vec<AttributePayload>,
    },
    DeleteAsset(String),
    QueryAssets(String),
}

#[derive(Default)]
struct MockState {
    object_types: Vec<(String, ObjectType)>,
    attributes: HashMap<String, Vec<AttributeDefinition>>,
    assets: Vec<Asset>,
    calls: Vec<MockCall>,
    failing_attributes: HashSet<String>,
    failing_queries: HashSet<String>,
}

/// Mock assets connector for testing.
pub struct MockAssetsConnector {
    name: String,
    state: Arc<RwLock<MockState>>,
    counter: AtomicU64,
    fail_listing: AtomicBool,
    fail_object_type_creation: AtomicBool,
    fail_asset_creation: AtomicBool,
    fail_delete: AtomicBool,
}

impl MockAssetsConnector {
    /// Creates a new, empty mock connector.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            state: Arc::new(RwLock::new(MockState::default())),
            counter: AtomicU64::new(1),
            fail_listing: AtomicBool::new(false),
            fail_object_type_creation: AtomicBool::new(false),
            fail_asset_creation: AtomicBool::new(false),
            fail_delete: AtomicBool::new(false),
        }
    }

    fn next_id(&self) -> String {
        self.counter.fetch_add(1, Ordering::SeqCst).to_string()
    }

    /// Makes every list/query operation fail and reports the connector
    /// as unhealthy.
    pub fn fail_listing(&self, fail: bool) {
        self.fail_listing.store(fail, Ordering::SeqCst);
    }

    /// Makes object type creation fail.
    pub fn fail_object_type_creation(&self, fail: bool) {
        self.fail_object_type_creation.store(fail, Ordering::SeqCst);
    }

    /// Makes asset creation fail.
    pub fn fail_asset_creation(&self, fail: bool) {
        self.fail_asset_creation.store(fail, Ordering::SeqCst);
    }

    /// Makes asset deletion fail.
    pub fn fail_delete(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::SeqCst);
    }

    /// Makes creation of the named attribute fail (case-insensitive).
    pub async fn fail_attribute_creation(&self, name: &str) {
        self.state
            .write()
            .await
            .failing_attributes
            .insert(name.to_lowercase());
    }

    /// Makes asset queries for the named object type fail (case-insensitive).
    pub async fn fail_query_for(&self, object_type_name: &str) {
        self.state
            .write()
            .await
            .failing_queries
            .insert(object_type_name.to_lowercase());
    }

    /// Adds an object type to a schema and returns its id.
    pub async fn seed_object_type(&self, schema_id: &str, name: &str) -> String {
        let id = self.next_id();
        self.state.write().await.object_types.push((
            schema_id.to_string(),
            ObjectType {
                id: id.clone(),
                name: name.to_string(),
            },
        ));
        id
    }

    /// Adds an attribute to an object type and returns its id.
    pub async fn seed_attribute(&self, object_type_id: &str, name: &str) -> String {
        let id = self.next_id();
        self.state
            .write()
            .await
            .attributes
            .entry(object_type_id.to_string())
            .or_default()
            .push(AttributeDefinition {
                id: id.clone(),
                name: name.to_string(),
            });
        id
    }

    /// Stores an asset as-is.
    pub async fn seed_asset(&self, asset: Asset) {
        self.state.write().await.assets.push(asset);
    }

    /// Returns every call received so far.
    pub async fn calls(&self) -> Vec<MockCall> {
        self.state.read().await.calls.clone()
    }

    /// Returns the stored object types of a schema.
    pub async fn object_types(&self, schema_id: &str) -> Vec<ObjectType> {
        self.state
            .read()
            .await
            .object_types
            .iter()
            .filter(|(schema, _)| schema == schema_id)
            .map(|(_, ot)| ot.clone())
            .collect()
    }

    /// Returns the stored attributes of an object type.
    pub async fn attributes(&self, object_type_id: &str) -> Vec<AttributeDefinition> {
        self.state
            .read()
            .await
            .attributes
            .get(object_type_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Returns the stored assets.
    pub async fn assets(&self) -> Vec<Asset> {
        self.state.read().await.assets.clone()
    }

    async fn record(&self, call: MockCall) {
        self.state.write().await.calls.push(call);
    }

    fn listing_error(&self) -> ConnectorResult<()> {
        if self.fail_listing.load(Ordering::SeqCst) {
            Err(ConnectorError::Remote {
                status: 503,
                message: "mock listing failure".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl crate::traits::Connector for MockAssetsConnector {
    fn name(&self) -> &str {
        &self.name
    }

    fn connector_type(&self) -> &str {
        "assets"
    }

    async fn health_check(&self) -> ConnectorResult<ConnectorHealth> {
        if self.fail_listing.load(Ordering::SeqCst) {
            Ok(ConnectorHealth::Unhealthy(
                "mock listing failure".to_string(),
            ))
        } else {
            Ok(ConnectorHealth::Healthy)
        }
    }

    async fn test_connection(&self) -> ConnectorResult<bool> {
        Ok(!self.fail_listing.load(Ordering::SeqCst))
    }
}

#[async_trait]
impl AssetsConnector for MockAssetsConnector {
    async fn list_object_types(&self, schema_id: &str) -> ConnectorResult<Vec<ObjectType>> {
        self.record(MockCall::ListObjectTypes(schema_id.to_string()))
            .await;
        self.listing_error()?;
        Ok(self.object_types(schema_id).await)
    }

    async fn list_attributes(
        &self,
        object_type_id: &str,
    ) -> ConnectorResult<Vec<AttributeDefinition>> {
        self.record(MockCall::ListAttributes(object_type_id.to_string()))
            .await;
        self.listing_error()?;
        Ok(self.attributes(object_type_id).await)
    }

    async fn create_object_type(&self, schema_id: &str, name: &str) -> ConnectorResult<String> {
        self.record(MockCall::CreateObjectType(name.to_string()))
            .await;
        if self.fail_object_type_creation.load(Ordering::SeqCst) {
            return Err(ConnectorError::Remote {
                status: 400,
                message: "mock object type failure".to_string(),
            });
        }
        Ok(self.seed_object_type(schema_id, name).await)
    }

    async fn create_attribute(
        &self,
        object_type_id: &str,
        name: &str,
    ) -> ConnectorResult<String> {
        self.record(MockCall::CreateAttribute {
            object_type_id: object_type_id.to_string(),
            name: name.to_string(),
        })
        .await;
        let failing = self
            .state
            .read()
            .await
            .failing_attributes
            .contains(&name.to_lowercase());
        if failing {
            return Err(ConnectorError::Remote {
                status: 400,
                message: format!("mock attribute failure: {}", name),
            });
        }
        Ok(self.seed_attribute(object_type_id, name).await)
    }

    async fn create_asset(
        &self,
        object_type_id: &str,
        attributes: Vec<AttributePayload>,
    ) -> ConnectorResult<Asset> {
        self.record(MockCall::CreateAsset {
            object_type_id: object_type_id.to_string(),
            attributes: attributes.clone(),
        })
        .await;
        if self.fail_asset_creation.load(Ordering::SeqCst) {
            return Err(ConnectorError::Remote {
                status: 500,
                message: "mock asset failure".to_string(),
            });
        }

        let id = self.next_id();
        let mut state = self.state.write().await;
        let type_name = state
            .object_types
            .iter()
            .find(|(_, ot)| ot.id == object_type_id)
            .map(|(_, ot)| ot.name.clone());

        let asset = Asset {
            id: id.clone(),
            object_key: Some(format!("MOCK-{}", id)),
            label: None,
            object_type: AssetObjectType {
                id: object_type_id.to_string(),
                name: type_name,
            },
            attributes: attributes
                .into_iter()
                .map(|a| AssetAttribute {
                    object_type_attribute_id: a.object_type_attribute_id,
                    object_attribute_values: a
                        .object_attribute_values
                        .into_iter()
                        .map(|v| AttributeValue {
                            value: v.value,
                            display_value: None,
                        })
                        .collect(),
                })
                .collect(),
        };
        state.assets.push(asset.clone());
        Ok(asset)
    }

    async fn delete_asset(&self, asset_id: &str) -> bool {
        self.record(MockCall::DeleteAsset(asset_id.to_string()))
            .await;
        if self.fail_delete.load(Ordering::SeqCst) {
            return false;
        }
        let mut state = self.state.write().await;
        let before = state.assets.len();
        state.assets.retain(|a| a.id != asset_id);
        state.assets.len() != before
    }

    async fn query_assets(&self, aql: &str, page: Page) -> ConnectorResult<Vec<Asset>> {
        self.record(MockCall::QueryAssets(aql.to_string())).await;
        self.listing_error()?;

        let wanted = parse_object_type_clause(aql).ok_or_else(|| ConnectorError::Remote {
            status: 400,
            message: format!("mock cannot evaluate AQL: {}", aql),
        })?;

        let state = self.state.read().await;
        if state.failing_queries.contains(&wanted.to_lowercase()) {
            return Err(ConnectorError::Remote {
                status: 500,
                message: format!("mock query failure for {}", wanted),
            });
        }

        let type_ids: HashSet<&str> = state
            .object_types
            .iter()
            .filter(|(_, ot)| ot.name.eq_ignore_ascii_case(&wanted))
            .map(|(_, ot)| ot.id.as_str())
            .collect();

        Ok(state
            .assets
            .iter()
            .filter(|a| type_ids.contains(a.object_type.id.as_str()))
            .skip(page.start_at as usize)
            .take(page.max_results as usize)
            .cloned()
            .collect())
    }
}

/// Extracts the name from `objectType = "<name>"`.
fn parse_object_type_clause(aql: &str) -> Option<String> {
    let rest = aql.trim().strip_prefix("objectType")?.trim_start();
    let quoted = rest.strip_prefix('=')?.trim();
    let inner = quoted.strip_prefix('"')?.strip_suffix('"')?;
    Some(inner.replace("\\\"", "\"").replace("\\\\", "\\"))
}
