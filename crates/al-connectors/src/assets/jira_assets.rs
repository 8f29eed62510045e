//! Jira Service Management Assets connector.
//!
//! Talks to the Assets REST API (`/jsm/assets/workspace/{workspaceId}/v1`)
//! with Basic authentication. Every operation is a single request.

use crate::http::HttpClient;
use crate::traits::{
    Asset, AssetsConnector, AttributeDefinition, AttributePayload, ConnectorConfig,
    ConnectorError, ConnectorHealth, ConnectorResult, ObjectType, Page,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Atlassian Cloud gateway for Assets workspaces.
pub const ASSETS_CLOUD_GATEWAY: &str = "https://api.atlassian.com/jsm/assets/workspace";

/// Attribute type id for "Default" attributes.
const DEFAULT_ATTRIBUTE_TYPE: &str = "0";
/// Default type id for "Text" within the "Default" attribute type.
const DEFAULT_ATTRIBUTE_DEFAULT_TYPE_ID: &str = "0";

/// Assets-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetsConfig {
    /// Base connector configuration. An empty `base_url` selects the cloud
    /// gateway for `workspace_id`.
    #[serde(flatten)]
    pub connector: ConnectorConfig,
    /// Assets workspace id.
    pub workspace_id: String,
    /// Object schema holding every object type this integration touches.
    #[serde(default = "default_schema_id")]
    pub schema_id: String,
    /// Icon assigned to auto-created object types.
    #[serde(default = "default_icon_id")]
    pub icon_id: String,
    /// Object type listed by the asset listing trigger.
    #[serde(default = "default_object_type")]
    pub default_object_type: String,
    /// Page size for AQL queries (only the first page is ever read).
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_schema_id() -> String {
    "11".to_string()
}

fn default_icon_id() -> String {
    "13".to_string()
}

fn default_object_type() -> String {
    "Network Assets".to_string()
}

fn default_page_size() -> u32 {
    5
}

impl AssetsConfig {
    /// Returns the cloud base URL for a workspace.
    pub fn cloud_base_url(workspace_id: &str) -> String {
        format!("{}/{}/v1", ASSETS_CLOUD_GATEWAY, workspace_id)
    }

    /// Returns the effective base URL.
    pub fn base_url(&self) -> String {
        if self.connector.base_url.trim().is_empty() {
            Self::cloud_base_url(&self.workspace_id)
        } else {
            self.connector.base_url.clone()
        }
    }

    /// Page window used for asset queries.
    pub fn page(&self) -> Page {
        Page {
            start_at: 0,
            max_results: self.page_size,
        }
    }
}

/// Connector for the Jira Service Management Assets REST API.
pub struct JiraAssetsConnector {
    config: AssetsConfig,
    client: HttpClient,
}

impl JiraAssetsConnector {
    /// Creates a new Assets connector.
    pub fn new(config: AssetsConfig) -> ConnectorResult<Self> {
        if config.workspace_id.trim().is_empty() && config.connector.base_url.trim().is_empty() {
            return Err(ConnectorError::ConfigError(
                "Either workspace_id or base_url must be set".to_string(),
            ));
        }

        let mut connector_config = config.connector.clone();
        connector_config.base_url = config.base_url();
        let client = HttpClient::new(connector_config)?;

        info!(
            "Assets connector initialized for workspace {} (schema {})",
            config.workspace_id, config.schema_id
        );

        Ok(Self { config, client })
    }

    /// Returns the connector configuration.
    pub fn config(&self) -> &AssetsConfig {
        &self.config
    }

    /// Fetches a listing endpoint and requires the body to be a JSON array.
    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> ConnectorResult<Vec<T>> {
        let body: serde_json::Value = self.client.get_json(path).await?;
        if !body.is_array() {
            return Err(ConnectorError::InvalidResponse(format!(
                "Expected an array from {}, got {}",
                path,
                json_kind(&body)
            )));
        }
        serde_json::from_value(body).map_err(|e| ConnectorError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl crate::traits::Connector for JiraAssetsConnector {
    fn name(&self) -> &str {
        &self.config.connector.name
    }

    fn connector_type(&self) -> &str {
        "assets"
    }

    async fn health_check(&self) -> ConnectorResult<ConnectorHealth> {
        match self.client.get("/objectschema/list").await {
            Ok(_) => Ok(ConnectorHealth::Healthy),
            Err(ConnectorError::Remote { status: 401, .. }) => Ok(ConnectorHealth::Unhealthy(
                "Authentication failed".to_string(),
            )),
            Err(ConnectorError::Remote { status, .. }) => Ok(ConnectorHealth::Degraded(format!(
                "Unexpected status: {}",
                status
            ))),
            Err(e) => Ok(ConnectorHealth::Unhealthy(e.to_string())),
        }
    }

    async fn test_connection(&self) -> ConnectorResult<bool> {
        self.client.get("/objectschema/list").await?;
        Ok(true)
    }
}

#[async_trait]
impl AssetsConnector for JiraAssetsConnector {
    #[instrument(skip(self))]
    async fn list_object_types(&self, schema_id: &str) -> ConnectorResult<Vec<ObjectType>> {
        let object_types: Vec<ObjectType> = self
            .get_list(&format!("/objectschema/{}/objecttypes", schema_id))
            .await?;
        debug!("Found {} object types", object_types.len());
        Ok(object_types)
    }

    #[instrument(skip(self))]
    async fn list_attributes(
        &self,
        object_type_id: &str,
    ) -> ConnectorResult<Vec<AttributeDefinition>> {
        self.get_list(&format!("/objecttype/{}/attributes", object_type_id))
            .await
    }

    #[instrument(skip(self))]
    async fn create_object_type(&self, schema_id: &str, name: &str) -> ConnectorResult<String> {
        let request = CreateObjectTypeRequest {
            inherited: false,
            abstract_object_type: false,
            object_schema_id: schema_id,
            icon_id: &self.config.icon_id,
            name,
            description: format!("Auto-created object type: {}", name),
        };

        let created: CreatedResponse = self.client.post_json("/objecttype/create", &request).await?;
        info!("Created object type '{}' (id: {})", name, created.id);
        Ok(created.id)
    }

    #[instrument(skip(self))]
    async fn create_attribute(
        &self,
        object_type_id: &str,
        name: &str,
    ) -> ConnectorResult<String> {
        let request = serde_json::json!({
            "name": name,
            "type": DEFAULT_ATTRIBUTE_TYPE,
            "defaultTypeId": DEFAULT_ATTRIBUTE_DEFAULT_TYPE_ID,
        });

        let path = format!("/objecttypeattribute/{}/", object_type_id);
        let created: CreatedResponse = self.client.post_json(&path, &request).await?;
        info!("Created attribute '{}' (id: {})", name, created.id);
        Ok(created.id)
    }

    #[instrument(skip(self, attributes), fields(attribute_count = attributes.len()))]
    async fn create_asset(
        &self,
        object_type_id: &str,
        attributes: Vec<AttributePayload>,
    ) -> ConnectorResult<Asset> {
        let request = CreateAssetRequest {
            object_type_id,
            attributes,
        };
        let asset: Asset = self.client.post_json("/object/create", &request).await?;
        info!("Created asset {} (object type {})", asset.id, object_type_id);
        Ok(asset)
    }

    #[instrument(skip(self))]
    async fn delete_asset(&self, asset_id: &str) -> bool {
        match self.client.delete(&format!("/object/{}", asset_id)).await {
            Ok(_) => {
                info!("Deleted asset {}", asset_id);
                true
            }
            Err(e) => {
                warn!(error = %e, "Failed to delete asset {}", asset_id);
                false
            }
        }
    }

    #[instrument(skip(self))]
    async fn query_assets(&self, aql: &str, page: Page) -> ConnectorResult<Vec<Asset>> {
        let query = [
            ("startAt", page.start_at.to_string()),
            ("maxResults", page.max_results.to_string()),
            ("includeAttributes", "true".to_string()),
        ];
        let body = serde_json::json!({ "qlQuery": aql });

        let result: AqlResponse = self
            .client
            .post_json_with_query("/object/aql", &query, &body)
            .await?;
        debug!("AQL query returned {} assets", result.values.len());
        Ok(result.values)
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

// Assets API types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateObjectTypeRequest<'a> {
    inherited: bool,
    abstract_object_type: bool,
    object_schema_id: &'a str,
    icon_id: &'a str,
    name: &'a str,
    description: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateAssetRequest<'a> {
    object_type_id: &'a str,
    attributes: Vec<AttributePayload>,
}

#[derive(Debug, Deserialize)]
struct CreatedResponse {
    #[serde(deserialize_with = "crate::traits::string_or_number")]
    id: String,
}

#[derive(Debug, Deserialize)]
struct AqlResponse {
    #[serde(default)]
    values: Vec<Asset>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secure_string::SecureString;
    use crate::traits::{AuthConfig, Connector};
    use serde_json::json;
    use std::collections::HashMap;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_config(base_url: &str) -> AssetsConfig {
        AssetsConfig {
            connector: ConnectorConfig {
                name: "assets-test".to_string(),
                base_url: base_url.to_string(),
                auth: AuthConfig::Basic {
                    username: "ops@example.com".to_string(),
                    password: SecureString::from("api-token"),
                },
                timeout_secs: 5,
                verify_tls: true,
                headers: HashMap::new(),
            },
            workspace_id: "ws-1".to_string(),
            schema_id: "11".to_string(),
            icon_id: "13".to_string(),
            default_object_type: "Network Assets".to_string(),
            page_size: 5,
        }
    }

    async fn connector(server: &MockServer) -> JiraAssetsConnector {
        JiraAssetsConnector::new(create_test_config(&server.uri())).unwrap()
    }

    #[test]
    fn test_cloud_base_url_used_when_base_url_empty() {
        let config = create_test_config("");
        assert_eq!(
            config.base_url(),
            "https://api.atlassian.com/jsm/assets/workspace/ws-1/v1"
        );
    }

    #[test]
    fn test_new_requires_workspace_or_base_url() {
        let mut config = create_test_config("");
        config.workspace_id = String::new();
        assert!(matches!(
            JiraAssetsConnector::new(config),
            Err(ConnectorError::ConfigError(_))
        ));
    }

    #[test]
    fn test_config_defaults_from_yaml_shape() {
        let config: AssetsConfig = serde_json::from_value(json!({
            "name": "assets",
            "base_url": "",
            "auth": { "type": "basic", "username": "a@b.c", "password": "t" },
            "workspace_id": "ws"
        }))
        .unwrap();
        assert_eq!(config.schema_id, "11");
        assert_eq!(config.icon_id, "13");
        assert_eq!(config.default_object_type, "Network Assets");
        assert_eq!(config.page(), Page::default());
    }

    #[tokio::test]
    async fn test_list_object_types() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/objectschema/11/objecttypes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": "1", "name": "Network Assets", "position": 0 },
                { "id": 2, "name": "Servers" }
            ])))
            .mount(&server)
            .await;

        let types = connector(&server).await.list_object_types("11").await.unwrap();
        assert_eq!(types.len(), 2);
        assert_eq!(types[1].id, "2");
        assert_eq!(types[1].name, "Servers");
    }

    #[tokio::test]
    async fn test_list_attributes_rejects_non_array() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/objecttype/5/attributes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": "nope" })))
            .mount(&server)
            .await;

        let result = connector(&server).await.list_attributes("5").await;
        assert!(matches!(result, Err(ConnectorError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_create_object_type_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/objecttype/create"))
            .and(body_json(json!({
                "inherited": false,
                "abstractObjectType": false,
                "objectSchemaId": "11",
                "iconId": "13",
                "name": "Laptops",
                "description": "Auto-created object type: Laptops"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "42" })))
            .expect(1)
            .mount(&server)
            .await;

        let id = connector(&server)
            .await
            .create_object_type("11", "Laptops")
            .await
            .unwrap();
        assert_eq!(id, "42");
    }

    #[tokio::test]
    async fn test_create_attribute_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/objecttypeattribute/42/"))
            .and(body_json(json!({ "name": "Owner", "type": "0", "defaultTypeId": "0" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 900 })))
            .mount(&server)
            .await;

        let id = connector(&server)
            .await
            .create_attribute("42", "Owner")
            .await
            .unwrap();
        assert_eq!(id, "900");
    }

    #[tokio::test]
    async fn test_create_attribute_failure_surfaces_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/objecttypeattribute/42/"))
            .respond_with(ResponseTemplate::new(400).set_body_string("duplicate name"))
            .mount(&server)
            .await;

        let err = connector(&server)
            .await
            .create_attribute("42", "Owner")
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(400));
    }

    #[tokio::test]
    async fn test_create_asset() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/object/create"))
            .and(body_json(json!({
                "objectTypeId": "42",
                "attributes": [
                    { "objectTypeAttributeId": "900", "objectAttributeValues": [{ "value": "alice" }] }
                ]
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "1001",
                "objectKey": "LAP-1",
                "objectType": { "id": "42" },
                "attributes": []
            })))
            .mount(&server)
            .await;

        let asset = connector(&server)
            .await
            .create_asset("42", vec![AttributePayload::single("900", json!("alice"))])
            .await
            .unwrap();
        assert_eq!(asset.id, "1001");
        assert_eq!(asset.object_key.as_deref(), Some("LAP-1"));
    }

    #[tokio::test]
    async fn test_delete_asset_soft_failure() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/object/1"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/object/2"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let connector = connector(&server).await;
        assert!(connector.delete_asset("1").await);
        assert!(!connector.delete_asset("2").await);
    }

    #[tokio::test]
    async fn test_query_assets_sends_page_window() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/object/aql"))
            .and(query_param("startAt", "0"))
            .and(query_param("maxResults", "5"))
            .and(query_param("includeAttributes", "true"))
            .and(body_json(json!({ "qlQuery": "objectType = \"Network Assets\"" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "startAt": 0,
                "maxResults": 5,
                "values": [
                    { "id": "7", "objectType": { "id": "1" }, "attributes": [] }
                ]
            })))
            .mount(&server)
            .await;

        let assets = connector(&server)
            .await
            .query_assets("objectType = \"Network Assets\"", Page::default())
            .await
            .unwrap();
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].id, "7");
    }

    #[tokio::test]
    async fn test_health_check_reports_auth_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/objectschema/list"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let health = connector(&server).await.health_check().await.unwrap();
        assert!(matches!(health, ConnectorHealth::Unhealthy(_)));
    }
}
