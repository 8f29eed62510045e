//! Connector trait definitions for AssetLink.
//!
//! This module defines the interface the asset-management backend must
//! implement, together with the wire types exchanged with it.

use crate::secure_string::SecureString;
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur in connectors.
#[derive(Error, Debug, Clone)]
pub enum ConnectorError {
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Authorization denied: {0}")]
    AuthorizationDenied(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The remote API answered with a non-success status.
    #[error("Remote API error (status {status}): {message}")]
    Remote { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ConnectorError {
    /// Returns the HTTP status reported by the remote API, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ConnectorError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for connector operations.
pub type ConnectorResult<T> = Result<T, ConnectorError>;

/// Health status of a connector.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConnectorHealth {
    /// Connector is healthy and operational.
    Healthy,
    /// Connector is degraded but still functional.
    Degraded(String),
    /// Connector is unhealthy and not operational.
    Unhealthy(String),
    /// Health status is unknown.
    Unknown,
}

/// Configuration for a connector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorConfig {
    /// Connector name/identifier.
    pub name: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Authentication configuration.
    pub auth: AuthConfig,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Whether to verify TLS certificates.
    #[serde(default = "default_verify_tls")]
    pub verify_tls: bool,
    /// Additional headers to include.
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_verify_tls() -> bool {
    true
}

/// Authentication configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthConfig {
    /// No authentication.
    None,
    /// Basic authentication (`email:api_token` for Atlassian Cloud).
    Basic {
        /// The username (account email).
        username: String,
        /// The password or API token (zeroized on drop).
        password: SecureString,
    },
}

/// Base trait for all connectors.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Returns the connector name.
    fn name(&self) -> &str;

    /// Returns the connector type (e.g., "assets").
    fn connector_type(&self) -> &str;

    /// Checks the health of the connector.
    async fn health_check(&self) -> ConnectorResult<ConnectorHealth>;

    /// Tests the connection to the external system.
    async fn test_connection(&self) -> ConnectorResult<bool>;
}

/// Asset-management connector (object types, attributes and objects).
///
/// Every operation issues exactly one remote call and is never retried.
#[async_trait]
pub trait AssetsConnector: Connector {
    /// Lists the object types of a schema.
    async fn list_object_types(&self, schema_id: &str) -> ConnectorResult<Vec<ObjectType>>;

    /// Lists the attribute definitions of an object type.
    async fn list_attributes(
        &self,
        object_type_id: &str,
    ) -> ConnectorResult<Vec<AttributeDefinition>>;

    /// Creates an object type and returns its id.
    async fn create_object_type(&self, schema_id: &str, name: &str) -> ConnectorResult<String>;

    /// Creates an attribute of the default type and returns its id.
    async fn create_attribute(&self, object_type_id: &str, name: &str)
        -> ConnectorResult<String>;

    /// Creates an asset.
    async fn create_asset(
        &self,
        object_type_id: &str,
        attributes: Vec<AttributePayload>,
    ) -> ConnectorResult<Asset>;

    /// Deletes an asset. Returns `false` on any failure; never errors.
    async fn delete_asset(&self, asset_id: &str) -> bool;

    /// Runs an AQL query and returns one page of assets with attributes.
    async fn query_assets(&self, aql: &str, page: Page) -> ConnectorResult<Vec<Asset>>;
}

/// A schema-level category of assets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectType {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
}

/// An attribute defined on an object type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDefinition {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
}

/// Reference to the object type an asset belongs to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetObjectType {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A single value held by an asset attribute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeValue {
    #[serde(default)]
    pub value: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_value: Option<String>,
}

/// An attribute as stored on an asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetAttribute {
    #[serde(deserialize_with = "string_or_number")]
    pub object_type_attribute_id: String,
    #[serde(default)]
    pub object_attribute_values: Vec<AttributeValue>,
}

impl AssetAttribute {
    /// Returns the first value of the attribute, if any.
    pub fn first_value(&self) -> Option<&serde_json::Value> {
        self.object_attribute_values.first().map(|v| &v.value)
    }
}

/// An asset (object) in the remote store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub object_type: AssetObjectType,
    #[serde(default)]
    pub attributes: Vec<AssetAttribute>,
}

/// Value entry of an attribute payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeValuePayload {
    pub value: serde_json::Value,
}

/// Attribute entry sent when creating an asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributePayload {
    pub object_type_attribute_id: String,
    pub object_attribute_values: Vec<AttributeValuePayload>,
}

impl AttributePayload {
    /// Builds a single-valued attribute payload.
    pub fn single(attribute_id: impl Into<String>, value: serde_json::Value) -> Self {
        Self {
            object_type_attribute_id: attribute_id.into(),
            object_attribute_values: vec![AttributeValuePayload { value }],
        }
    }
}

/// Page window for AQL queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub start_at: u32,
    pub max_results: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            start_at: 0,
            max_results: 5,
        }
    }
}

/// Accepts ids encoded either as JSON strings or numbers.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}
