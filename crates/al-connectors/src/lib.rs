//! # al-connectors
//!
//! Connectors for the remote asset-management API used by AssetLink.
//!
//! This crate provides the connector traits, the Jira Service Management
//! Assets implementation and an in-memory mock for tests.

pub mod assets;
pub mod http;
pub mod secure_string;
pub mod testing;
pub mod traits;

pub use secure_string::SecureString;

pub use traits::{
    Asset, AssetAttribute, AssetObjectType, AssetsConnector, AttributeDefinition,
    AttributePayload, AttributeValue, AttributeValuePayload, AuthConfig, Connector,
    ConnectorConfig, ConnectorError, ConnectorHealth, ConnectorResult, ObjectType, Page,
};

pub use assets::{
    object_type_aql, quote_aql, AssetsConfig, AssetsConnectorExt, JiraAssetsConnector,
    MockAssetsConnector,
};
