//! Testing helpers for code built on top of the connectors.

use crate::assets::{AssetsConfig, MockAssetsConnector};
use crate::traits::{
    Asset, AssetAttribute, AssetObjectType, AuthConfig, AttributeValue, ConnectorConfig,
};
use std::collections::HashMap;

/// Creates a test connector config without authentication.
pub fn test_connector_config(name: &str, base_url: &str) -> ConnectorConfig {
    ConnectorConfig {
        name: name.to_string(),
        base_url: base_url.to_string(),
        auth: AuthConfig::None,
        timeout_secs: 30,
        verify_tls: true,
        headers: HashMap::new(),
    }
}

/// Creates an Assets config pointing at `base_url` with default schema settings.
pub fn test_assets_config(base_url: &str) -> AssetsConfig {
    AssetsConfig {
        connector: test_connector_config("assets", base_url),
        workspace_id: "test-workspace".to_string(),
        schema_id: "11".to_string(),
        icon_id: "13".to_string(),
        default_object_type: "Network Assets".to_string(),
        page_size: 5,
    }
}

/// Builds an asset whose attributes each hold a single value.
pub fn sample_asset(
    id: &str,
    object_type_id: &str,
    attributes: &[(&str, serde_json::Value)],
) -> Asset {
    Asset {
        id: id.to_string(),
        object_key: Some(format!("NA-{}", id)),
        label: None,
        object_type: AssetObjectType {
            id: object_type_id.to_string(),
            name: None,
        },
        attributes: attributes
            .iter()
            .map(|(attribute_id, value)| AssetAttribute {
                object_type_attribute_id: attribute_id.to_string(),
                object_attribute_values: vec![AttributeValue {
                    value: value.clone(),
                    display_value: None,
                }],
            })
            .collect(),
    }
}

/// Creates a mock connector holding one object type with the given attributes.
///
/// Returns the connector, the object type id and the attribute ids in order.
pub async fn seeded_mock(
    schema_id: &str,
    object_type: &str,
    attributes: &[&str],
) -> (MockAssetsConnector, String, Vec<String>) {
    let connector = MockAssetsConnector::new("mock");
    let type_id = connector.seed_object_type(schema_id, object_type).await;
    let mut ids = Vec::with_capacity(attributes.len());
    for name in attributes {
        ids.push(connector.seed_attribute(&type_id, name).await);
    }
    (connector, type_id, ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::AssetsConnector;
    use serde_json::json;

    #[test]
    fn test_sample_asset() {
        let asset = sample_asset("4", "12", &[("100", json!("edge-router"))]);
        assert_eq!(asset.object_key.as_deref(), Some("NA-4"));
        assert_eq!(asset.attributes[0].first_value(), Some(&json!("edge-router")));
    }

    #[tokio::test]
    async fn test_seeded_mock() {
        let (connector, type_id, ids) = seeded_mock("11", "Servers", &["Name", "Owner"]).await;
        let attrs = connector.list_attributes(&type_id).await.unwrap();
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[1].id, ids[1]);
    }
}
