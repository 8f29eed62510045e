//! Asset-management connectors.

pub mod jira_assets;
pub mod mock;

pub use jira_assets::{AssetsConfig, JiraAssetsConnector};
pub use mock::MockAssetsConnector;

use crate::traits::{Asset, AssetsConnector, AttributeDefinition, ObjectType, Page};
use async_trait::async_trait;
use tracing::warn;

/// Listing operations that degrade to an empty result instead of failing.
///
/// A failed schema introspection makes every attribute look missing, so the
/// caller ends up creating it again. Callers that cannot tolerate that should
/// use the fallible [`AssetsConnector`] methods directly.
#[async_trait]
pub trait AssetsConnectorExt: AssetsConnector {
    async fn list_object_types_or_empty(&self, schema_id: &str) -> Vec<ObjectType> {
        self.list_object_types(schema_id).await.unwrap_or_else(|e| {
            warn!(error = %e, schema_id, "Error fetching object types");
            Vec::new()
        })
    }

    async fn list_attributes_or_empty(&self, object_type_id: &str) -> Vec<AttributeDefinition> {
        self.list_attributes(object_type_id)
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, object_type_id, "Error fetching attributes");
                Vec::new()
            })
    }

    async fn query_assets_or_empty(&self, aql: &str, page: Page) -> Vec<Asset> {
        self.query_assets(aql, page).await.unwrap_or_else(|e| {
            warn!(error = %e, aql, "Error querying assets");
            Vec::new()
        })
    }
}

impl<T: AssetsConnector + ?Sized> AssetsConnectorExt for T {}

/// Builds the AQL clause selecting every asset of an object type.
pub fn object_type_aql(object_type_name: &str) -> String {
    format!("objectType = {}", quote_aql(object_type_name))
}

/// Quotes an AQL string literal, escaping backslashes and double quotes.
pub fn quote_aql(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}
