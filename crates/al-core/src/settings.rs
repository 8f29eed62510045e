//! Settings shared by the upsert and listing flows.

use al_connectors::{AssetsConfig, Page};
use serde::{Deserialize, Serialize};

/// Schema-level settings for one Assets workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Object schema that holds every object type we read or create.
    pub schema_id: String,
    /// Object type listed by the asset listing trigger.
    pub default_object_type: String,
    /// Page window for AQL queries.
    pub page: Page,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            schema_id: "11".to_string(),
            default_object_type: "Network Assets".to_string(),
            page: Page::default(),
        }
    }
}

impl From<&AssetsConfig> for SyncSettings {
    fn from(config: &AssetsConfig) -> Self {
        Self {
            schema_id: config.schema_id.clone(),
            default_object_type: config.default_object_type.clone(),
            page: config.page(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use al_connectors::testing::test_assets_config;

    #[test]
    fn test_from_assets_config() {
        let mut config = test_assets_config("http://localhost");
        config.schema_id = "42".to_string();
        config.page_size = 20;

        let settings = SyncSettings::from(&config);
        assert_eq!(settings.schema_id, "42");
        assert_eq!(settings.page.max_results, 20);
        assert_eq!(settings.page.start_at, 0);
    }
}
