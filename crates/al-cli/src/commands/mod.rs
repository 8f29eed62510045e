//! CLI command implementations.

mod health;
mod list;
mod serve;
mod upsert;

pub use health::run_health;
pub use list::{run_list, ListTarget};
pub use serve::{run_server, ServeConfig};
pub use upsert::{read_payload, run_upsert};

use al_connectors::JiraAssetsConnector;
use anyhow::{Context, Result};
use std::sync::Arc;

use crate::config::AppConfig;

/// Builds the Assets connector from the loaded configuration.
pub fn build_connector(config: &AppConfig) -> Result<Arc<JiraAssetsConnector>> {
    let connector = JiraAssetsConnector::new(config.assets.connector_config())
        .context("Failed to create Assets connector")?;
    Ok(Arc::new(connector))
}
