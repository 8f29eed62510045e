//! Health command - checks connectivity to the Assets API.

use al_connectors::{AssetsConnector, Connector, ConnectorHealth};
use serde::Serialize;
use std::sync::Arc;

/// Result of a connector health probe.
#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub connector: String,
    pub health: ConnectorHealth,
    pub reachable: bool,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.reachable && matches!(self.health, ConnectorHealth::Healthy)
    }
}

/// Probes the connector. Errors are folded into the report.
pub async fn run_health(connector: Arc<dyn AssetsConnector>) -> HealthReport {
    let health = connector
        .health_check()
        .await
        .unwrap_or_else(|e| ConnectorHealth::Unhealthy(e.to_string()));
    let reachable = connector.test_connection().await.unwrap_or(false);

    HealthReport {
        connector: connector.name().to_string(),
        health,
        reachable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use al_connectors::MockAssetsConnector;

    #[tokio::test]
    async fn test_run_health() {
        let mock = Arc::new(MockAssetsConnector::new("mock"));
        let report = run_health(mock.clone()).await;
        assert!(report.is_healthy());
        assert_eq!(report.connector, "mock");

        mock.fail_listing(true);
        let report = run_health(mock).await;
        assert!(!report.is_healthy());
        assert!(matches!(report.health, ConnectorHealth::Unhealthy(_)));
    }
}
