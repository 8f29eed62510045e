//! Serve command - starts the web-trigger server.

use anyhow::{Context, Result};
use colored::Colorize;
use std::net::SocketAddr;
use std::time::Duration;

use al_api::{ApiServer, ApiServerConfig, AppState};

use super::build_connector;
use crate::config::AppConfig;

/// Server configuration from CLI arguments.
#[derive(Debug, Clone)]
pub struct ServeConfig {
    /// Port to listen on.
    pub port: u16,
    /// Hostname to bind to.
    pub host: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "0.0.0.0".to_string(),
            timeout_secs: 30,
        }
    }
}

impl ServeConfig {
    /// Parses the bind address.
    pub fn bind_address(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .context("Invalid bind address")
    }
}

/// Runs the web-trigger server.
pub async fn run_server(config: ServeConfig, app_config: AppConfig) -> Result<()> {
    println!("{} Starting AssetLink server...", "[server]".cyan());

    let connector = build_connector(&app_config)?;
    let settings = app_config.assets.sync_settings();
    println!(
        "  {} Schema {} (listing '{}')",
        "→".green(),
        settings.schema_id,
        settings.default_object_type
    );

    let state = AppState::new(connector, settings);

    let bind_address = config.bind_address()?;
    let server_config = ApiServerConfig {
        bind_address,
        request_timeout: Duration::from_secs(config.timeout_secs),
    };

    println!();
    println!("{}", "AssetLink Server".bold());
    println!("{}", "═".repeat(40));
    println!("  {} http://{}", "Address:".cyan(), bind_address);
    println!();
    println!("{}", "Endpoints:".bold());
    println!("  GET  /health                   - Health check");
    println!("  GET  /ready                    - Readiness probe");
    println!("  GET  /live                     - Liveness probe");
    println!("  POST /webtrigger/create-assets - Upsert an asset");
    println!("  POST /webtrigger/list-assets   - List default object type");
    println!("  POST /webtrigger/knowledge-base - List every object type");
    println!("  POST /webtrigger/ping          - Random number");
    println!();
    println!("Press {} to stop", "Ctrl+C".yellow());
    println!();

    ApiServer::new(state, server_config)
        .run()
        .await
        .context("Server error")?;

    println!();
    println!("{} Server stopped", "[server]".cyan());

    Ok(())
}
