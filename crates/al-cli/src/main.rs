//! AssetLink CLI
//!
//! Command-line interface for the Jira Service Management Assets web triggers.

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

mod commands;
mod config;
mod validator;

use al_connectors::ConnectorHealth;
use commands::{
    build_connector, read_payload, run_health, run_list, run_server, run_upsert, ListTarget,
    ServeConfig,
};
use config::AppConfig;
use validator::ConfigValidator;

#[derive(Parser)]
#[command(name = "assetlink")]
#[command(author = "AssetLink Team")]
#[command(version)]
#[command(about = "Web triggers that keep Jira Assets in sync", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web-trigger server
    Serve {
        /// Port to listen on (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Validate configuration and exit without starting the server
        #[arg(long)]
        validate_only: bool,
    },

    /// Validate configuration
    Validate {
        /// Configuration file to validate
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show current configuration
    Config {
        /// Show secrets (redacted by default)
        #[arg(long)]
        show_secrets: bool,
    },

    /// Upsert one asset from a JSON payload
    Upsert {
        /// Request body, or @FILE to read it from a file
        #[arg(short, long)]
        payload: String,
    },

    /// List assets of the default object type
    List {
        /// List every object type in the schema instead
        #[arg(short, long)]
        all: bool,
    },

    /// Check connectivity to the Assets API
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let config = AppConfig::load(&config_path).unwrap_or_else(|_| {
        if cli.verbose {
            eprintln!("Using default configuration (no config file found)");
        }
        AppConfig::default()
    });

    let mut logging =
        al_observability::LoggingConfig::default().with_level_name(&config.logging.level);
    if cli.verbose {
        logging.level = tracing::Level::DEBUG;
    }
    logging.json_format = config.logging.json_format || cli.format == OutputFormat::Json;
    al_observability::init_logging_with_config(logging);

    match cli.command {
        Commands::Serve {
            port,
            host,
            validate_only,
        } => {
            let serve_config = ServeConfig {
                port: port.unwrap_or(config.server.port),
                host: host.unwrap_or_else(|| config.server.host.clone()),
                timeout_secs: config.server.request_timeout_secs,
            };
            cmd_serve(serve_config, config, validate_only).await
        }
        Commands::Validate { config: cfg_path } => {
            cmd_validate(cfg_path.unwrap_or(config_path)).await
        }
        Commands::Config { show_secrets } => cmd_config(config, show_secrets, cli.format).await,
        Commands::Upsert { payload } => cmd_upsert(config, &payload, cli.format).await,
        Commands::List { all } => cmd_list(config, all, cli.format).await,
        Commands::Health => cmd_health(config, cli.format).await,
    }
}

fn default_config_path() -> PathBuf {
    if let Some(dirs) = directories::ProjectDirs::from("com", "assetlink", "assetlink") {
        dirs.config_dir().join("config.yaml")
    } else {
        PathBuf::from("config/default.yaml")
    }
}

/// Aborts when the configuration cannot reach the Assets API.
fn require_valid(config: &AppConfig) {
    let validation_result = ConfigValidator::validate(config);
    if validation_result.has_errors() {
        validation_result.print();
        std::process::exit(1);
    }
}

async fn cmd_serve(
    serve_config: ServeConfig,
    app_config: AppConfig,
    validate_only: bool,
) -> Result<()> {
    println!("{}", "Validating configuration...".cyan());

    let validation_result = ConfigValidator::validate(&app_config);
    validation_result.print();

    if validate_only {
        println!();
        if validation_result.has_errors() {
            println!(
                "{}",
                "Configuration validation failed. Fix the errors above before starting the server."
                    .red()
                    .bold()
            );
            std::process::exit(1);
        }
        println!(
            "{}",
            "Configuration is valid. Server can be started."
                .green()
                .bold()
        );
        return Ok(());
    }

    if validation_result.has_errors() {
        println!();
        println!(
            "{}",
            "Server startup aborted due to configuration errors. Fix the errors above and try again."
                .red()
                .bold()
        );
        std::process::exit(1);
    }

    println!();
    run_server(serve_config, app_config).await
}

async fn cmd_validate(config_path: PathBuf) -> Result<()> {
    println!(
        "Validating configuration: {}",
        config_path.display().to_string().cyan()
    );

    let config = match AppConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            println!("{}: {:#}", "Configuration file error".red().bold(), e);
            std::process::exit(1);
        }
    };

    let validation_result = ConfigValidator::validate(&config);
    validation_result.print();

    let connector = config.assets.connector_config();
    println!();
    println!("{}", "Configuration Summary".bold());
    println!("─────────────────────");
    println!("  Endpoint: {}", connector.base_url());
    println!("  Schema: {}", config.assets.schema_id);
    println!("  Listing type: {}", config.assets.default_object_type);
    println!("  Page size: {}", config.assets.page_size);

    println!();
    if validation_result.has_errors() {
        println!(
            "{}",
            "Configuration validation failed. Fix the errors above."
                .red()
                .bold()
        );
        std::process::exit(1);
    } else if validation_result.has_warnings() {
        println!(
            "{}",
            "Configuration is valid with warnings. Review the warnings above."
                .yellow()
                .bold()
        );
    } else {
        println!("{}", "Configuration is valid.".green().bold());
    }

    Ok(())
}

async fn cmd_config(config: AppConfig, show_secrets: bool, format: OutputFormat) -> Result<()> {
    let display_config = if show_secrets {
        config
    } else {
        config.redact_secrets()
    };

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&display_config)?);
    } else {
        println!("{}", "Current Configuration".bold());
        println!("─────────────────────────");
        println!(
            "Server: {}:{}",
            display_config.server.host, display_config.server.port
        );
        println!("\nAssets:");
        let assets = &display_config.assets;
        println!("  Workspace: {}", assets.workspace_id);
        println!("  Email: {}", assets.email);
        println!("  API token: {}", assets.api_token);
        println!("  Schema: {} (icon {})", assets.schema_id, assets.icon_id);
        println!("  Listing type: {}", assets.default_object_type);
        println!("\nLogging: {}", display_config.logging.level);
    }

    Ok(())
}

async fn cmd_upsert(config: AppConfig, payload: &str, format: OutputFormat) -> Result<()> {
    require_valid(&config);

    let body = read_payload(payload)?;
    let connector = build_connector(&config)?;
    let envelope = run_upsert(connector, &config.assets.sync_settings(), body).await?;

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&envelope)?);
        return Ok(());
    }

    let failed = envelope["body"].as_str() == Some("{\"body\":null}");
    if failed {
        println!("{}", "Upsert failed (see logs for details)".red());
    } else {
        println!("{}", "Asset upserted".green());
        println!("{}", envelope["body"].as_str().unwrap_or_default());
    }

    Ok(())
}

async fn cmd_list(config: AppConfig, all: bool, format: OutputFormat) -> Result<()> {
    require_valid(&config);

    let connector = build_connector(&config)?;
    let target = if all {
        ListTarget::KnowledgeBase
    } else {
        ListTarget::DefaultType
    };
    let response = run_list(connector, config.assets.sync_settings(), target).await;

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    match response.payload() {
        Some(payload) => {
            let records = payload
                .get(al_core::NETWORK_ASSETS_KEY)
                .cloned()
                .unwrap_or(payload);
            let records = records.as_array().cloned().unwrap_or_default();

            println!("{}", "Assets".bold());
            println!("──────");
            if records.is_empty() {
                println!("No assets found");
            }
            for record in records {
                println!("  {}", record);
            }
        }
        None => println!("{}", "Listing failed (see logs for details)".red()),
    }

    Ok(())
}

async fn cmd_health(config: AppConfig, format: OutputFormat) -> Result<()> {
    require_valid(&config);

    let connector = build_connector(&config)?;
    let report = run_health(connector).await;

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", "Connector Health".bold());
        println!("────────────────");
        let status = match &report.health {
            ConnectorHealth::Healthy => "Healthy".green(),
            ConnectorHealth::Degraded(msg) => format!("Degraded: {}", msg).yellow(),
            ConnectorHealth::Unhealthy(msg) => format!("Unhealthy: {}", msg).red(),
            ConnectorHealth::Unknown => "Unknown".yellow(),
        };
        println!("  {}: {}", report.connector.cyan(), status);
        println!(
            "  Reachable: {}",
            if report.reachable {
                "yes".green()
            } else {
                "no".red()
            }
        );
    }

    if !report.is_healthy() {
        std::process::exit(1);
    }
    Ok(())
}
