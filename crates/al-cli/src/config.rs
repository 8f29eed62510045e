//! Configuration loading for the AssetLink CLI.
//!
//! `${VAR}` references in the YAML file are replaced with environment
//! variables before parsing. Unset variables are left as written so the
//! validator can report them.

use al_connectors::{AssetsConfig, AuthConfig, ConnectorConfig, SecureString};
use al_core::SyncSettings;
use anyhow::{Context, Result};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

const REDACTED: &str = "***REDACTED***";

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Assets API settings.
    #[serde(default)]
    pub assets: AssetsSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Loads configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_yaml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Parses configuration from YAML text, expanding `${VAR}` references.
    pub fn from_yaml(contents: &str) -> Result<Self> {
        let expanded = expand_env_vars(contents);
        let config: Self = serde_yaml::from_str(&expanded)?;
        Ok(config)
    }

    /// Creates a copy with secrets redacted.
    pub fn redact_secrets(&self) -> Self {
        let mut config = self.clone();
        if !config.assets.api_token.is_empty() {
            config.assets.api_token = REDACTED.to_string();
        }
        config
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_timeout() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_timeout(),
        }
    }
}

/// Assets API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetsSettings {
    /// Assets workspace id.
    #[serde(default)]
    pub workspace_id: String,

    /// Overrides the cloud gateway URL when set.
    #[serde(default)]
    pub base_url: String,

    /// Account email used for Basic authentication.
    #[serde(default)]
    pub email: String,

    /// API token used for Basic authentication.
    #[serde(default)]
    pub api_token: String,

    #[serde(default = "default_schema_id")]
    pub schema_id: String,

    /// Icon of auto-created object types.
    #[serde(default = "default_icon_id")]
    pub icon_id: String,

    /// Object type listed by the asset listing trigger.
    #[serde(default = "default_object_type")]
    pub default_object_type: String,

    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_true")]
    pub verify_tls: bool,
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

fn default_true() -> bool {
    true
}

impl Default for AssetsSettings {
    fn default() -> Self {
        Self {
            workspace_id: String::new(),
            base_url: String::new(),
            email: String::new(),
            api_token: String::new(),
            schema_id: default_schema_id(),
            icon_id: default_icon_id(),
            default_object_type: default_object_type(),
            page_size: default_page_size(),
            timeout_secs: default_timeout(),
            verify_tls: true,
        }
    }
}

impl AssetsSettings {
    /// Builds the connector configuration.
    pub fn connector_config(&self) -> AssetsConfig {
        AssetsConfig {
            connector: ConnectorConfig {
                name: "jira-assets".to_string(),
                base_url: self.base_url.clone(),
                auth: AuthConfig::Basic {
                    username: self.email.clone(),
                    password: SecureString::new(self.api_token.clone()),
                },
                timeout_secs: self.timeout_secs,
                verify_tls: self.verify_tls,
                headers: HashMap::new(),
            },
            workspace_id: self.workspace_id.clone(),
            schema_id: self.schema_id.clone(),
            icon_id: self.icon_id.clone(),
            default_object_type: self.default_object_type.clone(),
            page_size: self.page_size,
        }
    }

    /// Builds the settings used by the upsert and listing flows.
    pub fn sync_settings(&self) -> SyncSettings {
        SyncSettings::from(&self.connector_config())
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to use JSON format.
    #[serde(default)]
    pub json_format: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
        }
    }
}

fn env_var_regex() -> &'static Regex {
    static INSTANCE: OnceLock<Regex> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid env var pattern")
    })
}

/// Replaces `${VAR}` with the value of `VAR`; unset variables stay as is.
pub fn expand_env_vars(input: &str) -> String {
    env_var_regex()
        .replace_all(input, |caps: &Captures| {
            std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
}

/// Returns whether `value` still holds an unexpanded `${VAR}` reference.
pub fn has_unresolved_reference(value: &str) -> bool {
    env_var_regex().is_match(value)
}
