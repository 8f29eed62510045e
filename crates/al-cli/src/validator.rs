//! Configuration validation for AssetLink.
//!
//! Checks the configuration before the server starts or a one-shot command
//! talks to the Assets API.

use crate::config::{has_unresolved_reference, AppConfig};
use colored::Colorize;
use std::net::SocketAddr;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Critical errors that prevent startup.
    pub errors: Vec<String>,
    /// Warnings that should be addressed but don't prevent startup.
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Creates a new empty validation result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an error to the result.
    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Adds a warning to the result.
    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Returns true if there are any errors.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns true if there are any warnings.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Prints the validation result to the console.
    pub fn print(&self) {
        if !self.warnings.is_empty() {
            println!();
            println!("{}", "Configuration Warnings:".yellow().bold());
            for warning in &self.warnings {
                println!("  {} {}", "⚠".yellow(), warning);
            }
        }

        if !self.errors.is_empty() {
            println!();
            println!("{}", "Configuration Errors:".red().bold());
            for error in &self.errors {
                println!("  {} {}", "✗".red(), error);
            }
        }

        if self.errors.is_empty() && self.warnings.is_empty() {
            println!("  {} Configuration OK", "✓".green());
        }
    }
}

/// Validates application configuration.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates the application configuration.
    pub fn validate(config: &AppConfig) -> ValidationResult {
        let mut result = ValidationResult::new();

        Self::validate_credentials(config, &mut result);
        Self::validate_schema(config, &mut result);
        Self::validate_server(config, &mut result);
        Self::validate_logging(config, &mut result);

        result
    }

    fn validate_credentials(config: &AppConfig, result: &mut ValidationResult) {
        let assets = &config.assets;

        if assets.workspace_id.trim().is_empty() && assets.base_url.trim().is_empty() {
            result.add_error("assets.workspace_id is required (or set assets.base_url)");
        }

        if !assets.base_url.is_empty()
            && !assets.base_url.starts_with("https://")
            && !assets.base_url.starts_with("http://")
        {
            result.add_error(format!(
                "assets.base_url must be an http(s) URL, got '{}'",
                assets.base_url
            ));
        } else if assets.base_url.starts_with("http://") {
            result.add_warning(
                "assets.base_url uses plain HTTP; credentials are sent unencrypted",
            );
        }

        let credentials = [
            ("assets.email", &assets.email),
            ("assets.api_token", &assets.api_token),
        ];
        for (field, value) in credentials {
            if value.trim().is_empty() {
                result.add_error(format!("{} is required", field));
            } else if has_unresolved_reference(value) {
                result.add_error(format!(
                    "{} references an environment variable that is not set",
                    field
                ));
            }
        }

        if !assets.verify_tls {
            result.add_warning("assets.verify_tls is disabled; ignored in release builds");
        }
    }

    fn validate_schema(config: &AppConfig, result: &mut ValidationResult) {
        let assets = &config.assets;

        if assets.schema_id.parse::<u64>().is_err() {
            result.add_error(format!(
                "assets.schema_id must be numeric, got '{}'",
                assets.schema_id
            ));
        }

        if assets.page_size == 0 {
            result.add_error("assets.page_size must be greater than 0");
        }

        if assets.default_object_type.trim().is_empty() {
            result.add_error("assets.default_object_type must not be empty");
        }
    }

    fn validate_server(config: &AppConfig, result: &mut ValidationResult) {
        let address = format!("{}:{}", config.server.host, config.server.port);
        if address.parse::<SocketAddr>().is_err() {
            result.add_error(format!("Invalid server bind address: {}", address));
        }

        if config.server.request_timeout_secs == 0 {
            result.add_error("server.request_timeout_secs must be greater than 0");
        }
    }

    fn validate_logging(config: &AppConfig, result: &mut ValidationResult) {
        let level = config.logging.level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            result.add_warning(format!(
                "Unknown log level '{}', falling back to info",
                config.logging.level
            ));
        }
    }
}
