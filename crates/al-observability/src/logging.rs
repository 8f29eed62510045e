//! Logging setup.
//!
//! `RUST_LOG` takes precedence; otherwise every AssetLink crate logs at the
//! configured level.

use std::str::FromStr;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Crates whose events pass the default filter.
const CRATES: &[&str] = &["al_core", "al_connectors", "al_api", "al_cli"];

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level.
    pub level: Level,
    /// Whether to use JSON format.
    pub json_format: bool,
    /// Whether to log span open/close events.
    pub include_spans: bool,
    /// Whether to include file/line info.
    pub include_location: bool,
    /// Whether to include target (module path).
    pub include_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            json_format: false,
            include_spans: false,
            include_location: false,
            include_target: true,
        }
    }
}

impl LoggingConfig {
    /// Verbose text output with span events and source locations.
    pub fn development() -> Self {
        Self {
            level: Level::DEBUG,
            json_format: false,
            include_spans: true,
            include_location: true,
            include_target: true,
        }
    }

    /// JSON output for log aggregation.
    pub fn production() -> Self {
        Self {
            level: Level::INFO,
            json_format: true,
            include_spans: false,
            include_location: false,
            include_target: true,
        }
    }

    /// Builds a config from a level name such as `"warn"`, falling back to
    /// `info` for unknown names.
    pub fn with_level_name(mut self, level: &str) -> Self {
        self.level = Level::from_str(level).unwrap_or(Level::INFO);
        self
    }
}

/// Returns the filter directive used when `RUST_LOG` is not set.
pub fn default_filter(level: Level) -> String {
    CRATES
        .iter()
        .map(|krate| format!("{}={}", krate, level))
        .chain(std::iter::once(format!("tower_http={}", level)))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initializes logging with the default configuration.
pub fn init_logging() {
    init_logging_with_config(LoggingConfig::default());
}

/// Initializes logging with the given configuration.
///
/// Does nothing if a global subscriber is already installed.
pub fn init_logging_with_config(config: LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(config.level)));

    let span_events = if config.include_spans {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let result = if config.json_format {
        let fmt_layer = fmt::layer()
            .json()
            .with_span_events(span_events)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_target(config.include_target);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
    } else {
        let fmt_layer = fmt::layer()
            .with_span_events(span_events)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_target(config.include_target);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
    };

    if let Err(e) = result {
        tracing::debug!(error = %e, "Logging already initialized");
    }
}

/// Creates a span for one web-trigger invocation.
#[macro_export]
macro_rules! trigger_span {
    ($trigger:expr, $request_id:expr) => {
        tracing::info_span!("trigger", trigger = %$trigger, request_id = %$request_id)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, Level::INFO);
        assert!(!config.json_format);
    }

    #[test]
    fn test_production_config() {
        let config = LoggingConfig::production();
        assert!(config.json_format);
        assert!(!config.include_location);
    }

    #[test]
    fn test_level_name() {
        assert_eq!(
            LoggingConfig::default().with_level_name("warn").level,
            Level::WARN
        );
        assert_eq!(
            LoggingConfig::default().with_level_name("chatty").level,
            Level::INFO
        );
    }

    #[test]
    fn test_default_filter_covers_crates() {
        let filter = default_filter(Level::DEBUG);
        assert!(filter.contains("al_core=DEBUG"));
        assert!(filter.contains("al_api=DEBUG"));
        assert!(EnvFilter::try_new(&filter).is_ok());
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_logging();
        init_logging_with_config(LoggingConfig::production());
    }
}
