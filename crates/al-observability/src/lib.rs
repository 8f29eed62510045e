//! # al-observability
//!
//! Structured logging for AssetLink, built on `tracing`.

pub mod logging;

pub use logging::{default_filter, init_logging, init_logging_with_config, LoggingConfig};
