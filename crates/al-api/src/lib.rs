//! # al-api
//!
//! HTTP server for AssetLink.
//!
//! Exposes the web triggers (asset upsert, listings, ping) and health probes.
//! Trigger responses always use the web-trigger envelope with status 200.

pub mod dto;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;
pub mod triggers;

pub use dto::{WebTriggerRequest, WebTriggerResponse};
pub use error::ApiError;
pub use server::{ApiServer, ApiServerConfig};
pub use state::AppState;
