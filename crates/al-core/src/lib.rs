//! # al-core
//!
//! Core logic for AssetLink.
//!
//! This crate turns inbound trigger payloads into asset records: it parses
//! (possibly malformed) requests, reconciles object types and attributes with
//! the remote schema, creates the asset and flattens stored assets back into
//! plain key/value records.

pub mod catalog;
pub mod flatten;
pub mod reconcile;
pub mod request;
pub mod settings;
pub mod upsert;

pub use catalog::{AssetCatalog, NETWORK_ASSETS_KEY};
pub use flatten::{attribute_names, flatten_asset, is_truthy, FlattenOptions};
pub use reconcile::{ReconcileError, ReconciledAsset, SchemaReconciler};
pub use request::{decode_body, parse_request, AssetRequest, RequestError};
pub use settings::SyncSettings;
pub use upsert::{AssetUpserter, Supersede, UpsertError, UpsertOutcome};
