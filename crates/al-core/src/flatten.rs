//! Flattening of stored assets into plain key/value records.

use al_connectors::{Asset, AttributeDefinition};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

/// Controls which keys end up in a flattened record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattenOptions {
    /// Attribute names never copied into the record.
    pub excluded_keys: Vec<String>,
    /// Add the asset's own id under `id` when no attribute provided one.
    pub include_asset_id: bool,
}

impl FlattenOptions {
    /// Options for the asset listing: drops object keys, keeps `id`.
    pub fn listing() -> Self {
        Self {
            excluded_keys: vec!["objectKey".to_string(), "Key".to_string()],
            include_asset_id: true,
        }
    }

    /// Options for the knowledge base: drops object keys and ids.
    pub fn knowledge_base() -> Self {
        Self {
            excluded_keys: vec!["objectKey".to_string(), "Key".to_string(), "id".to_string()],
            include_asset_id: false,
        }
    }

    fn is_excluded(&self, key: &str) -> bool {
        self.excluded_keys.iter().any(|k| k == key)
    }
}

/// Maps attribute ids to attribute names.
pub fn attribute_names(definitions: &[AttributeDefinition]) -> HashMap<String, String> {
    definitions
        .iter()
        .map(|d| (d.id.clone(), d.name.clone()))
        .collect()
}

/// Returns whether a value counts as present: non-empty strings, non-zero
/// numbers, `true`, arrays and objects.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Flattens an asset into `{attribute name: first value}`.
///
/// Attributes with an unknown id or a falsy first value are skipped. Keys are
/// sorted; the asset id, when requested, is appended last.
pub fn flatten_asset(
    asset: &Asset,
    names: &HashMap<String, String>,
    options: &FlattenOptions,
) -> Map<String, Value> {
    let mut values = BTreeMap::new();
    for attribute in &asset.attributes {
        let Some(name) = names.get(&attribute.object_type_attribute_id) else {
            continue;
        };
        if let Some(value) = attribute.first_value().filter(|v| is_truthy(v)) {
            values.insert(name.as_str(), value.clone());
        }
    }

    let mut record: Map<String, Value> = values
        .into_iter()
        .filter(|(name, _)| !options.is_excluded(name))
        .map(|(name, value)| (name.to_string(), value))
        .collect();

    let has_id = record.get("id").map(is_truthy).unwrap_or(false);
    if options.include_asset_id && !has_id && !asset.id.is_empty() {
        record.insert("id".to_string(), Value::String(asset.id.clone()));
    }

    record
}
