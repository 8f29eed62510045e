//! Tolerant parsing of inbound upsert requests.
//!
//! Trigger bodies arrive either as JSON objects or as strings. Strings are
//! parsed strictly first; when that fails a legacy recovery extracts
//! `objectType` and a `key=value` attribute block from text such as
//! `{"objectType": Server, "attributes": {Name=web-1, Owner=ops}}`.
//!
//! [`parse_request`] never fails and may return a partial map.
//! [`AssetRequest::from_parsed`] turns that map into the canonical record.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

/// Errors produced while turning a trigger body into an [`AssetRequest`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RequestError {
    #[error("Request body is missing")]
    MissingBody,

    #[error("Request body is not valid JSON: {0}")]
    InvalidBody(String),

    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Field {field} must be {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },
}

fn object_type_regex() -> &'static Regex {
    static INSTANCE: OnceLock<Regex> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        Regex::new(r#""objectType":\s*([A-Za-z0-9_]+)"#).expect("valid objectType pattern")
    })
}

fn attributes_regex() -> &'static Regex {
    static INSTANCE: OnceLock<Regex> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        Regex::new(r#"attributes":\s*\{([^}]+)\}"#).expect("valid attributes pattern")
    })
}

/// Decodes the raw trigger body, which must be valid JSON.
pub fn decode_body(body: Option<&str>) -> Result<Value, RequestError> {
    let body = body.ok_or(RequestError::MissingBody)?;
    serde_json::from_str(body).map_err(|e| RequestError::InvalidBody(e.to_string()))
}

/// Normalizes a decoded trigger body into a JSON object.
///
/// Objects are returned as is. Strings are parsed as JSON and, when that
/// fails, recovered with [`parse_legacy`]. Anything else yields an empty map.
pub fn parse_request(raw: &Value) -> Map<String, Value> {
    match raw {
        Value::Object(map) => map.clone(),
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) => map,
            Ok(_) => Map::new(),
            Err(e) => {
                debug!(error = %e, "Could not parse as standard JSON, trying legacy parsing");
                parse_legacy(text)
            }
        },
        _ => Map::new(),
    }
}

/// Recovers `objectType` and `attributes` from a malformed JSON-like string.
///
/// Attribute pairs are separated by `,` and split on `=`; only the first two
/// segments are used. Pairs without `=` or with an empty key are dropped.
/// Recovered values are always strings.
pub fn parse_legacy(text: &str) -> Map<String, Value> {
    let mut parsed = Map::new();

    if let Some(captures) = object_type_regex().captures(text) {
        parsed.insert(
            "objectType".to_string(),
            Value::String(captures[1].to_string()),
        );
    }

    if let Some(captures) = attributes_regex().captures(text) {
        let mut attributes = Map::new();
        for pair in captures[1].split(',') {
            let mut parts = pair.trim().split('=').map(str::trim);
            let key = parts.next().unwrap_or_default();
            if let Some(value) = parts.next() {
                if !key.is_empty() {
                    attributes.insert(key.to_string(), Value::String(value.to_string()));
                }
            }
        }
        parsed.insert("attributes".to_string(), Value::Object(attributes));
    }

    parsed
}

/// Canonical upsert request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRequest {
    /// Name of the object type, matched case-insensitively.
    pub object_type: String,
    /// Attribute values keyed by attribute name, in request order.
    pub attributes: Map<String, Value>,
}

impl AssetRequest {
    /// Creates a request from an object type and attribute pairs.
    pub fn new<K, I>(object_type: impl Into<String>, attributes: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Self {
            object_type: object_type.into(),
            attributes: attributes
                .into_iter()
                .map(|(k, v)| (k.into(), v))
                .filter(|(_, v)| !v.is_null())
                .collect(),
        }
    }

    /// Builds the canonical request from a parsed map.
    ///
    /// Attributes holding `null` are dropped.
    pub fn from_parsed(mut parsed: Map<String, Value>) -> Result<Self, RequestError> {
        let object_type = match parsed.remove("objectType") {
            Some(Value::String(name)) => name,
            Some(_) => {
                return Err(RequestError::InvalidField {
                    field: "objectType",
                    expected: "a string",
                })
            }
            None => return Err(RequestError::MissingField("objectType")),
        };

        let attributes = match parsed.remove("attributes") {
            Some(Value::Object(map)) => map,
            Some(_) => {
                return Err(RequestError::InvalidField {
                    field: "attributes",
                    expected: "an object",
                })
            }
            None => return Err(RequestError::MissingField("attributes")),
        };

        Ok(Self::new(object_type, attributes))
    }

    /// Parses and canonicalizes a decoded trigger body.
    pub fn from_value(raw: &Value) -> Result<Self, RequestError> {
        Self::from_parsed(parse_request(raw))
    }

    /// Returns the request in its wire form.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert(
            "objectType".to_string(),
            Value::String(self.object_type.clone()),
        );
        map.insert(
            "attributes".to_string(),
            Value::Object(self.attributes.clone()),
        );
        map
    }

    /// Returns the id of the asset this request replaces (`attributes.id`).
    ///
    /// Empty strings and zero are treated as absent.
    pub fn supersede_id(&self) -> Option<String> {
        match self.attributes.get("id")? {
            Value::String(id) if !id.is_empty() => Some(id.clone()),
            Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
            _ => None,
        }
    }
}
