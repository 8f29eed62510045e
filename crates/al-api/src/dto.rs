//! Web-trigger request and response envelopes.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

/// Envelope header carrying the random request marker.
pub const ENVELOPE_REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Inbound web-trigger request.
///
/// Only `body` is parsed; `method` and header names are logged by the
/// upsert trigger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebTriggerRequest {
    /// Raw request body, normally a JSON-encoded string.
    #[serde(default)]
    pub body: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, Vec<String>>,
}

impl WebTriggerRequest {
    /// Creates a request carrying `body` as its raw text.
    pub fn with_body(body: impl Into<String>) -> Self {
        Self {
            body: Some(Value::String(body.into())),
            ..Default::default()
        }
    }

    /// Parses an inbound HTTP payload. Anything that is not a JSON object
    /// yields a request without body.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        if bytes.is_empty() {
            return Self::default();
        }
        serde_json::from_slice(bytes).unwrap_or_else(|e| {
            warn!(error = %e, "Web-trigger payload is not a JSON object");
            Self::default()
        })
    }

    /// Returns the body as text. Non-string bodies are re-encoded as JSON.
    pub fn body_text(&self) -> Option<String> {
        match self.body.as_ref()? {
            Value::Null => None,
            Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Outbound web-trigger response.
///
/// `body` holds the JSON text of `{"body": payload}`; a `null` payload
/// signals failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebTriggerResponse {
    pub body: String,
    pub headers: BTreeMap<String, Vec<String>>,
    pub status_code: u16,
    pub status_text: String,
}

impl WebTriggerResponse {
    /// Builds an envelope with a random request marker.
    pub fn new(payload: Option<Value>) -> Self {
        Self::with_request_id(payload, random_request_id())
    }

    /// Builds the failure envelope.
    pub fn failure() -> Self {
        Self::new(None)
    }

    /// Builds an envelope with the given request marker.
    pub fn with_request_id(payload: Option<Value>, request_id: String) -> Self {
        let body = json!({ "body": payload.unwrap_or(Value::Null) }).to_string();

        let mut headers = BTreeMap::new();
        headers.insert(
            "Content-Type".to_string(),
            vec!["application/json".to_string()],
        );
        headers.insert(ENVELOPE_REQUEST_ID_HEADER.to_string(), vec![request_id]);

        Self {
            body,
            headers,
            status_code: 200,
            status_text: "OK".to_string(),
        }
    }

    /// Decodes the payload; `None` for the failure envelope.
    pub fn payload(&self) -> Option<Value> {
        let decoded: Value = serde_json::from_str(&self.body).ok()?;
        match decoded.get("body") {
            Some(Value::Null) | None => None,
            Some(payload) => Some(payload.clone()),
        }
    }

    /// Returns whether this is the failure envelope.
    pub fn is_failure(&self) -> bool {
        self.payload().is_none()
    }
}

/// Returns a request marker of the form `rnd-<random>`.
pub fn random_request_id() -> String {
    format!("rnd-{}", rand::random::<f64>())
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub connector: ConnectorHealthResponse,
    pub uptime_seconds: u64,
}

/// Health of the remote asset connector.
#[derive(Debug, Serialize, Deserialize)]
pub struct ConnectorHealthResponse {
    pub name: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}
