//! Zeroizing wrapper for API tokens.
//!
//! The Atlassian API token used for Basic authentication is held in a
//! [`SecureString`] from the moment configuration is parsed until the HTTP
//! client drops it.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

/// A credential string whose memory is cleared on drop and which never
/// prints its contents through `Debug` or `Display`.
///
/// ```
/// use al_connectors::SecureString;
///
/// let token = SecureString::from("atlassian-api-token");
/// assert_eq!(token.expose_secret(), "atlassian-api-token");
/// assert_eq!(format!("{:?}", token), "SecureString([REDACTED])");
/// ```
#[derive(Clone, Default)]
pub struct SecureString(Zeroizing<String>);

impl SecureString {
    /// Wraps an owned string.
    pub fn new(secret: String) -> Self {
        Self(Zeroizing::new(secret))
    }

    /// Borrows the secret. Copies made from the returned slice are not zeroized.
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for SecureString {
    fn from(secret: String) -> Self {
        Self::new(secret)
    }
}

impl From<&str> for SecureString {
    fn from(secret: &str) -> Self {
        Self::new(secret.to_owned())
    }
}

impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecureString([REDACTED])")
    }
}

impl fmt::Display for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl PartialEq for SecureString {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_bytes().ct_eq(other.0.as_bytes()).into()
    }
}

impl Eq for SecureString {}

impl Serialize for SecureString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SecureString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expose_and_len() {
        let token = SecureString::new("ATATT3x".to_string());
        assert_eq!(token.expose_secret(), "ATATT3x");
        assert_eq!(token.len(), 7);
        assert!(!token.is_empty());
        assert!(SecureString::default().is_empty());
    }

    #[test]
    fn test_formatting_is_redacted() {
        let token = SecureString::from("super-secret");
        assert!(!format!("{:?}", token).contains("super-secret"));
        assert_eq!(token.to_string(), "[REDACTED]");
    }

    #[test]
    fn test_equality() {
        assert_eq!(SecureString::from("a"), SecureString::from("a"));
        assert_ne!(SecureString::from("a"), SecureString::from("b"));
    }

    #[test]
    fn test_deserializes_from_yaml_style_string() {
        let token: SecureString = serde_json::from_str("\"token-123\"").unwrap();
        assert_eq!(token.expose_secret(), "token-123");
        assert_eq!(serde_json::to_string(&token).unwrap(), "\"token-123\"");
    }
}
