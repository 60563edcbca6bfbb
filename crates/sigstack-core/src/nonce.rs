//! Single-use replay-prevention tokens.

use chrono::{DateTime, Utc};

use crate::error::CoreError;
use crate::types::KeyId;

/// A nonce observed for a client, tracked until its expiration.
///
/// Replay detection keys on `(client_id, value)`; registering the same key
/// again replaces the stored expiration ("latest observed expiration wins").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nonce {
    /// The presenting client.
    pub client_id: KeyId,
    /// The nonce value itself.
    pub value: String,
    /// Instant after which the value may be presented again.
    pub expires_at: DateTime<Utc>,
}

impl Nonce {
    /// Create a nonce record.
    ///
    /// # Errors
    ///
    /// Returns an argument error for an empty client id or value.
    pub fn new(
        client_id: KeyId,
        value: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Result<Self, CoreError> {
        let value = value.into();
        if client_id.is_empty() {
            return Err(CoreError::argument("client_id", "client id cannot be empty"));
        }
        if value.is_empty() {
            return Err(CoreError::argument("value", "nonce value cannot be empty"));
        }
        Ok(Self {
            client_id,
            value,
            expires_at,
        })
    }

    /// Whether the nonce is past its expiration at the given instant.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_create_valid_nonce() {
        let nonce = Nonce::new(KeyId::new("client1"), "abc123", Utc::now()).unwrap();
        assert_eq!(nonce.value, "abc123");
    }

    #[test]
    fn test_should_reject_empty_value() {
        let result = Nonce::new(KeyId::new("client1"), "", Utc::now());
        assert!(matches!(result, Err(CoreError::Argument { .. })));
    }

    #[test]
    fn test_should_reject_empty_client_id() {
        let result = Nonce::new(KeyId::empty(), "abc123", Utc::now());
        assert!(matches!(result, Err(CoreError::Argument { .. })));
    }

    #[test]
    fn test_should_report_expiry() {
        let now = Utc::now();
        let nonce = Nonce::new(KeyId::new("client1"), "abc123", now).unwrap();
        assert!(nonce.is_expired_at(now));
        assert!(!nonce.is_expired_at(now - chrono::Duration::seconds(30)));
    }
}
