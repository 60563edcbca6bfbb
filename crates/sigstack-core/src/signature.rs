//! The signature model carried in the `Authorization` header.

use chrono::{DateTime, Utc};

use crate::error::{ValidationError, Violation};
use crate::header::HeaderName;
use crate::types::KeyId;

/// A parsed or in-construction HTTP message signature.
///
/// A `Signature` can exist transiently in an invalid state while it is being
/// built; structural invariants (non-empty key id, signature string and
/// header list) are enforced by [`validate`](Self::validate), not at
/// construction time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    /// Identifier of the signing client or credential.
    pub key_id: KeyId,
    /// Combined algorithm token, e.g. `hmac_sha384`, when declared.
    pub algorithm: Option<String>,
    /// Instant the signature was created.
    pub created: Option<DateTime<Utc>>,
    /// Instant the signature expires.
    pub expires: Option<DateTime<Utc>>,
    /// Ordered list of header names covered by the signature.
    pub headers: Vec<HeaderName>,
    /// Base64-encoded signature bytes.
    pub signature: String,
    /// Single-use replay-prevention token, when the signer enabled nonces.
    pub nonce: Option<String>,
}

impl Signature {
    /// Validate the structural invariants of a complete signature.
    ///
    /// # Errors
    ///
    /// Returns every violated `{property, message}` pair.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut violations = Vec::new();

        if self.key_id.is_empty() {
            violations.push(Violation::new("key_id", "key id cannot be empty"));
        }
        if self.signature.is_empty() {
            violations.push(Violation::new(
                "signature",
                "signature string cannot be empty",
            ));
        }
        if self.headers.is_empty() {
            violations.push(Violation::new(
                "headers",
                "at least one header must be covered by the signature",
            ));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(violations))
        }
    }
}
