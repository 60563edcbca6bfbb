//! Common value types shared across the signing and verification pipelines.

use std::fmt;

/// Opaque, case-sensitive identifier a client presents so the verifier can
/// look up its algorithm and key material.
///
/// Equality is exact-string. The empty key id is a distinguished "unset"
/// value that fails validation wherever a key id is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct KeyId(String);

impl KeyId {
    /// Create a new key id from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The distinguished unset key id.
    #[must_use]
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Whether this is the unset key id.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the key id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for KeyId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for KeyId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Opaque, case-sensitive wrapper for a shared secret.
///
/// The empty string normalizes to [`Secret::empty`], so "no secret" and
/// "empty secret" compare equal. Equality is defined purely on the wrapped
/// value; there is a single concrete type for all secret-like parameters.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Secret(String);

impl Secret {
    /// Create a new secret. An empty input yields [`Secret::empty`].
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The shared empty secret.
    #[must_use]
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Whether this is the empty secret.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Expose the secret bytes. Callers must not log or persist the result.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Expose the secret as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

// The wrapped value never appears in Debug output.
impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("Secret(<empty>)")
        } else {
            f.write_str("Secret(***)")
        }
    }
}

/// A single claim attached to an authenticated principal.
///
/// Claims are order-preserving and duplicate claim types are allowed.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Claim {
    /// The claim type, e.g. `role`.
    pub claim_type: String,
    /// The claim value.
    pub value: String,
}

impl Claim {
    /// Create a new claim.
    pub fn new(claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            claim_type: claim_type.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Claim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.claim_type, self.value)
    }
}
