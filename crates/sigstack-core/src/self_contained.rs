//! Self-contained key id encoding.
//!
//! A self-contained key id embeds the signature algorithm, hash algorithm
//! and key material directly in its string form:
//!
//! ```text
//! sig=<signature-algorithm>, hash=<hash-algorithm>, key=<value>
//! ```
//!
//! All three segments are mandatory and the grammar is strict: unknown
//! algorithm tokens and a present-but-empty key segment are rejected with a
//! format error.

use std::fmt;
use std::str::FromStr;

use crate::algorithm::{HashAlgorithm, SignatureAlgorithmKind};
use crate::error::CoreError;
use crate::types::KeyId;

/// A key id that carries its own algorithm and key material, so the
/// verifier does not need a separate lookup to construct the algorithm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelfContainedKeyId {
    /// The signature algorithm kind.
    pub signature_algorithm: SignatureAlgorithmKind,
    /// The hash algorithm.
    pub hash_algorithm: HashAlgorithm,
    /// The embedded key material (shared secret, or encoded public key).
    pub key: String,
}

impl SelfContainedKeyId {
    /// Create a new self-contained key id.
    ///
    /// # Errors
    ///
    /// Returns an argument error for an empty key segment.
    pub fn new(
        signature_algorithm: SignatureAlgorithmKind,
        hash_algorithm: HashAlgorithm,
        key: impl Into<String>,
    ) -> Result<Self, CoreError> {
        let key = key.into();
        if key.is_empty() {
            return Err(CoreError::argument("key", "key segment cannot be empty"));
        }
        Ok(Self {
            signature_algorithm,
            hash_algorithm,
            key,
        })
    }

    /// Render into a plain [`KeyId`].
    #[must_use]
    pub fn to_key_id(&self) -> KeyId {
        KeyId::new(self.to_string())
    }
}

impl fmt::Display for SelfContainedKeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sig={}, hash={}, key={}",
            self.signature_algorithm, self.hash_algorithm, self.key
        )
    }
}

impl FromStr for SelfContainedKeyId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut sig = None;
        let mut hash = None;
        let mut key = None;

        for part in s.split(',') {
            let part = part.trim();
            if let Some(value) = part.strip_prefix("sig=") {
                sig = Some(value);
            } else if let Some(value) = part.strip_prefix("hash=") {
                hash = Some(value);
            } else if let Some(value) = part.strip_prefix("key=") {
                key = Some(value);
            } else if !part.is_empty() {
                return Err(CoreError::KeyIdFormat(format!(
                    "unexpected segment: {part}"
                )));
            }
        }

        let sig = sig.ok_or_else(|| CoreError::KeyIdFormat("missing sig= segment".to_owned()))?;
        let hash = hash.ok_or_else(|| CoreError::KeyIdFormat("missing hash= segment".to_owned()))?;
        let key = key.ok_or_else(|| CoreError::KeyIdFormat("missing key= segment".to_owned()))?;

        if key.is_empty() {
            return Err(CoreError::KeyIdFormat("key segment is empty".to_owned()));
        }

        let signature_algorithm = sig
            .parse::<SignatureAlgorithmKind>()
            .map_err(|e| CoreError::KeyIdFormat(e.to_string()))?;
        let hash_algorithm = hash
            .parse::<HashAlgorithm>()
            .map_err(|e| CoreError::KeyIdFormat(e.to_string()))?;

        Ok(Self {
            signature_algorithm,
            hash_algorithm,
            key: key.to_owned(),
        })
    }
}

impl TryFrom<&KeyId> for SelfContainedKeyId {
    type Error = CoreError;

    fn try_from(id: &KeyId) -> Result<Self, Self::Error> {
        id.as_str().parse()
    }
}
