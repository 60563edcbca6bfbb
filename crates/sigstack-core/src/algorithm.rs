//! The signature algorithm capability surface.
//!
//! The [`SignatureAlgorithm`] trait is defined here, in the core crate, so
//! that [`Client`](crate::Client) and the signing settings can own an
//! algorithm handle without depending on the crypto implementations. The
//! trait operates over an opaque key reference held by the implementation:
//! verification-only and signing-capable instances are both expressible, and
//! private key material never has to be exportable.

use std::fmt;
use std::str::FromStr;

use crate::error::AlgorithmError;

/// Identifier of the underlying hash function of a signature algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum HashAlgorithm {
    /// SHA-1 (legacy; most operations reject it as unsupported).
    Sha1,
    /// SHA-256.
    Sha256,
    /// SHA-384.
    Sha384,
    /// SHA-512.
    Sha512,
}

impl HashAlgorithm {
    /// Lower-case token used in algorithm identifiers, e.g. `sha256`.
    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
        }
    }

    /// Canonical digest-header token: upper-case, hyphenated (`SHA-256`).
    #[must_use]
    pub fn digest_name(self) -> &'static str {
        match self {
            Self::Sha1 => "SHA-1",
            Self::Sha256 => "SHA-256",
            Self::Sha384 => "SHA-384",
            Self::Sha512 => "SHA-512",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for HashAlgorithm {
    type Err = AlgorithmError;

    /// Parse either the lower-case token (`sha256`) or the digest-header
    /// form (`SHA-256`), case-insensitively. An unrecognized token is
    /// [`AlgorithmError::Unknown`], not "not supported".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "").as_str() {
            "sha1" => Ok(Self::Sha1),
            "sha256" => Ok(Self::Sha256),
            "sha384" => Ok(Self::Sha384),
            "sha512" => Ok(Self::Sha512),
            _ => Err(AlgorithmError::Unknown(s.to_owned())),
        }
    }
}

/// Kind of signature algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum SignatureAlgorithmKind {
    /// Symmetric keyed hash (shared secret).
    Hmac,
    /// RSA PKCS#1 v1.5 signatures.
    Rsa,
    /// ECDSA signatures.
    Ecdsa,
}

impl SignatureAlgorithmKind {
    /// Lower-case token used in algorithm identifiers, e.g. `hmac`.
    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            Self::Hmac => "hmac",
            Self::Rsa => "rsa",
            Self::Ecdsa => "ecdsa",
        }
    }
}

impl fmt::Display for SignatureAlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for SignatureAlgorithmKind {
    type Err = AlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hmac" => Ok(Self::Hmac),
            "rsa" => Ok(Self::Rsa),
            "ecdsa" => Ok(Self::Ecdsa),
            _ => Err(AlgorithmError::Unknown(s.to_owned())),
        }
    }
}

/// Build the combined algorithm token carried in the `algorithm` field of a
/// signature, e.g. `hmac_sha384`.
#[must_use]
pub fn algorithm_token(name: &str, hash: HashAlgorithm) -> String {
    format!("{name}_{}", hash.token())
}

/// Parse a combined algorithm token back into its name and hash halves.
///
/// # Errors
///
/// Returns [`AlgorithmError::Unknown`] when the token has no `_` separator
/// or the hash half is unrecognized.
pub fn parse_algorithm_token(token: &str) -> Result<(&str, HashAlgorithm), AlgorithmError> {
    let (name, hash) = token
        .split_once('_')
        .ok_or_else(|| AlgorithmError::Unknown(token.to_owned()))?;
    if name.is_empty() {
        return Err(AlgorithmError::Unknown(token.to_owned()));
    }
    Ok((name, hash.parse()?))
}

/// Polymorphic signature algorithm capability.
///
/// Implementations own their key material behind an opaque handle. The same
/// trait covers symmetric (HMAC) and asymmetric (RSA/ECDSA) variants; an
/// asymmetric instance constructed in verification mode holds only public
/// key material and fails `compute_hash`.
///
/// Handles are single-owner resources: [`dispose`](Self::dispose) releases
/// the underlying key material and is idempotent, so whichever lifecycle
/// event fires first (explicit dispose, store removal, cache eviction)
/// performs the release exactly once.
pub trait SignatureAlgorithm: Send + Sync + fmt::Debug {
    /// Stable algorithm name, e.g. `hmac`.
    fn name(&self) -> &'static str;

    /// The hash function this algorithm is parameterized with.
    fn hash_algorithm(&self) -> HashAlgorithm;

    /// Whether signatures of this algorithm request their creation and
    /// expiration times through the `(created)`/`(expires)` pseudo-headers.
    ///
    /// The built-in hmac/rsa/ecdsa variants carry both timestamps in the
    /// signature metadata instead, so a redundant pseudo-header in their
    /// header list is rejected during verification.
    fn uses_timestamp_pseudo_headers(&self) -> bool {
        false
    }

    /// Compute the signature bytes over the given payload.
    fn compute_hash(&self, payload: &str) -> Result<Vec<u8>, AlgorithmError>;

    /// Verify previously computed signature bytes over the given payload.
    ///
    /// A mismatching signature is `Ok(false)`; `Err` is reserved for
    /// unusable handles and key-level faults.
    fn verify(&self, payload: &str, signature: &[u8]) -> Result<bool, AlgorithmError>;

    /// Release the underlying key material. Idempotent.
    fn dispose(&self);

    /// Whether [`dispose`](Self::dispose) has been invoked.
    fn is_disposed(&self) -> bool;
}
