//! Body digest computation for the `Digest` header.
//!
//! The header value format is `<ALGO-NAME>=<base64-hash-of-body>`, with the
//! algorithm token upper-cased and hyphenated (`SHA-256=...`). Header name
//! lookup elsewhere is case-insensitive, but the algorithm token inside the
//! value is fixed-case.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use sha2::{Digest, Sha256, Sha384, Sha512};

use sigstack_core::{AlgorithmError, HashAlgorithm};

/// Hash a body with the given algorithm.
///
/// # Errors
///
/// Returns [`AlgorithmError::NotSupported`] for SHA-1, which is recognized
/// but not acceptable as a digest algorithm.
pub fn hash_body(hash: HashAlgorithm, body: &[u8]) -> Result<Vec<u8>, AlgorithmError> {
    match hash {
        HashAlgorithm::Sha256 => Ok(Sha256::digest(body).to_vec()),
        HashAlgorithm::Sha384 => Ok(Sha384::digest(body).to_vec()),
        HashAlgorithm::Sha512 => Ok(Sha512::digest(body).to_vec()),
        HashAlgorithm::Sha1 => Err(AlgorithmError::NotSupported(
            "sha1 is not supported as a digest algorithm".to_owned(),
        )),
    }
}

/// Build a `Digest` header value for a body.
///
/// # Examples
///
/// ```
/// use sigstack_core::HashAlgorithm;
/// use sigstack_crypto::digest::digest_header_value;
///
/// let value = digest_header_value(HashAlgorithm::Sha256, b"").unwrap();
/// assert_eq!(value, "SHA-256=47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU=");
/// ```
pub fn digest_header_value(hash: HashAlgorithm, body: &[u8]) -> Result<String, AlgorithmError> {
    let digest = hash_body(hash, body)?;
    Ok(format!("{}={}", hash.digest_name(), BASE64.encode(digest)))
}

/// Recompute a body hash and compare it against a declared `Digest` header
/// value.
///
/// # Errors
///
/// - [`AlgorithmError::Unknown`] for an unparsable value or unrecognized
///   algorithm token;
/// - [`AlgorithmError::NotSupported`] for a recognized but unsupported
///   algorithm.
pub fn verify_digest_header(value: &str, body: &[u8]) -> Result<bool, AlgorithmError> {
    let (algorithm, declared) = value
        .split_once('=')
        .ok_or_else(|| AlgorithmError::Unknown(format!("malformed digest value: {value}")))?;

    let hash: HashAlgorithm = algorithm.parse()?;
    let expected = digest_header_value(hash, body)?;
    let declared_full = format!("{}={declared}", hash.digest_name());
    Ok(expected == declared_full)
}
