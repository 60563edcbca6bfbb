//! Construction of signature algorithms from declarative descriptions.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use tracing::debug;

use sigstack_core::{
    AlgorithmError, HashAlgorithm, Secret, SelfContainedKeyId, SignatureAlgorithm,
    SignatureAlgorithmKind,
};

use crate::ecdsa::EcdsaAlgorithm;
use crate::hmac::HmacAlgorithm;
use crate::rsa::RsaAlgorithm;

/// Key material accepted by the factory.
///
/// The variants mirror the construction modes of the algorithms: a shared
/// secret for HMAC, a PKCS#8 private key for signing-capable asymmetric
/// instances, and raw public key bytes for verification-only instances.
#[derive(Debug)]
pub enum KeyMaterial {
    /// Shared secret (HMAC).
    Secret(Secret),
    /// PKCS#8 DER private key (RSA/ECDSA signing mode).
    Pkcs8Private(Vec<u8>),
    /// Public key bytes (RSA/ECDSA verification mode).
    Public(Vec<u8>),
}

/// Maps `(signature-algorithm-kind, hash-algorithm-kind, key-material)` to a
/// constructed algorithm.
#[derive(Debug)]
pub struct SignatureAlgorithmFactory;

impl SignatureAlgorithmFactory {
    /// Construct an algorithm from its kind, hash and key material.
    ///
    /// # Errors
    ///
    /// - [`AlgorithmError::InvalidKey`] for empty/malformed key material;
    /// - [`AlgorithmError::NotSupported`] when the key material variant does
    ///   not belong to the requested kind (e.g. a shared secret supplied for
    ///   RSA), or for an unsupported hash pairing.
    pub fn create(
        kind: SignatureAlgorithmKind,
        hash: HashAlgorithm,
        key: &KeyMaterial,
    ) -> Result<Arc<dyn SignatureAlgorithm>, AlgorithmError> {
        debug!(kind = %kind, hash = %hash, "constructing signature algorithm");
        match (kind, key) {
            (SignatureAlgorithmKind::Hmac, KeyMaterial::Secret(secret)) => {
                Ok(Arc::new(HmacAlgorithm::new(secret, hash)?))
            }
            (SignatureAlgorithmKind::Rsa, KeyMaterial::Pkcs8Private(der)) => {
                Ok(Arc::new(RsaAlgorithm::new_signing(der, hash)?))
            }
            (SignatureAlgorithmKind::Rsa, KeyMaterial::Public(bytes)) => {
                Ok(Arc::new(RsaAlgorithm::new_verification(bytes.clone(), hash)?))
            }
            (SignatureAlgorithmKind::Ecdsa, KeyMaterial::Pkcs8Private(der)) => {
                Ok(Arc::new(EcdsaAlgorithm::new_signing(der, hash)?))
            }
            (SignatureAlgorithmKind::Ecdsa, KeyMaterial::Public(bytes)) => {
                Ok(Arc::new(EcdsaAlgorithm::new_verification(
                    bytes.clone(),
                    hash,
                )?))
            }
            (kind, key) => Err(AlgorithmError::NotSupported(format!(
                "{kind} cannot be constructed from {} key material",
                key_material_kind(key)
            ))),
        }
    }

    /// Construct an algorithm from a self-contained key id.
    ///
    /// The embedded key segment is the shared secret for HMAC, or
    /// base64-encoded public key bytes for the asymmetric kinds (which are
    /// therefore verification-only).
    ///
    /// # Errors
    ///
    /// Returns [`AlgorithmError::InvalidKey`] when the embedded key segment
    /// does not decode, plus every error of [`create`](Self::create).
    pub fn from_self_contained(
        id: &SelfContainedKeyId,
    ) -> Result<Arc<dyn SignatureAlgorithm>, AlgorithmError> {
        let key = match id.signature_algorithm {
            SignatureAlgorithmKind::Hmac => KeyMaterial::Secret(Secret::new(id.key.clone())),
            SignatureAlgorithmKind::Rsa | SignatureAlgorithmKind::Ecdsa => {
                let bytes = BASE64.decode(&id.key).map_err(|e| {
                    AlgorithmError::InvalidKey(format!("embedded public key is not base64: {e}"))
                })?;
                KeyMaterial::Public(bytes)
            }
        };
        Self::create(id.signature_algorithm, id.hash_algorithm, &key)
    }
}

fn key_material_kind(key: &KeyMaterial) -> &'static str {
    match key {
        KeyMaterial::Secret(_) => "shared-secret",
        KeyMaterial::Pkcs8Private(_) => "private-key",
        KeyMaterial::Public(_) => "public-key",
    }
}
