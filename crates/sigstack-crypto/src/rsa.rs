//! RSA PKCS#1 v1.5 signature algorithm over an opaque key handle.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use ring::rand::SystemRandom;
use ring::signature::{
    self, KeyPair, RsaKeyPair, UnparsedPublicKey,
};

use sigstack_core::{AlgorithmError, HashAlgorithm, SignatureAlgorithm};

/// Key handle for an [`RsaAlgorithm`].
///
/// Signing mode holds a private key pair; the private component is never
/// exportable from the handle. Verification mode holds only the public key.
enum RsaKey {
    Signing(RsaKeyPair),
    Verification(Vec<u8>),
}

/// RSA PKCS#1 v1.5 signatures.
///
/// Supported hash functions: SHA-256, SHA-384 and SHA-512. SHA-1 is
/// recognized but rejected as unsupported.
pub struct RsaAlgorithm {
    hash: HashAlgorithm,
    key: RsaKey,
    rng: SystemRandom,
    disposed: AtomicBool,
}

impl RsaAlgorithm {
    /// Create a signing-capable instance from a PKCS#8 v1 DER private key.
    ///
    /// # Errors
    ///
    /// Returns [`AlgorithmError::InvalidKey`] for unparsable key material
    /// and [`AlgorithmError::NotSupported`] for an unsupported hash.
    pub fn new_signing(pkcs8_der: &[u8], hash: HashAlgorithm) -> Result<Self, AlgorithmError> {
        signing_padding(hash)?;
        let key_pair = RsaKeyPair::from_pkcs8(pkcs8_der)
            .map_err(|e| AlgorithmError::InvalidKey(format!("rsa private key: {e}")))?;
        Ok(Self {
            hash,
            key: RsaKey::Signing(key_pair),
            rng: SystemRandom::new(),
            disposed: AtomicBool::new(false),
        })
    }

    /// Create a verification-only instance from RSA public key bytes
    /// (RFC 8017 `RSAPublicKey` DER, as produced by `ring`).
    ///
    /// # Errors
    ///
    /// Returns [`AlgorithmError::InvalidKey`] for empty key material and
    /// [`AlgorithmError::NotSupported`] for an unsupported hash.
    pub fn new_verification(
        public_key: Vec<u8>,
        hash: HashAlgorithm,
    ) -> Result<Self, AlgorithmError> {
        verification_params(hash)?;
        if public_key.is_empty() {
            return Err(AlgorithmError::InvalidKey(
                "rsa public key cannot be empty".to_owned(),
            ));
        }
        Ok(Self {
            hash,
            key: RsaKey::Verification(public_key),
            rng: SystemRandom::new(),
            disposed: AtomicBool::new(false),
        })
    }

    /// Whether this instance can compute signatures.
    #[must_use]
    pub fn is_signing_capable(&self) -> bool {
        matches!(self.key, RsaKey::Signing(_))
    }

    /// The public key bytes of this instance, e.g. for distributing a
    /// verification-only counterpart.
    #[must_use]
    pub fn public_key(&self) -> Vec<u8> {
        self.public_key_bytes()
    }

    fn public_key_bytes(&self) -> Vec<u8> {
        match &self.key {
            RsaKey::Signing(key_pair) => key_pair.public_key().as_ref().to_vec(),
            RsaKey::Verification(bytes) => bytes.clone(),
        }
    }
}

/// Map a hash function to the `ring` signing padding.
fn signing_padding(
    hash: HashAlgorithm,
) -> Result<&'static dyn signature::RsaEncoding, AlgorithmError> {
    match hash {
        HashAlgorithm::Sha256 => Ok(&signature::RSA_PKCS1_SHA256),
        HashAlgorithm::Sha384 => Ok(&signature::RSA_PKCS1_SHA384),
        HashAlgorithm::Sha512 => Ok(&signature::RSA_PKCS1_SHA512),
        HashAlgorithm::Sha1 => Err(AlgorithmError::NotSupported(
            "rsa with sha1 is not supported".to_owned(),
        )),
    }
}

/// Map a hash function to the `ring` verification parameters.
fn verification_params(
    hash: HashAlgorithm,
) -> Result<&'static signature::RsaParameters, AlgorithmError> {
    match hash {
        HashAlgorithm::Sha256 => Ok(&signature::RSA_PKCS1_2048_8192_SHA256),
        HashAlgorithm::Sha384 => Ok(&signature::RSA_PKCS1_2048_8192_SHA384),
        HashAlgorithm::Sha512 => Ok(&signature::RSA_PKCS1_2048_8192_SHA512),
        HashAlgorithm::Sha1 => Err(AlgorithmError::NotSupported(
            "rsa with sha1 is not supported".to_owned(),
        )),
    }
}

impl SignatureAlgorithm for RsaAlgorithm {
    fn name(&self) -> &'static str {
        "rsa"
    }

    fn hash_algorithm(&self) -> HashAlgorithm {
        self.hash
    }

    fn compute_hash(&self, payload: &str) -> Result<Vec<u8>, AlgorithmError> {
        if self.is_disposed() {
            return Err(AlgorithmError::Disposed);
        }
        let RsaKey::Signing(key_pair) = &self.key else {
            return Err(AlgorithmError::VerificationOnly);
        };

        let padding = signing_padding(self.hash)?;
        let mut signature_bytes = vec![0; key_pair.public().modulus_len()];
        key_pair
            .sign(padding, &self.rng, payload.as_bytes(), &mut signature_bytes)
            .map_err(|_| AlgorithmError::Operation("rsa signing failed".to_owned()))?;
        Ok(signature_bytes)
    }

    fn verify(&self, payload: &str, signature: &[u8]) -> Result<bool, AlgorithmError> {
        if self.is_disposed() {
            return Err(AlgorithmError::Disposed);
        }
        let params = verification_params(self.hash)?;
        let public_key = UnparsedPublicKey::new(params, self.public_key_bytes());
        Ok(public_key.verify(payload.as_bytes(), signature).is_ok())
    }

    fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
    }

    fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for RsaAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaAlgorithm")
            .field("hash", &self.hash)
            .field("signing_capable", &self.is_signing_capable())
            .field("disposed", &self.is_disposed())
            .finish_non_exhaustive()
    }
}
