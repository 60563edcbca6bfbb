//! ECDSA signature algorithm over an opaque key handle.
//!
//! Curves are paired with their matching hash: P-256 with SHA-256 and P-384
//! with SHA-384, using fixed-size signatures. Other hash pairings are
//! rejected as unsupported.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use ring::rand::SystemRandom;
use ring::signature::{
    self, EcdsaKeyPair, EcdsaSigningAlgorithm, EcdsaVerificationAlgorithm, KeyPair,
    UnparsedPublicKey,
};

use sigstack_core::{AlgorithmError, HashAlgorithm, SignatureAlgorithm};

/// Key handle for an [`EcdsaAlgorithm`].
enum EcdsaKey {
    Signing(EcdsaKeyPair),
    Verification(Vec<u8>),
}

/// ECDSA fixed-size signatures (P-256/SHA-256, P-384/SHA-384).
pub struct EcdsaAlgorithm {
    hash: HashAlgorithm,
    key: EcdsaKey,
    rng: SystemRandom,
    disposed: AtomicBool,
}

impl EcdsaAlgorithm {
    /// Create a signing-capable instance from a PKCS#8 DER private key.
    ///
    /// # Errors
    ///
    /// Returns [`AlgorithmError::InvalidKey`] for unparsable key material
    /// and [`AlgorithmError::NotSupported`] for an unsupported hash pairing.
    pub fn new_signing(pkcs8_der: &[u8], hash: HashAlgorithm) -> Result<Self, AlgorithmError> {
        let rng = SystemRandom::new();
        let key_pair = EcdsaKeyPair::from_pkcs8(signing_algorithm(hash)?, pkcs8_der, &rng)
            .map_err(|e| AlgorithmError::InvalidKey(format!("ecdsa private key: {e}")))?;
        Ok(Self {
            hash,
            key: EcdsaKey::Signing(key_pair),
            rng,
            disposed: AtomicBool::new(false),
        })
    }

    /// Create a verification-only instance from uncompressed public key
    /// bytes (SEC 1 encoding, as produced by `ring`).
    ///
    /// # Errors
    ///
    /// Returns [`AlgorithmError::InvalidKey`] for empty key material and
    /// [`AlgorithmError::NotSupported`] for an unsupported hash pairing.
    pub fn new_verification(
        public_key: Vec<u8>,
        hash: HashAlgorithm,
    ) -> Result<Self, AlgorithmError> {
        verification_algorithm(hash)?;
        if public_key.is_empty() {
            return Err(AlgorithmError::InvalidKey(
                "ecdsa public key cannot be empty".to_owned(),
            ));
        }
        Ok(Self {
            hash,
            key: EcdsaKey::Verification(public_key),
            rng: SystemRandom::new(),
            disposed: AtomicBool::new(false),
        })
    }

    /// Generate a fresh PKCS#8 private key document for the given hash
    /// pairing. Intended for key provisioning and tests.
    ///
    /// # Errors
    ///
    /// Returns [`AlgorithmError::NotSupported`] for an unsupported pairing
    /// or [`AlgorithmError::Operation`] when the system RNG fails.
    pub fn generate_pkcs8(hash: HashAlgorithm) -> Result<Vec<u8>, AlgorithmError> {
        let rng = SystemRandom::new();
        let document = EcdsaKeyPair::generate_pkcs8(signing_algorithm(hash)?, &rng)
            .map_err(|_| AlgorithmError::Operation("ecdsa key generation failed".to_owned()))?;
        Ok(document.as_ref().to_vec())
    }

    /// Whether this instance can compute signatures.
    #[must_use]
    pub fn is_signing_capable(&self) -> bool {
        matches!(self.key, EcdsaKey::Signing(_))
    }

    /// The public key bytes of this instance, e.g. for distributing a
    /// verification-only counterpart.
    #[must_use]
    pub fn public_key(&self) -> Vec<u8> {
        self.public_key_bytes()
    }

    fn public_key_bytes(&self) -> Vec<u8> {
        match &self.key {
            EcdsaKey::Signing(key_pair) => key_pair.public_key().as_ref().to_vec(),
            EcdsaKey::Verification(bytes) => bytes.clone(),
        }
    }
}

/// Map a hash function to the matching curve's signing algorithm.
fn signing_algorithm(
    hash: HashAlgorithm,
) -> Result<&'static EcdsaSigningAlgorithm, AlgorithmError> {
    match hash {
        HashAlgorithm::Sha256 => Ok(&signature::ECDSA_P256_SHA256_FIXED_SIGNING),
        HashAlgorithm::Sha384 => Ok(&signature::ECDSA_P384_SHA384_FIXED_SIGNING),
        HashAlgorithm::Sha1 | HashAlgorithm::Sha512 => Err(AlgorithmError::NotSupported(format!(
            "ecdsa with {hash} is not supported"
        ))),
    }
}

/// Map a hash function to the matching curve's verification algorithm.
fn verification_algorithm(
    hash: HashAlgorithm,
) -> Result<&'static EcdsaVerificationAlgorithm, AlgorithmError> {
    match hash {
        HashAlgorithm::Sha256 => Ok(&signature::ECDSA_P256_SHA256_FIXED),
        HashAlgorithm::Sha384 => Ok(&signature::ECDSA_P384_SHA384_FIXED),
        HashAlgorithm::Sha1 | HashAlgorithm::Sha512 => Err(AlgorithmError::NotSupported(format!(
            "ecdsa with {hash} is not supported"
        ))),
    }
}

impl SignatureAlgorithm for EcdsaAlgorithm {
    fn name(&self) -> &'static str {
        "ecdsa"
    }

    fn hash_algorithm(&self) -> HashAlgorithm {
        self.hash
    }

    fn compute_hash(&self, payload: &str) -> Result<Vec<u8>, AlgorithmError> {
        if self.is_disposed() {
            return Err(AlgorithmError::Disposed);
        }
        let EcdsaKey::Signing(key_pair) = &self.key else {
            return Err(AlgorithmError::VerificationOnly);
        };

        let signature_bytes = key_pair
            .sign(&self.rng, payload.as_bytes())
            .map_err(|_| AlgorithmError::Operation("ecdsa signing failed".to_owned()))?;
        Ok(signature_bytes.as_ref().to_vec())
    }

    fn verify(&self, payload: &str, signature: &[u8]) -> Result<bool, AlgorithmError> {
        if self.is_disposed() {
            return Err(AlgorithmError::Disposed);
        }
        let algorithm = verification_algorithm(self.hash)?;
        let public_key = UnparsedPublicKey::new(algorithm, self.public_key_bytes());
        Ok(public_key.verify(payload.as_bytes(), signature).is_ok())
    }

    fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
    }

    fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for EcdsaAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EcdsaAlgorithm")
            .field("hash", &self.hash)
            .field("signing_capable", &self.is_signing_capable())
            .field("disposed", &self.is_disposed())
            .finish_non_exhaustive()
    }
}
