//! Symmetric HMAC signature algorithm.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use hmac::{Hmac, KeyInit, Mac};
use parking_lot::Mutex;
use sha1::Sha1;
use sha2::{Sha256, Sha384, Sha512};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use sigstack_core::{AlgorithmError, HashAlgorithm, Secret, SignatureAlgorithm};

use crate::pool::Pool;

/// A keyed-hash primitive with the key schedule already applied.
///
/// The primitive is not safe to share between two logical operations, so it
/// lives in a [`Pool`] and is handed out exclusively. Each computation
/// clones the keyed state, which is cheap compared to re-running the key
/// schedule.
enum KeyedHash {
    Sha1(Hmac<Sha1>),
    Sha256(Hmac<Sha256>),
    Sha384(Hmac<Sha384>),
    Sha512(Hmac<Sha512>),
}

impl KeyedHash {
    /// Build the keyed primitive for the given hash function.
    fn new(hash: HashAlgorithm, key: &[u8]) -> Self {
        match hash {
            HashAlgorithm::Sha1 => {
                Self::Sha1(Hmac::new_from_slice(key).expect("HMAC can accept any key length"))
            }
            HashAlgorithm::Sha256 => {
                Self::Sha256(Hmac::new_from_slice(key).expect("HMAC can accept any key length"))
            }
            HashAlgorithm::Sha384 => {
                Self::Sha384(Hmac::new_from_slice(key).expect("HMAC can accept any key length"))
            }
            HashAlgorithm::Sha512 => {
                Self::Sha512(Hmac::new_from_slice(key).expect("HMAC can accept any key length"))
            }
        }
    }

    /// Compute the MAC over `payload`.
    fn compute(&self, payload: &[u8]) -> Vec<u8> {
        match self {
            Self::Sha1(proto) => {
                let mut mac = proto.clone();
                mac.update(payload);
                mac.finalize().into_bytes().to_vec()
            }
            Self::Sha256(proto) => {
                let mut mac = proto.clone();
                mac.update(payload);
                mac.finalize().into_bytes().to_vec()
            }
            Self::Sha384(proto) => {
                let mut mac = proto.clone();
                mac.update(payload);
                mac.finalize().into_bytes().to_vec()
            }
            Self::Sha512(proto) => {
                let mut mac = proto.clone();
                mac.update(payload);
                mac.finalize().into_bytes().to_vec()
            }
        }
    }
}

/// Symmetric HMAC signature algorithm.
///
/// The same shared secret drives both [`compute_hash`] and [`verify`], so a
/// single instance serves signing and verification. Disposal scrubs the
/// secret bytes and drops the pooled primitives; it is idempotent.
///
/// [`compute_hash`]: SignatureAlgorithm::compute_hash
/// [`verify`]: SignatureAlgorithm::verify
pub struct HmacAlgorithm {
    hash: HashAlgorithm,
    key: Mutex<Option<Zeroizing<Vec<u8>>>>,
    pool: Pool<KeyedHash>,
    disposed: AtomicBool,
}

impl HmacAlgorithm {
    /// Create an HMAC algorithm for the given secret and hash function.
    ///
    /// # Errors
    ///
    /// Returns [`AlgorithmError::InvalidKey`] for an empty secret.
    pub fn new(secret: &Secret, hash: HashAlgorithm) -> Result<Self, AlgorithmError> {
        if secret.is_empty() {
            return Err(AlgorithmError::InvalidKey(
                "hmac secret cannot be empty".to_owned(),
            ));
        }
        Ok(Self {
            hash,
            key: Mutex::new(Some(Zeroizing::new(secret.as_bytes().to_vec()))),
            pool: Pool::new(),
            disposed: AtomicBool::new(false),
        })
    }

    /// Number of idle pooled primitives (diagnostics and tests).
    #[must_use]
    pub fn pooled(&self) -> usize {
        self.pool.idle()
    }

    fn compute(&self, payload: &str) -> Result<Vec<u8>, AlgorithmError> {
        if self.is_disposed() {
            return Err(AlgorithmError::Disposed);
        }
        let key_guard = self.key.lock();
        let key = key_guard.as_ref().ok_or(AlgorithmError::Disposed)?;
        let primitive = self.pool.checkout_with(|| KeyedHash::new(self.hash, key));
        Ok(primitive.compute(payload.as_bytes()))
    }
}

impl SignatureAlgorithm for HmacAlgorithm {
    fn name(&self) -> &'static str {
        "hmac"
    }

    fn hash_algorithm(&self) -> HashAlgorithm {
        self.hash
    }

    fn compute_hash(&self, payload: &str) -> Result<Vec<u8>, AlgorithmError> {
        self.compute(payload)
    }

    fn verify(&self, payload: &str, signature: &[u8]) -> Result<bool, AlgorithmError> {
        let expected = self.compute(payload)?;
        Ok(expected.as_slice().ct_eq(signature).into())
    }

    fn dispose(&self) {
        if !self.disposed.swap(true, Ordering::SeqCst) {
            self.pool.clear();
            // Zeroizing scrubs the secret bytes on drop.
            *self.key.lock() = None;
        }
    }

    fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }
}

impl Drop for HmacAlgorithm {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for HmacAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HmacAlgorithm")
            .field("hash", &self.hash)
            .field("disposed", &self.is_disposed())
            .finish_non_exhaustive()
    }
}
