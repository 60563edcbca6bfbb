//! Signature algorithm implementations for sigstack.
//!
//! This crate provides the concrete [`SignatureAlgorithm`] variants behind
//! the capability trait defined in `sigstack-core`:
//!
//! - [`HmacAlgorithm`] — symmetric keyed hashing with a pool of reusable
//!   keyed-hash primitives
//! - [`RsaAlgorithm`] — RSA PKCS#1 v1.5 over an opaque `ring` key handle
//! - [`EcdsaAlgorithm`] — ECDSA (P-256/P-384, fixed-size signatures) over an
//!   opaque `ring` key handle
//!
//! Asymmetric variants are constructed either in *signing* mode (private key
//! pair, never exportable) or *verification* mode (public key material
//! only). The [`SignatureAlgorithmFactory`] maps
//! `(kind, hash, key material)` triples — including self-contained key ids —
//! to constructed algorithms.
//!
//! [`SignatureAlgorithm`]: sigstack_core::SignatureAlgorithm

pub mod digest;
mod ecdsa;
mod factory;
mod hmac;
mod pool;
mod rsa;

pub use ecdsa::EcdsaAlgorithm;
pub use factory::{KeyMaterial, SignatureAlgorithmFactory};
pub use hmac::HmacAlgorithm;
pub use pool::{Pool, PoolGuard};
pub use rsa::RsaAlgorithm;
