//! Core types and canonicalization for sigstack HTTP message signing.
//!
//! This crate provides the building blocks shared by the signing and
//! verification sides of the protocol:
//!
//! - [`KeyId`], [`Secret`], [`HeaderName`] and the other immutable value types
//! - The [`Signature`], [`Client`] and [`Nonce`] protocol models
//! - The [`SignatureAlgorithm`] capability trait implemented by the crypto crate
//! - The canonical signing-string composer ([`compose_signing_string`])
//! - The `Authorization` header parameter codec ([`authorization`])
//!
//! The signing string is the canonical newline-joined text derived from a
//! request's method, target and headers. Both the signer and the verifier
//! derive it independently; byte-identical output for identical inputs is the
//! central contract of this crate.

mod algorithm;
pub mod authorization;
pub mod canonical;
mod client;
mod error;
mod escaping;
mod header;
mod nonce;
mod self_contained;
mod signature;
mod types;

pub use algorithm::{
    HashAlgorithm, SignatureAlgorithm, SignatureAlgorithmKind, algorithm_token,
    parse_algorithm_token,
};
pub use canonical::compose_signing_string;
pub use client::{Client, ClientOptions};
pub use error::{AlgorithmError, CoreError, ValidationError, Violation};
pub use escaping::{TargetEscaping, escape_target};
pub use header::HeaderName;
pub use nonce::Nonce;
pub use self_contained::SelfContainedKeyId;
pub use signature::Signature;
pub use types::{Claim, KeyId, Secret};
