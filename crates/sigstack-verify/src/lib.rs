//! Request signature verification for sigstack.
//!
//! The [`VerificationOrchestrator`] turns an incoming request plus a
//! registered client record into either an authenticated principal or a
//! typed failure:
//!
//! 1. Parse and structurally validate the `Authorization` signature.
//! 2. Resolve the client by key id through the [`ClientStore`].
//! 3. Sanitize the signature with client-dictated defaults.
//! 4. Run the fixed-order verification task chain, short-circuiting on the
//!    first failure: known algorithm, matching algorithm, created/expires
//!    pseudo-header guards, header presence, creation time, expiration,
//!    nonce replay, digest integrity, and finally the matching signing
//!    string.
//!
//! Expected verification outcomes are values
//! ([`VerificationResult`]/[`SignatureVerificationFailure`]); only
//! unexpected collaborator faults (store I/O, unusable algorithm handles)
//! propagate as errors.
//!
//! [`ClientStore`]: sigstack_store::ClientStore

mod error;
mod failure;
mod orchestrator;
mod result;
mod sanitize;
mod tasks;

pub use error::VerifierError;
pub use failure::{FailureCode, SignatureVerificationFailure};
pub use orchestrator::VerificationOrchestrator;
pub use result::{AUTHENTICATION_TYPE, Principal, VerificationResult, claim_types};
