//! The ordered verification task chain.
//!
//! Each task is one independent, fail-fast check. Tasks run strictly
//! sequentially in the order the orchestrator assembles them; once a task
//! produces a failure, no later task executes.

mod algorithm;
mod digest;
mod headers;
mod nonce;
mod signature_string;
mod timing;

use async_trait::async_trait;
use bytes::Bytes;

use sigstack_core::{Client, Signature};

use crate::error::VerifierError;
use crate::failure::SignatureVerificationFailure;

pub(crate) use algorithm::{
    CreatedPseudoHeaderGuardTask, ExpiresPseudoHeaderGuardTask, KnownAlgorithmTask,
    MatchingAlgorithmTask,
};
pub(crate) use digest::DigestTask;
pub(crate) use headers::AllHeadersPresentTask;
pub(crate) use nonce::NonceTask;
pub(crate) use signature_string::MatchingSignatureStringTask;
pub(crate) use timing::{CreationTimeTask, ExpirationTimeTask};

/// Everything a verification task may inspect.
pub(crate) struct VerificationContext<'a> {
    /// The incoming request, body included.
    pub request: &'a http::Request<Bytes>,
    /// The sanitized signature under verification.
    pub signature: &'a Signature,
    /// The resolved client.
    pub client: &'a Client,
}

/// One check in the verification chain.
///
/// `Ok(None)` passes; `Ok(Some(failure))` stops the chain with that
/// failure; `Err` propagates an unexpected collaborator fault.
#[async_trait]
pub(crate) trait VerificationTask: Send + Sync {
    /// Task name for diagnostics.
    fn name(&self) -> &'static str;

    /// Run the check.
    async fn verify(
        &self,
        ctx: &VerificationContext<'_>,
    ) -> Result<Option<SignatureVerificationFailure>, VerifierError>;
}
