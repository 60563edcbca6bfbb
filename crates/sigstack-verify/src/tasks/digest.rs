//! Body digest verification.

use async_trait::async_trait;

use sigstack_core::HeaderName;
use sigstack_crypto::digest::verify_digest_header;

use super::{VerificationContext, VerificationTask};
use crate::error::VerifierError;
use crate::failure::SignatureVerificationFailure;

/// Recomputes the body hash when `digest` is part of the signed header
/// list and compares it against the declared `Digest` header value.
///
/// A mismatch and an unsupported or unknown digest algorithm are both
/// modeled failures, not errors.
pub(crate) struct DigestTask;

#[async_trait]
impl VerificationTask for DigestTask {
    fn name(&self) -> &'static str {
        "digest"
    }

    async fn verify(
        &self,
        ctx: &VerificationContext<'_>,
    ) -> Result<Option<SignatureVerificationFailure>, VerifierError> {
        if !ctx.signature.headers.contains(&HeaderName::digest()) {
            return Ok(None);
        }

        let Some(value) = ctx.request.headers().get("digest") else {
            return Ok(Some(SignatureVerificationFailure::invalid_digest_header(
                "the digest header is signed but missing from the request",
            )));
        };
        let Ok(value) = value.to_str() else {
            return Ok(Some(SignatureVerificationFailure::invalid_digest_header(
                "the digest header value is not valid text",
            )));
        };

        match verify_digest_header(value, ctx.request.body()) {
            Ok(true) => Ok(None),
            Ok(false) => Ok(Some(SignatureVerificationFailure::invalid_digest_header(
                "the digest header does not match the request body",
            ))),
            Err(e) => Ok(Some(
                SignatureVerificationFailure::invalid_digest_header(
                    "the digest algorithm was rejected",
                )
                .with_cause(e.to_string()),
            )),
        }
    }
}
