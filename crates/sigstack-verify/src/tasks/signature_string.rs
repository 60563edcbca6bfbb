//! The final check: re-derive the signing string and verify the signature.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use tracing::debug;

use sigstack_core::compose_signing_string;

use super::{VerificationContext, VerificationTask};
use crate::error::VerifierError;
use crate::failure::SignatureVerificationFailure;

/// Recomputes the signing string with the client's escaping mode and the
/// signature's own header list and timestamps, then verifies the declared
/// signature bytes with the client's algorithm. Any mismatch is the final
/// authentication failure.
pub(crate) struct MatchingSignatureStringTask;

#[async_trait]
impl VerificationTask for MatchingSignatureStringTask {
    fn name(&self) -> &'static str {
        "matching_signature_string"
    }

    async fn verify(
        &self,
        ctx: &VerificationContext<'_>,
    ) -> Result<Option<SignatureVerificationFailure>, VerifierError> {
        let signing_string = compose_signing_string(
            ctx.request.method(),
            ctx.request.uri(),
            ctx.request.headers(),
            &ctx.signature.headers,
            ctx.signature.created,
            ctx.signature.expires,
            ctx.client.request_target_escaping(),
        );
        debug!(key_id = %ctx.signature.key_id, "re-derived signing string");

        let Ok(raw_signature) = BASE64.decode(&ctx.signature.signature) else {
            return Ok(Some(
                SignatureVerificationFailure::invalid_signature_string(
                    "the signature string is not valid base64",
                ),
            ));
        };

        // A mismatch is a modeled failure; an unusable algorithm handle is
        // an unexpected fault and propagates.
        if ctx
            .client
            .signature_algorithm()
            .verify(&signing_string, &raw_signature)?
        {
            Ok(None)
        } else {
            Ok(Some(
                SignatureVerificationFailure::invalid_signature_string(
                    "the signature does not match the derived signing string",
                ),
            ))
        }
    }
}
