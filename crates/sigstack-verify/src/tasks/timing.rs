//! Clock validity verification.

use async_trait::async_trait;
use chrono::{Duration, Utc};

use super::{VerificationContext, VerificationTask};
use crate::error::VerifierError;
use crate::failure::SignatureVerificationFailure;

/// Convert the client's clock skew into a chrono duration, capped at one
/// year to stay within chrono's arithmetic range.
fn skew(ctx: &VerificationContext<'_>) -> Duration {
    let seconds = i64::try_from(ctx.client.clock_skew().as_secs())
        .unwrap_or(i64::MAX)
        .min(31_536_000);
    Duration::seconds(seconds)
}

/// Checks that the signature's creation time is not in the future beyond
/// the client's clock skew.
pub(crate) struct CreationTimeTask;

#[async_trait]
impl VerificationTask for CreationTimeTask {
    fn name(&self) -> &'static str {
        "creation_time"
    }

    async fn verify(
        &self,
        ctx: &VerificationContext<'_>,
    ) -> Result<Option<SignatureVerificationFailure>, VerifierError> {
        let Some(created) = ctx.signature.created else {
            return Ok(None);
        };

        if created > Utc::now() + skew(ctx) {
            return Ok(Some(SignatureVerificationFailure::invalid_created_header(
                format!("signature creation time {created} lies in the future"),
            )));
        }
        Ok(None)
    }
}

/// Checks that the signature has not expired, allowing for clock skew.
pub(crate) struct ExpirationTimeTask;

#[async_trait]
impl VerificationTask for ExpirationTimeTask {
    fn name(&self) -> &'static str {
        "expiration_time"
    }

    async fn verify(
        &self,
        ctx: &VerificationContext<'_>,
    ) -> Result<Option<SignatureVerificationFailure>, VerifierError> {
        let Some(expires) = ctx.signature.expires else {
            return Ok(None);
        };

        if expires + skew(ctx) < Utc::now() {
            return Ok(Some(SignatureVerificationFailure::signature_expired(
                format!("signature expired at {expires}"),
            )));
        }
        Ok(None)
    }
}
