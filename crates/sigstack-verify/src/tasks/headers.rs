//! Header presence verification.

use async_trait::async_trait;

use sigstack_core::HeaderName;

use super::{VerificationContext, VerificationTask};
use crate::error::VerifierError;
use crate::failure::SignatureVerificationFailure;

/// Checks that every header declared in the signed header list is
/// resolvable on the request.
///
/// `(request-target)` always resolves; `(created)`/`(expires)` resolve when
/// the corresponding signature parameter is present; real headers must
/// exist on the request.
pub(crate) struct AllHeadersPresentTask;

#[async_trait]
impl VerificationTask for AllHeadersPresentTask {
    fn name(&self) -> &'static str {
        "all_headers_present"
    }

    async fn verify(
        &self,
        ctx: &VerificationContext<'_>,
    ) -> Result<Option<SignatureVerificationFailure>, VerifierError> {
        for name in &ctx.signature.headers {
            if *name == HeaderName::request_target() {
                continue;
            }
            if *name == HeaderName::created() {
                if ctx.signature.created.is_none() {
                    return Ok(Some(SignatureVerificationFailure::header_missing(
                        "the (created) pseudo-header is declared but the signature has no created timestamp",
                    )));
                }
                continue;
            }
            if *name == HeaderName::expires() {
                if ctx.signature.expires.is_none() {
                    return Ok(Some(SignatureVerificationFailure::header_missing(
                        "the (expires) pseudo-header is declared but the signature has no expires timestamp",
                    )));
                }
                continue;
            }

            let resolvable = http::header::HeaderName::from_bytes(name.as_str().as_bytes())
                .is_ok_and(|header| ctx.request.headers().contains_key(&header));
            if !resolvable {
                return Ok(Some(SignatureVerificationFailure::header_missing(
                    format!("header {name} is declared in the signature but missing from the request"),
                )));
            }
        }
        Ok(None)
    }
}
