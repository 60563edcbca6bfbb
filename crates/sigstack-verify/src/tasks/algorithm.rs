//! Algorithm-related verification tasks.

use async_trait::async_trait;

use sigstack_core::{HeaderName, SignatureAlgorithmKind, parse_algorithm_token};

use super::{VerificationContext, VerificationTask};
use crate::error::VerifierError;
use crate::failure::SignatureVerificationFailure;

/// Checks that the declared algorithm token is one this system supports.
///
/// A signature without a declared algorithm passes; the client's configured
/// algorithm is authoritative in that case.
pub(crate) struct KnownAlgorithmTask;

#[async_trait]
impl VerificationTask for KnownAlgorithmTask {
    fn name(&self) -> &'static str {
        "known_algorithm"
    }

    async fn verify(
        &self,
        ctx: &VerificationContext<'_>,
    ) -> Result<Option<SignatureVerificationFailure>, VerifierError> {
        let Some(ref token) = ctx.signature.algorithm else {
            return Ok(None);
        };

        match parse_algorithm_token(token) {
            Ok((name, _)) if name.parse::<SignatureAlgorithmKind>().is_ok() => Ok(None),
            _ => Ok(Some(
                SignatureVerificationFailure::invalid_signature_algorithm(format!(
                    "algorithm {token} is not supported"
                )),
            )),
        }
    }
}

/// Checks that the declared algorithm matches the client's configured one.
pub(crate) struct MatchingAlgorithmTask;

#[async_trait]
impl VerificationTask for MatchingAlgorithmTask {
    fn name(&self) -> &'static str {
        "matching_algorithm"
    }

    async fn verify(
        &self,
        ctx: &VerificationContext<'_>,
    ) -> Result<Option<SignatureVerificationFailure>, VerifierError> {
        let Some(ref token) = ctx.signature.algorithm else {
            return Ok(None);
        };
        let Ok((name, hash)) = parse_algorithm_token(token) else {
            // The known-algorithm task has already rejected unparsable
            // tokens; a second rejection here keeps the task independent.
            return Ok(Some(
                SignatureVerificationFailure::invalid_signature_algorithm(format!(
                    "algorithm {token} is not supported"
                )),
            ));
        };

        let configured = ctx.client.signature_algorithm();
        if name != configured.name() || hash != configured.hash_algorithm() {
            return Ok(Some(
                SignatureVerificationFailure::invalid_signature_algorithm(format!(
                    "algorithm {token} does not match the client configuration {}_{}",
                    configured.name(),
                    configured.hash_algorithm()
                )),
            ));
        }
        Ok(None)
    }
}

/// Guards the `(created)` pseudo-header against the algorithm capability.
///
/// Algorithms that carry their creation time in the signature metadata must
/// not additionally request the `(created)` pseudo-header; algorithms that
/// do not must request it.
pub(crate) struct CreatedPseudoHeaderGuardTask;

#[async_trait]
impl VerificationTask for CreatedPseudoHeaderGuardTask {
    fn name(&self) -> &'static str {
        "created_pseudo_header_guard"
    }

    async fn verify(
        &self,
        ctx: &VerificationContext<'_>,
    ) -> Result<Option<SignatureVerificationFailure>, VerifierError> {
        let algorithm = ctx.client.signature_algorithm();
        let listed = ctx.signature.headers.contains(&HeaderName::created());

        if algorithm.uses_timestamp_pseudo_headers() && !listed {
            return Ok(Some(SignatureVerificationFailure::invalid_created_header(
                format!(
                    "algorithm {} requires the (created) pseudo-header in the header list",
                    algorithm.name()
                ),
            )));
        }
        if !algorithm.uses_timestamp_pseudo_headers() && listed {
            return Ok(Some(SignatureVerificationFailure::invalid_created_header(
                format!(
                    "the (created) pseudo-header must not be present for algorithm {}",
                    algorithm.name()
                ),
            )));
        }
        Ok(None)
    }
}

/// Guards the `(expires)` pseudo-header; symmetric to the created guard.
pub(crate) struct ExpiresPseudoHeaderGuardTask;

#[async_trait]
impl VerificationTask for ExpiresPseudoHeaderGuardTask {
    fn name(&self) -> &'static str {
        "expires_pseudo_header_guard"
    }

    async fn verify(
        &self,
        ctx: &VerificationContext<'_>,
    ) -> Result<Option<SignatureVerificationFailure>, VerifierError> {
        let algorithm = ctx.client.signature_algorithm();
        let listed = ctx.signature.headers.contains(&HeaderName::expires());

        if algorithm.uses_timestamp_pseudo_headers() && !listed {
            return Ok(Some(SignatureVerificationFailure::invalid_expires_header(
                format!(
                    "algorithm {} requires the (expires) pseudo-header in the header list",
                    algorithm.name()
                ),
            )));
        }
        if !algorithm.uses_timestamp_pseudo_headers() && listed {
            return Ok(Some(SignatureVerificationFailure::invalid_expires_header(
                format!(
                    "the (expires) pseudo-header must not be present for algorithm {}",
                    algorithm.name()
                ),
            )));
        }
        Ok(None)
    }
}
