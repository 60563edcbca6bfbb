//! The verification orchestrator.

use std::sync::Arc;

use bytes::Bytes;
use tracing::debug;

use sigstack_core::{Signature, authorization};
use sigstack_store::{ClientStore, NonceStore};

use crate::error::VerifierError;
use crate::failure::SignatureVerificationFailure;
use crate::result::{VerificationResult, principal_for};
use crate::sanitize::sanitize;
use crate::tasks::{
    AllHeadersPresentTask, CreatedPseudoHeaderGuardTask, CreationTimeTask, DigestTask,
    ExpirationTimeTask, ExpiresPseudoHeaderGuardTask, KnownAlgorithmTask,
    MatchingAlgorithmTask, MatchingSignatureStringTask, NonceTask, VerificationContext,
    VerificationTask,
};

/// Verifies request signatures against registered clients.
///
/// The orchestrator owns the fixed-order task chain; see the crate docs for
/// the exact sequence. Construct one per verification endpoint and share it
/// freely — all state is behind `Arc`s.
pub struct VerificationOrchestrator {
    client_store: Arc<dyn ClientStore>,
    tasks: Vec<Box<dyn VerificationTask>>,
    scheme: String,
}

impl VerificationOrchestrator {
    /// Create an orchestrator with the default task chain and the
    /// `Signature` authorization scheme.
    #[must_use]
    pub fn new(client_store: Arc<dyn ClientStore>, nonce_store: Arc<dyn NonceStore>) -> Self {
        let tasks: Vec<Box<dyn VerificationTask>> = vec![
            Box::new(KnownAlgorithmTask),
            Box::new(MatchingAlgorithmTask),
            Box::new(CreatedPseudoHeaderGuardTask),
            Box::new(ExpiresPseudoHeaderGuardTask),
            Box::new(AllHeadersPresentTask),
            Box::new(CreationTimeTask),
            Box::new(ExpirationTimeTask),
            Box::new(NonceTask::new(nonce_store)),
            Box::new(DigestTask),
            Box::new(MatchingSignatureStringTask),
        ];
        Self {
            client_store,
            tasks,
            scheme: "Signature".to_owned(),
        }
    }

    /// Override the expected authorization scheme.
    #[must_use]
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Create an orchestrator with a custom task chain (tests).
    #[cfg(test)]
    pub(crate) fn with_tasks(
        client_store: Arc<dyn ClientStore>,
        tasks: Vec<Box<dyn VerificationTask>>,
    ) -> Self {
        Self {
            client_store,
            tasks,
            scheme: "Signature".to_owned(),
        }
    }

    /// Verify the signature of a request.
    ///
    /// Returns `Ok` with a [`VerificationResult`] for every modeled
    /// outcome; `Err` is reserved for unexpected collaborator faults.
    ///
    /// # Errors
    ///
    /// Propagates [`VerifierError`] for store I/O failures and unusable
    /// algorithm handles.
    pub async fn verify(
        &self,
        request: &http::Request<Bytes>,
    ) -> Result<VerificationResult, VerifierError> {
        let signature = match self.extract_signature(request) {
            Ok(signature) => signature,
            Err(failure) => {
                return Ok(VerificationResult::Failure {
                    client: None,
                    failure,
                });
            }
        };

        let Some(client) = self.client_store.get(&signature.key_id).await? else {
            return Ok(VerificationResult::Failure {
                client: None,
                failure: SignatureVerificationFailure::invalid_client(format!(
                    "no client is registered for key id {}",
                    signature.key_id
                )),
            });
        };

        let mut signature = signature;
        sanitize(&mut signature, &client);

        let ctx = VerificationContext {
            request,
            signature: &signature,
            client: &client,
        };

        for task in &self.tasks {
            if let Some(failure) = task.verify(&ctx).await? {
                debug!(
                    task = task.name(),
                    code = failure.code.as_str(),
                    key_id = %signature.key_id,
                    "verification failed"
                );
                return Ok(VerificationResult::Failure {
                    client: Some(client.clone()),
                    failure,
                });
            }
        }

        debug!(key_id = %signature.key_id, "verification succeeded");
        Ok(VerificationResult::Success {
            principal: principal_for(&client),
            client,
        })
    }

    /// Parse and structurally validate the request's signature.
    fn extract_signature(
        &self,
        request: &http::Request<Bytes>,
    ) -> Result<Signature, SignatureVerificationFailure> {
        let header = request
            .headers()
            .get(http::header::AUTHORIZATION)
            .ok_or_else(|| {
                SignatureVerificationFailure::invalid_signature(
                    "the request carries no Authorization header",
                )
            })?;
        let value = header.to_str().map_err(|_| {
            SignatureVerificationFailure::invalid_signature(
                "the Authorization header is not valid text",
            )
        })?;

        let (scheme, params) = authorization::split_authorization(value).ok_or_else(|| {
            SignatureVerificationFailure::invalid_signature(
                "the Authorization header has no parameter section",
            )
        })?;
        if scheme != self.scheme {
            return Err(SignatureVerificationFailure::invalid_signature(format!(
                "unexpected authorization scheme {scheme}"
            )));
        }

        let signature = authorization::parse_signature_params(params).map_err(|e| {
            SignatureVerificationFailure::invalid_signature("the signature parameter is malformed")
                .with_cause(e.to_string())
        })?;
        signature.validate().map_err(|e| {
            SignatureVerificationFailure::invalid_signature("the signature is structurally invalid")
                .with_cause(e.to_string())
        })?;
        Ok(signature)
    }
}

impl std::fmt::Debug for VerificationOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationOrchestrator")
            .field("scheme", &self.scheme)
            .field("tasks", &self.tasks.len())
            .finish_non_exhaustive()
    }
}
