//! Nonce replay verification.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tracing::debug;

use sigstack_core::Nonce;
use sigstack_store::NonceStore;

use super::{VerificationContext, VerificationTask};
use crate::error::VerifierError;
use crate::failure::SignatureVerificationFailure;

/// Replay detection keyed by `(client id, nonce value)`.
///
/// An absent nonce value passes without consulting the store. A first use
/// is registered with the client's nonce lifetime. A value found unexpired
/// is a replay. A value found expired is available for reuse and is
/// registered anew — the store keeps expired records around until cleanup,
/// and rejecting them would make replay outcomes depend on cleanup timing.
pub(crate) struct NonceTask {
    store: Arc<dyn NonceStore>,
}

impl NonceTask {
    pub(crate) fn new(store: Arc<dyn NonceStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl VerificationTask for NonceTask {
    fn name(&self) -> &'static str {
        "nonce"
    }

    async fn verify(
        &self,
        ctx: &VerificationContext<'_>,
    ) -> Result<Option<SignatureVerificationFailure>, VerifierError> {
        let Some(ref value) = ctx.signature.nonce else {
            return Ok(None);
        };
        if value.is_empty() {
            return Ok(None);
        }

        let now = Utc::now();
        if let Some(existing) = self.store.get(ctx.client.id(), value).await? {
            if !existing.is_expired_at(now) {
                return Ok(Some(SignatureVerificationFailure::replayed_request(
                    format!("nonce {value} was already used within its lifetime"),
                )));
            }
            debug!(client_id = %ctx.client.id(), value = %value, "expired nonce reused");
        }

        let lifetime_seconds = i64::try_from(ctx.client.nonce_lifetime().as_secs())
            .unwrap_or(i64::MAX)
            .min(31_536_000);
        let lifetime = Duration::seconds(lifetime_seconds);
        let nonce = Nonce {
            client_id: ctx.client.id().clone(),
            value: value.clone(),
            expires_at: now + lifetime,
        };
        self.store.register(nonce).await?;
        Ok(None)
    }
}
