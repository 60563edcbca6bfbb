//! The request signing pipeline.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use http::HeaderValue;
use tracing::debug;

use sigstack_core::{
    Signature, ValidationError, algorithm_token, authorization::serialize_signature_params,
    compose_signing_string,
};

use crate::ensure::{ensure_date, ensure_digest, ensure_expires};
use crate::error::SigningError;
use crate::settings::SigningSettings;

/// Signs outgoing requests according to a set of [`SigningSettings`].
#[derive(Debug, Clone)]
pub struct RequestSigner {
    settings: Arc<SigningSettings>,
}

impl RequestSigner {
    /// Create a signer for the given settings.
    #[must_use]
    pub fn new(settings: Arc<SigningSettings>) -> Self {
        Self { settings }
    }

    /// The settings this signer was built from.
    #[must_use]
    pub fn settings(&self) -> &SigningSettings {
        &self.settings
    }

    /// Sign the request at the current instant.
    ///
    /// # Errors
    ///
    /// See [`sign_at`](Self::sign_at).
    pub fn sign(&self, request: &mut http::Request<Bytes>) -> Result<Signature, SigningError> {
        self.sign_at(request, Utc::now())
    }

    /// Sign the request as of the given instant, writing the
    /// `Authorization` header and returning the signature that was applied.
    ///
    /// Invalid settings abort before the request is touched. Header
    /// ensurers are idempotent and never overwrite existing values; a
    /// mid-pipeline failure (e.g. an unsupported digest algorithm) leaves
    /// already-ensured headers in place.
    ///
    /// # Errors
    ///
    /// - [`SigningError::Validation`] for structurally invalid settings;
    /// - [`SigningError::Algorithm`] for algorithm-level failures.
    pub fn sign_at(
        &self,
        request: &mut http::Request<Bytes>,
        now: DateTime<Utc>,
    ) -> Result<Signature, SigningError> {
        let settings = &self.settings;
        settings.validate()?;

        if let Some(hook) = &settings.events.on_request_signing {
            hook(request);
        }

        let created = now;
        let expires = created
            + chrono::Duration::from_std(settings.expires).map_err(|_| {
                ValidationError::single("expires", "expiry duration is out of range")
            })?;

        if settings.automatically_add_recommended_headers {
            ensure_date(request, &settings.headers, created);
            ensure_expires(request, &settings.headers, expires);
            ensure_digest(request, settings.digest_hash_algorithm)?;
        }

        let algorithm = &settings.signature_algorithm;
        let mut signature = Signature {
            key_id: settings.key_id.clone(),
            algorithm: Some(algorithm_token(
                algorithm.name(),
                algorithm.hash_algorithm(),
            )),
            created: Some(created),
            expires: Some(expires),
            headers: settings.headers.clone(),
            signature: String::new(),
            nonce: settings
                .enable_nonce
                .then(|| uuid::Uuid::new_v4().to_string()),
        };

        let signing_string = compose_signing_string(
            request.method(),
            request.uri(),
            request.headers(),
            &signature.headers,
            signature.created,
            signature.expires,
            settings.request_target_escaping,
        );

        let hash = algorithm.compute_hash(&signing_string)?;
        signature.signature = BASE64.encode(hash);

        let header_value = format!(
            "{} {}",
            settings.authorization_scheme,
            serialize_signature_params(&signature)
        );
        let header_value =
            HeaderValue::from_str(&header_value).map_err(|e| SigningError::Header(e.to_string()))?;
        request
            .headers_mut()
            .insert(http::header::AUTHORIZATION, header_value);

        debug!(
            key_id = %signature.key_id,
            algorithm = signature.algorithm.as_deref().unwrap_or(""),
            "signed request"
        );

        if let Some(hook) = &settings.events.on_request_signed {
            hook(request, &signature);
        }

        Ok(signature)
    }
}
