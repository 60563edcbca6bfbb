//! Per-client signing configuration.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;

use sigstack_core::{
    HashAlgorithm, HeaderName, KeyId, Signature, SignatureAlgorithm, TargetEscaping,
    ValidationError, Violation,
};

/// Observer invoked before a request is signed.
pub type OnRequestSigning = dyn Fn(&http::Request<Bytes>) + Send + Sync;

/// Observer invoked after a request was signed.
pub type OnRequestSigned = dyn Fn(&http::Request<Bytes>, &Signature) + Send + Sync;

/// Extensibility hooks around the signing pipeline.
#[derive(Clone, Default)]
pub struct SigningEvents {
    /// Invoked after validation, before any header is ensured.
    pub on_request_signing: Option<Arc<OnRequestSigning>>,
    /// Invoked after the `Authorization` header was written.
    pub on_request_signed: Option<Arc<OnRequestSigned>>,
}

impl fmt::Debug for SigningEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningEvents")
            .field("on_request_signing", &self.on_request_signing.is_some())
            .field("on_request_signed", &self.on_request_signed.is_some())
            .finish()
    }
}

/// Settings governing how requests are signed for one key id.
///
/// The settings exclusively own their signature algorithm handle;
/// [`dispose`](Self::dispose) releases it exactly once.
#[derive(Clone)]
pub struct SigningSettings {
    /// The key id presented to the verifier.
    pub key_id: KeyId,
    /// The signing-capable algorithm.
    pub signature_algorithm: Arc<dyn SignatureAlgorithm>,
    /// Ordered list of header names to cover with the signature.
    pub headers: Vec<HeaderName>,
    /// Validity period; the signature expires this long after signing.
    pub expires: Duration,
    /// When set, a `Digest` header is ensured for body-bearing requests.
    pub digest_hash_algorithm: Option<HashAlgorithm>,
    /// Scheme written into the `Authorization` header.
    pub authorization_scheme: String,
    /// Whether a fresh nonce is attached to every signature.
    pub enable_nonce: bool,
    /// Whether missing recommended headers (`Date`, `Expires`, `Digest`)
    /// are injected before composing the signing string.
    pub automatically_add_recommended_headers: bool,
    /// How the request target is escaped in the signing string.
    pub request_target_escaping: TargetEscaping,
    /// Extensibility hooks.
    pub events: SigningEvents,
}

impl SigningSettings {
    /// Create settings with the recommended defaults: a
    /// `[(request-target), date]` header list, five-minute expiry, SHA-256
    /// body digests, nonces enabled and the `Signature` scheme.
    #[must_use]
    pub fn new(key_id: KeyId, signature_algorithm: Arc<dyn SignatureAlgorithm>) -> Self {
        Self {
            key_id,
            signature_algorithm,
            headers: vec![HeaderName::request_target(), HeaderName::date()],
            expires: Duration::from_secs(300),
            digest_hash_algorithm: Some(HashAlgorithm::Sha256),
            authorization_scheme: "Signature".to_owned(),
            enable_nonce: true,
            automatically_add_recommended_headers: true,
            request_target_escaping: TargetEscaping::default(),
            events: SigningEvents::default(),
        }
    }

    /// Validate the settings.
    ///
    /// # Errors
    ///
    /// Returns every violated `{property, message}` pair: empty key id,
    /// disposed algorithm, empty header list, non-positive expiry, empty
    /// scheme.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut violations = Vec::new();

        if self.key_id.is_empty() {
            violations.push(Violation::new("key_id", "key id cannot be empty"));
        }
        if self.signature_algorithm.is_disposed() {
            violations.push(Violation::new(
                "signature_algorithm",
                "signature algorithm has been disposed",
            ));
        }
        if self.headers.is_empty() {
            violations.push(Violation::new(
                "headers",
                "at least one header must be signed",
            ));
        }
        if self.expires.is_zero() {
            violations.push(Violation::new("expires", "expiry must be positive"));
        }
        if self.authorization_scheme.trim().is_empty() {
            violations.push(Violation::new(
                "authorization_scheme",
                "authorization scheme cannot be empty",
            ));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(violations))
        }
    }

    /// Release the owned signature algorithm handle. Idempotent.
    pub fn dispose(&self) {
        self.signature_algorithm.dispose();
    }
}

impl fmt::Debug for SigningSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningSettings")
            .field("key_id", &self.key_id)
            .field("algorithm", &self.signature_algorithm.name())
            .field("headers", &self.headers)
            .field("expires", &self.expires)
            .field("digest_hash_algorithm", &self.digest_hash_algorithm)
            .field("authorization_scheme", &self.authorization_scheme)
            .field("enable_nonce", &self.enable_nonce)
            .field(
                "automatically_add_recommended_headers",
                &self.automatically_add_recommended_headers,
            )
            .field("request_target_escaping", &self.request_target_escaping)
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigstack_core::Secret;
    use sigstack_crypto::HmacAlgorithm;

    fn settings() -> SigningSettings {
        let algorithm =
            Arc::new(HmacAlgorithm::new(&Secret::new("s3cr3t"), HashAlgorithm::Sha256).unwrap());
        SigningSettings::new(KeyId::new("client1"), algorithm)
    }

    #[test]
    fn test_should_accept_default_settings() {
        assert!(settings().validate().is_ok());
    }

    #[test]
    fn test_should_collect_violations() {
        let mut settings = settings();
        settings.key_id = KeyId::empty();
        settings.headers.clear();
        settings.expires = Duration::ZERO;
        settings.authorization_scheme = String::new();

        let err = settings.validate().unwrap_err();
        let properties: Vec<&str> = err.violations.iter().map(|v| v.property).collect();
        assert_eq!(
            properties,
            vec!["key_id", "headers", "expires", "authorization_scheme"]
        );
    }

    #[test]
    fn test_should_reject_disposed_algorithm() {
        let settings = settings();
        settings.signature_algorithm.dispose();
        let err = settings.validate().unwrap_err();
        assert_eq!(err.violations[0].property, "signature_algorithm");
    }
}
