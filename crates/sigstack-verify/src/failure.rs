//! The closed taxonomy of verification failures.
//!
//! Failures are data, not exceptions: each verification task produces at
//! most one of these, and the orchestrator converts it into a
//! [`Failure`](crate::VerificationResult::Failure) result.

use std::fmt;

/// Stable failure codes, one per verification concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureCode {
    /// No client is registered for the presented key id.
    InvalidClient,
    /// The signature is missing or structurally invalid.
    InvalidSignature,
    /// The declared algorithm is unsupported or does not match the client.
    InvalidSignatureAlgorithm,
    /// A header declared in the signed header list is not on the request.
    HeaderMissing,
    /// The `(created)` pseudo-header or creation timestamp is invalid.
    InvalidCreatedHeader,
    /// The `(expires)` pseudo-header usage is invalid.
    InvalidExpiresHeader,
    /// The `Digest` header is missing, malformed, or does not match the body.
    InvalidDigestHeader,
    /// The signature is past its expiration, beyond the allowed clock skew.
    SignatureExpired,
    /// The nonce was already used within its lifetime.
    ReplayedRequest,
    /// The recomputed signing string does not validate the signature.
    InvalidSignatureString,
}

impl FailureCode {
    /// The wire-stable code string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidClient => "INVALID_CLIENT",
            Self::InvalidSignature => "INVALID_SIGNATURE",
            Self::InvalidSignatureAlgorithm => "INVALID_SIGNATURE_ALGORITHM",
            Self::HeaderMissing => "HEADER_MISSING",
            Self::InvalidCreatedHeader => "INVALID_CREATED_HEADER",
            Self::InvalidExpiresHeader => "INVALID_EXPIRES_HEADER",
            Self::InvalidDigestHeader => "INVALID_DIGEST_HEADER",
            Self::SignatureExpired => "SIGNATURE_EXPIRED",
            Self::ReplayedRequest => "REPLAYED_REQUEST",
            Self::InvalidSignatureString => "INVALID_SIGNATURE_STRING",
        }
    }
}

impl fmt::Display for FailureCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A verification failure: a code, a human-readable message, and an
/// optional underlying cause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureVerificationFailure {
    /// The failure code.
    pub code: FailureCode,
    /// Human-readable description.
    pub message: String,
    /// Underlying cause, when one exists.
    pub cause: Option<String>,
}

impl SignatureVerificationFailure {
    /// Create a failure with the given code and message.
    pub fn new(code: FailureCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            cause: None,
        }
    }

    /// Attach an underlying cause.
    #[must_use]
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// `INVALID_CLIENT` failure.
    pub fn invalid_client(message: impl Into<String>) -> Self {
        Self::new(FailureCode::InvalidClient, message)
    }

    /// `INVALID_SIGNATURE` failure.
    pub fn invalid_signature(message: impl Into<String>) -> Self {
        Self::new(FailureCode::InvalidSignature, message)
    }

    /// `INVALID_SIGNATURE_ALGORITHM` failure.
    pub fn invalid_signature_algorithm(message: impl Into<String>) -> Self {
        Self::new(FailureCode::InvalidSignatureAlgorithm, message)
    }

    /// `HEADER_MISSING` failure.
    pub fn header_missing(message: impl Into<String>) -> Self {
        Self::new(FailureCode::HeaderMissing, message)
    }

    /// `INVALID_CREATED_HEADER` failure.
    pub fn invalid_created_header(message: impl Into<String>) -> Self {
        Self::new(FailureCode::InvalidCreatedHeader, message)
    }

    /// `INVALID_EXPIRES_HEADER` failure.
    pub fn invalid_expires_header(message: impl Into<String>) -> Self {
        Self::new(FailureCode::InvalidExpiresHeader, message)
    }

    /// `INVALID_DIGEST_HEADER` failure.
    pub fn invalid_digest_header(message: impl Into<String>) -> Self {
        Self::new(FailureCode::InvalidDigestHeader, message)
    }

    /// `SIGNATURE_EXPIRED` failure.
    pub fn signature_expired(message: impl Into<String>) -> Self {
        Self::new(FailureCode::SignatureExpired, message)
    }

    /// `REPLAYED_REQUEST` failure.
    pub fn replayed_request(message: impl Into<String>) -> Self {
        Self::new(FailureCode::ReplayedRequest, message)
    }

    /// `INVALID_SIGNATURE_STRING` failure.
    pub fn invalid_signature_string(message: impl Into<String>) -> Self {
        Self::new(FailureCode::InvalidSignatureString, message)
    }
}

impl fmt::Display for SignatureVerificationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)?;
        if let Some(ref cause) = self.cause {
            write!(f, " (cause: {cause})")?;
        }
        Ok(())
    }
}
