//! Error types for the sigstack core.

use std::fmt;

/// A single validation violation, reported as a `{property, message}` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Name of the offending property.
    pub property: &'static str,
    /// Human-readable description of the violation.
    pub message: String,
}

impl Violation {
    /// Create a new violation.
    pub fn new(property: &'static str, message: impl Into<String>) -> Self {
        Self {
            property,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.property, self.message)
    }
}

/// A composed object failed explicit validation.
///
/// Carries every violation found, not just the first one, so callers can
/// report all structural problems at once.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("validation failed: [{}]", .violations.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
pub struct ValidationError {
    /// The collected `{property, message}` pairs.
    pub violations: Vec<Violation>,
}

impl ValidationError {
    /// Wrap a list of violations. The list must be non-empty to be meaningful.
    #[must_use]
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    /// Convenience constructor for a single-violation failure.
    pub fn single(property: &'static str, message: impl Into<String>) -> Self {
        Self {
            violations: vec![Violation::new(property, message)],
        }
    }
}

/// Errors raised at call boundaries of the core types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// A null/empty required value was supplied to a constructor.
    #[error("invalid argument {property}: {message}")]
    Argument {
        /// Name of the offending parameter.
        property: &'static str,
        /// Description of what was expected.
        message: String,
    },

    /// A self-contained key id string does not match the
    /// `sig=..., hash=..., key=...` grammar.
    #[error("invalid self-contained key id: {0}")]
    KeyIdFormat(String),

    /// An `Authorization` header parameter could not be parsed.
    #[error("invalid authorization signature parameter: {0}")]
    AuthorizationFormat(String),
}

impl CoreError {
    /// Create an argument error for the named property.
    pub fn argument(property: &'static str, message: impl Into<String>) -> Self {
        Self::Argument {
            property,
            message: message.into(),
        }
    }
}

/// Errors raised by signature algorithm implementations.
///
/// `NotSupported` (a recognized but unimplemented algorithm or pairing) and
/// `Unknown` (an unrecognized token) are deliberately distinct failure kinds.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AlgorithmError {
    /// The algorithm or hash pairing is recognized but not implemented.
    #[error("algorithm not supported: {0}")]
    NotSupported(String),

    /// The algorithm token is not recognized at all.
    #[error("unknown algorithm: {0}")]
    Unknown(String),

    /// The supplied key material is empty or malformed.
    #[error("invalid key material: {0}")]
    InvalidKey(String),

    /// The algorithm handle has already been disposed.
    #[error("signature algorithm has been disposed")]
    Disposed,

    /// A signing operation was requested from a verification-only instance.
    #[error("instance holds only public key material and cannot compute signatures")]
    VerificationOnly,

    /// The underlying cryptographic operation failed.
    #[error("cryptographic operation failed: {0}")]
    Operation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_display_all_violations() {
        let err = ValidationError::new(vec![
            Violation::new("key_id", "cannot be empty".to_owned()),
            Violation::new("headers", "at least one header is required".to_owned()),
        ]);
        let rendered = err.to_string();
        assert!(rendered.contains("key_id: cannot be empty"));
        assert!(rendered.contains("headers: at least one header is required"));
    }

    #[test]
    fn test_should_distinguish_not_supported_from_unknown() {
        let not_supported = AlgorithmError::NotSupported("sha1".to_owned());
        let unknown = AlgorithmError::Unknown("md9".to_owned());
        assert_ne!(not_supported, unknown);
    }
}
