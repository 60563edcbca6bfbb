//! Error types for the signing pipeline.

use sigstack_core::{AlgorithmError, ValidationError};

/// Errors raised while signing a request.
#[derive(Debug, thiserror::Error)]
pub enum SigningError {
    /// The signing settings are structurally invalid. Raised before any
    /// request header is mutated.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The configured algorithm rejected the operation.
    #[error(transparent)]
    Algorithm(#[from] AlgorithmError),

    /// A composed header value is not a valid HTTP header value.
    #[error("invalid header value: {0}")]
    Header(String),
}
