//! Error types for storage collaborators.

/// Errors surfaced by client and nonce stores.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// The backing store failed (connection, timeout, corruption).
    #[error("store backend failure: {0}")]
    Backend(String),

    /// Stored secret material could not be unprotected (wrong encryption
    /// key or malformed ciphertext). Reported distinctly — never silently
    /// treated as "record absent".
    #[error("failed to unprotect stored secret material: {0}")]
    Security(String),
}

impl StoreError {
    /// Create a backend failure.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    /// Create a security failure.
    pub fn security(message: impl Into<String>) -> Self {
        Self::Security(message.into())
    }
}
