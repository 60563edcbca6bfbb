//! Error type for unexpected verification faults.

use sigstack_core::AlgorithmError;
use sigstack_store::StoreError;

/// Unexpected faults raised during verification.
///
/// These are not part of the modeled failure taxonomy — they indicate a
/// misbehaving collaborator (store I/O failure, disposed algorithm handle)
/// and propagate to the caller instead of becoming a
/// [`Failure`](crate::VerificationResult::Failure) result.
#[derive(Debug, thiserror::Error)]
pub enum VerifierError {
    /// A client or nonce store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The client's algorithm handle was unusable.
    #[error(transparent)]
    Algorithm(#[from] AlgorithmError),
}
