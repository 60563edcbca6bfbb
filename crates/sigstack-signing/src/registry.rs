//! Explicit registry of per-key-id signing settings.

use std::sync::Arc;

use dashmap::DashMap;

use sigstack_core::KeyId;

use crate::settings::SigningSettings;
use crate::signer::RequestSigner;

/// Thread-safe registry mapping key ids to their [`SigningSettings`].
///
/// Construct one instance and pass it by reference to whatever creates
/// request signers; there is no process-global registration. A key id that
/// was never registered is a recoverable lookup miss, not an error.
#[derive(Debug, Default)]
pub struct SignerRegistry {
    inner: DashMap<KeyId, Arc<SigningSettings>>,
}

impl SignerRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: DashMap::new(),
        }
    }

    /// Register settings under their key id, replacing any previous entry.
    pub fn register(&self, settings: SigningSettings) {
        self.inner
            .insert(settings.key_id.clone(), Arc::new(settings));
    }

    /// Look up the settings registered for a key id.
    #[must_use]
    pub fn get(&self, key_id: &KeyId) -> Option<Arc<SigningSettings>> {
        self.inner.get(key_id).map(|entry| Arc::clone(&entry))
    }

    /// Build a signer for a registered key id.
    #[must_use]
    pub fn signer_for(&self, key_id: &KeyId) -> Option<RequestSigner> {
        self.get(key_id).map(RequestSigner::new)
    }

    /// Remove the settings registered for a key id.
    pub fn remove(&self, key_id: &KeyId) -> Option<Arc<SigningSettings>> {
        self.inner.remove(key_id).map(|(_, settings)| settings)
    }

    /// Number of registered key ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
