//! Client and nonce storage for sigstack HTTP message signing.
//!
//! The verification orchestrator consumes storage through the abstract
//! [`ClientStore`] and [`NonceStore`] contracts. Persistent backends live
//! outside this workspace; this crate ships the in-memory implementations
//! and the TTL [caching decorators](cache) that wrap any backend with
//! negative caching and resource-safe eviction.

mod cache;
mod error;
mod memory;

use async_trait::async_trait;

use sigstack_core::{Client, KeyId, Nonce};

pub use cache::{CachingClientStore, CachingNonceStore};
pub use error::StoreError;
pub use memory::{InMemoryClientStore, InMemoryNonceStore};

/// Storage contract for registered clients.
///
/// Registration upserts: registering the same id twice replaces the record.
#[async_trait]
pub trait ClientStore: Send + Sync {
    /// Register or replace a client record.
    async fn register(&self, client: Client) -> Result<(), StoreError>;

    /// Look up a client by key id. `None` is "not found", not an error.
    async fn get(&self, id: &KeyId) -> Result<Option<Client>, StoreError>;

    /// Release held resources, disposing every owned algorithm handle.
    async fn dispose(&self);
}

/// Storage contract for replay-prevention nonces.
///
/// Records are keyed by `(client_id, value)`; the most recently registered
/// expiration wins. A nonce that is found but already expired is still
/// returned as-is — expiry enforcement belongs to the verification task,
/// not the store.
#[async_trait]
pub trait NonceStore: Send + Sync {
    /// Register or replace a nonce record.
    async fn register(&self, nonce: Nonce) -> Result<(), StoreError>;

    /// Look up the most recently registered record for `(client_id, value)`.
    async fn get(&self, client_id: &KeyId, value: &str) -> Result<Option<Nonce>, StoreError>;

    /// Release held resources.
    async fn dispose(&self);
}
