//! In-memory store implementations.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use tracing::debug;

use sigstack_core::{Client, KeyId, Nonce};

use crate::error::StoreError;
use crate::{ClientStore, NonceStore};

/// In-memory [`ClientStore`] backed by a concurrent map.
///
/// Suitable for tests and single-process deployments; production setups
/// implement [`ClientStore`] over a persistent backend.
#[derive(Debug, Default)]
pub struct InMemoryClientStore {
    inner: DashMap<KeyId, Client>,
}

impl InMemoryClientStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: DashMap::new(),
        }
    }

    /// Number of registered clients.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[async_trait]
impl ClientStore for InMemoryClientStore {
    async fn register(&self, client: Client) -> Result<(), StoreError> {
        debug!(client_id = %client.id(), "registering client");
        self.inner.insert(client.id().clone(), client);
        Ok(())
    }

    async fn get(&self, id: &KeyId) -> Result<Option<Client>, StoreError> {
        Ok(self.inner.get(id).map(|entry| entry.clone()))
    }

    async fn dispose(&self) {
        // Removing a client from the store is a lifecycle end: the owned
        // algorithm handle is released (idempotently) for each record.
        for entry in self.inner.iter() {
            entry.value().dispose();
        }
        self.inner.clear();
    }
}

/// In-memory [`NonceStore`] keyed by `(client_id, value)`.
///
/// Registration is last-write-wins on the expiration. Expired entries are
/// returned as-is by `get`; [`purge_expired`](Self::purge_expired) offers
/// lazy cleanup without changing those observable semantics beforehand.
#[derive(Debug, Default)]
pub struct InMemoryNonceStore {
    inner: DashMap<(KeyId, String), Nonce>,
}

impl InMemoryNonceStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: DashMap::new(),
        }
    }

    /// Drop entries whose expiration has passed.
    pub fn purge_expired(&self) {
        let now = Utc::now();
        self.inner.retain(|_, nonce| !nonce.is_expired_at(now));
    }

    /// Number of tracked nonces, including expired ones not yet purged.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[async_trait]
impl NonceStore for InMemoryNonceStore {
    async fn register(&self, nonce: Nonce) -> Result<(), StoreError> {
        debug!(client_id = %nonce.client_id, value = %nonce.value, "registering nonce");
        self.inner
            .insert((nonce.client_id.clone(), nonce.value.clone()), nonce);
        Ok(())
    }

    async fn get(&self, client_id: &KeyId, value: &str) -> Result<Option<Nonce>, StoreError> {
        Ok(self
            .inner
            .get(&(client_id.clone(), value.to_owned()))
            .map(|entry| entry.clone()))
    }

    async fn dispose(&self) {
        self.inner.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use sigstack_core::{ClientOptions, HashAlgorithm, Secret};
    use sigstack_crypto::HmacAlgorithm;

    fn client(id: &str) -> Client {
        let algorithm =
            Arc::new(HmacAlgorithm::new(&Secret::new("s3cr3t"), HashAlgorithm::Sha256).unwrap());
        Client::create(KeyId::new(id), id, algorithm, ClientOptions::default()).unwrap()
    }

    #[tokio::test]
    async fn test_should_upsert_client_registration() {
        let store = InMemoryClientStore::new();
        store.register(client("client1")).await.unwrap();
        store.register(client("client1")).await.unwrap();

        assert_eq!(store.len(), 1);
        assert!(store.get(&KeyId::new("client1")).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_should_return_none_for_unknown_client() {
        let store = InMemoryClientStore::new();
        assert!(store.get(&KeyId::new("ghost")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_should_dispose_clients_on_store_dispose() {
        let store = InMemoryClientStore::new();
        let record = client("client1");
        let algorithm = Arc::clone(record.signature_algorithm());
        store.register(record).await.unwrap();

        store.dispose().await;

        assert!(store.is_empty());
        assert!(algorithm.is_disposed());
    }

    #[tokio::test]
    async fn test_should_keep_latest_expiration_for_duplicate_nonce() {
        let store = InMemoryNonceStore::new();
        let first = Nonce::new(
            KeyId::new("client1"),
            "abc123",
            Utc::now() + chrono::Duration::seconds(30),
        )
        .unwrap();
        let second = Nonce::new(
            KeyId::new("client1"),
            "abc123",
            Utc::now() + chrono::Duration::seconds(90),
        )
        .unwrap();

        store.register(first).await.unwrap();
        store.register(second.clone()).await.unwrap();

        let found = store
            .get(&KeyId::new("client1"), "abc123")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.expires_at, second.expires_at);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_should_return_expired_nonce_as_is() {
        let store = InMemoryNonceStore::new();
        let expired = Nonce::new(
            KeyId::new("client1"),
            "abc123",
            Utc::now() - chrono::Duration::seconds(30),
        )
        .unwrap();
        store.register(expired.clone()).await.unwrap();

        let found = store
            .get(&KeyId::new("client1"), "abc123")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found, expired);
    }

    #[tokio::test]
    async fn test_should_purge_only_expired_nonces() {
        let store = InMemoryNonceStore::new();
        store
            .register(
                Nonce::new(
                    KeyId::new("client1"),
                    "old",
                    Utc::now() - chrono::Duration::seconds(30),
                )
                .unwrap(),
            )
            .await
            .unwrap();
        store
            .register(
                Nonce::new(
                    KeyId::new("client1"),
                    "fresh",
                    Utc::now() + chrono::Duration::seconds(30),
                )
                .unwrap(),
            )
            .await
            .unwrap();

        store.purge_expired();

        assert!(store.get(&KeyId::new("client1"), "old").await.unwrap().is_none());
        assert!(
            store
                .get(&KeyId::new("client1"), "fresh")
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_should_scope_nonces_by_client() {
        let store = InMemoryNonceStore::new();
        store
            .register(
                Nonce::new(
                    KeyId::new("client1"),
                    "abc123",
                    Utc::now() + chrono::Duration::seconds(30),
                )
                .unwrap(),
            )
            .await
            .unwrap();

        assert!(
            store
                .get(&KeyId::new("client2"), "abc123")
                .await
                .unwrap()
                .is_none()
        );
    }
}
