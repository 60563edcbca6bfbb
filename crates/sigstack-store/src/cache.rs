//! TTL caching decorators for client and nonce stores.
//!
//! Both decorators apply the same policy:
//!
//! - `get`: a cache hit — including a cached "not found" marker — returns
//!   without consulting the backing store. A miss consults the backing
//!   store and caches the result, even when it is `None` (negative
//!   caching), so repeated lookups for nonexistent keys stay cheap.
//! - writes: write-through — the backing store first, then an unconditional
//!   cache insert.
//! - A zero TTL disables caching entirely for that instance: reads and
//!   writes go straight to the backing store and nothing is ever inserted.
//!
//! Evicting a client entry (TTL expiry or explicit invalidation) must
//! release that client's signature algorithm handle exactly once. The
//! release is dispatched through a channel to a background task rather than
//! run inside the eviction notification, which executes under the cache's
//! internal housekeeping.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use moka::notification::RemovalCause;
use tokio::sync::mpsc;
use tracing::debug;

use sigstack_core::{Client, KeyId, Nonce};

use crate::error::StoreError;
use crate::{ClientStore, NonceStore};

/// Cache keys are scope-qualified so entity kinds cannot collide even in a
/// shared cache namespace.
fn client_key(id: &KeyId) -> String {
    format!("client:{id}")
}

fn nonce_key(client_id: &KeyId, value: &str) -> String {
    format!("nonce:{client_id}:{value}")
}

/// TTL caching decorator around a [`ClientStore`].
///
/// Must be constructed within a Tokio runtime: eviction cleanup runs on a
/// spawned background task that ends when the decorator is dropped.
pub struct CachingClientStore {
    inner: Arc<dyn ClientStore>,
    cache: Option<Cache<String, Option<Client>>>,
}

impl CachingClientStore {
    /// Wrap a backing store with the given entry TTL.
    ///
    /// A zero `ttl` disables caching: every call goes straight through.
    #[must_use]
    pub fn new(inner: Arc<dyn ClientStore>, ttl: Duration) -> Self {
        if ttl.is_zero() {
            return Self { inner, cache: None };
        }

        let (dispose_tx, mut dispose_rx) = mpsc::unbounded_channel::<Client>();
        tokio::spawn(async move {
            while let Some(client) = dispose_rx.recv().await {
                debug!(client_id = %client.id(), "disposing evicted client");
                client.dispose();
            }
        });

        let cache = Cache::builder()
            .time_to_live(ttl)
            .eviction_listener(move |_key, value: Option<Client>, cause| {
                // Replaced entries keep their algorithm alive: the fresh
                // record may share the same handle.
                if matches!(
                    cause,
                    RemovalCause::Expired | RemovalCause::Explicit | RemovalCause::Size
                ) && let Some(client) = value
                {
                    let _ = dispose_tx.send(client);
                }
            })
            .build();

        Self {
            inner,
            cache: Some(cache),
        }
    }

    /// Evict a client entry, releasing its algorithm handle.
    pub async fn invalidate(&self, id: &KeyId) {
        if let Some(cache) = &self.cache {
            cache.invalidate(&client_key(id)).await;
        }
    }

    /// Number of cached entries, including negative markers.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.as_ref().map_or(0, Cache::entry_count)
    }

    /// Flush pending cache maintenance (eviction notifications, counts).
    pub async fn run_pending(&self) {
        if let Some(cache) = &self.cache {
            cache.run_pending_tasks().await;
        }
    }
}

#[async_trait]
impl ClientStore for CachingClientStore {
    async fn register(&self, client: Client) -> Result<(), StoreError> {
        self.inner.register(client.clone()).await?;
        if let Some(cache) = &self.cache {
            cache.insert(client_key(client.id()), Some(client)).await;
        }
        Ok(())
    }

    async fn get(&self, id: &KeyId) -> Result<Option<Client>, StoreError> {
        let Some(cache) = &self.cache else {
            return self.inner.get(id).await;
        };

        let key = client_key(id);
        if let Some(entry) = cache.get(&key).await {
            debug!(client_id = %id, negative = entry.is_none(), "client cache hit");
            return Ok(entry);
        }

        let result = self.inner.get(id).await?;
        cache.insert(key, result.clone()).await;
        Ok(result)
    }

    async fn dispose(&self) {
        self.inner.dispose().await;
        if let Some(cache) = &self.cache {
            cache.invalidate_all();
        }
    }
}

impl std::fmt::Debug for CachingClientStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachingClientStore")
            .field("caching", &self.cache.is_some())
            .field("entries", &self.entry_count())
            .finish_non_exhaustive()
    }
}

/// TTL caching decorator around a [`NonceStore`].
pub struct CachingNonceStore {
    inner: Arc<dyn NonceStore>,
    cache: Option<Cache<String, Option<Nonce>>>,
}

impl CachingNonceStore {
    /// Wrap a backing store with the given entry TTL.
    ///
    /// A zero `ttl` disables caching: every call goes straight through.
    #[must_use]
    pub fn new(inner: Arc<dyn NonceStore>, ttl: Duration) -> Self {
        let cache = (!ttl.is_zero()).then(|| Cache::builder().time_to_live(ttl).build());
        Self { inner, cache }
    }

    /// Number of cached entries, including negative markers.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.as_ref().map_or(0, Cache::entry_count)
    }

    /// Flush pending cache maintenance.
    pub async fn run_pending(&self) {
        if let Some(cache) = &self.cache {
            cache.run_pending_tasks().await;
        }
    }
}

#[async_trait]
impl NonceStore for CachingNonceStore {
    async fn register(&self, nonce: Nonce) -> Result<(), StoreError> {
        self.inner.register(nonce.clone()).await?;
        if let Some(cache) = &self.cache {
            cache
                .insert(nonce_key(&nonce.client_id, &nonce.value), Some(nonce))
                .await;
        }
        Ok(())
    }

    async fn get(&self, client_id: &KeyId, value: &str) -> Result<Option<Nonce>, StoreError> {
        let Some(cache) = &self.cache else {
            return self.inner.get(client_id, value).await;
        };

        let key = nonce_key(client_id, value);
        if let Some(entry) = cache.get(&key).await {
            debug!(client_id = %client_id, negative = entry.is_none(), "nonce cache hit");
            return Ok(entry);
        }

        let result = self.inner.get(client_id, value).await?;
        cache.insert(key, result.clone()).await;
        Ok(result)
    }

    async fn dispose(&self) {
        self.inner.dispose().await;
        if let Some(cache) = &self.cache {
            cache.invalidate_all();
        }
    }
}

impl std::fmt::Debug for CachingNonceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachingNonceStore")
            .field("caching", &self.cache.is_some())
            .field("entries", &self.entry_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::Utc;

    use super::*;
    use crate::memory::{InMemoryClientStore, InMemoryNonceStore};
    use sigstack_core::{ClientOptions, HashAlgorithm, Secret, SignatureAlgorithm};
    use sigstack_crypto::HmacAlgorithm;

    /// Counts backing-store lookups so tests can assert cache behavior.
    #[derive(Default)]
    struct CountingClientStore {
        inner: InMemoryClientStore,
        gets: AtomicUsize,
    }

    #[async_trait]
    impl ClientStore for CountingClientStore {
        async fn register(&self, client: Client) -> Result<(), StoreError> {
            self.inner.register(client).await
        }

        async fn get(&self, id: &KeyId) -> Result<Option<Client>, StoreError> {
            self.gets.fetch_add(1, Ordering::SeqCst);
            self.inner.get(id).await
        }

        async fn dispose(&self) {
            self.inner.dispose().await;
        }
    }

    fn client(id: &str) -> (Client, Arc<dyn SignatureAlgorithm>) {
        let algorithm: Arc<dyn SignatureAlgorithm> =
            Arc::new(HmacAlgorithm::new(&Secret::new("s3cr3t"), HashAlgorithm::Sha256).unwrap());
        let client = Client::create(
            KeyId::new(id),
            id,
            Arc::clone(&algorithm),
            ClientOptions::default(),
        )
        .unwrap();
        (client, algorithm)
    }

    #[tokio::test]
    async fn test_should_cache_negative_lookups() {
        let backing = Arc::new(CountingClientStore::default());
        let store = CachingClientStore::new(
            Arc::clone(&backing) as Arc<dyn ClientStore>,
            Duration::from_secs(60),
        );

        assert!(store.get(&KeyId::new("ghost")).await.unwrap().is_none());
        assert!(store.get(&KeyId::new("ghost")).await.unwrap().is_none());

        assert_eq!(
            backing.gets.load(Ordering::SeqCst),
            1,
            "second lookup must be served by the negative cache entry"
        );
    }

    #[tokio::test]
    async fn test_should_serve_reads_from_cache_after_write_through() {
        let backing = Arc::new(CountingClientStore::default());
        let store = CachingClientStore::new(
            Arc::clone(&backing) as Arc<dyn ClientStore>,
            Duration::from_secs(60),
        );

        let (record, _) = client("client1");
        store.register(record).await.unwrap();

        assert!(store.get(&KeyId::new("client1")).await.unwrap().is_some());
        assert_eq!(backing.gets.load(Ordering::SeqCst), 0);
        // The write went through to the backing store.
        assert_eq!(backing.inner.len(), 1);
    }

    #[tokio::test]
    async fn test_should_bypass_cache_entirely_with_zero_ttl() {
        let backing = Arc::new(CountingClientStore::default());
        let store = CachingClientStore::new(
            Arc::clone(&backing) as Arc<dyn ClientStore>,
            Duration::ZERO,
        );

        let (record, _) = client("client1");
        store.register(record).await.unwrap();
        let _ = store.get(&KeyId::new("client1")).await.unwrap();
        let _ = store.get(&KeyId::new("client1")).await.unwrap();

        assert_eq!(backing.gets.load(Ordering::SeqCst), 2);
        assert_eq!(store.entry_count(), 0);
    }

    #[tokio::test]
    async fn test_should_dispose_algorithm_exactly_once_on_explicit_invalidation() {
        let backing = Arc::new(InMemoryClientStore::new());
        let store = CachingClientStore::new(
            Arc::clone(&backing) as Arc<dyn ClientStore>,
            Duration::from_secs(60),
        );

        let (record, algorithm) = client("client1");
        store.register(record).await.unwrap();

        store.invalidate(&KeyId::new("client1")).await;
        store.run_pending().await;

        // The release is dispatched to a background task.
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(algorithm.is_disposed());
    }

    #[tokio::test]
    async fn test_should_dispose_algorithm_on_ttl_expiry() {
        let backing = Arc::new(InMemoryClientStore::new());
        let store = CachingClientStore::new(
            Arc::clone(&backing) as Arc<dyn ClientStore>,
            Duration::from_millis(50),
        );

        let (record, algorithm) = client("client1");
        store.register(record).await.unwrap();

        tokio::time::sleep(Duration::from_millis(150)).await;
        store.run_pending().await;
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(algorithm.is_disposed());
    }

    #[tokio::test]
    async fn test_should_cache_nonce_lookups_with_negative_entries() {
        let backing = Arc::new(InMemoryNonceStore::new());
        let store = CachingNonceStore::new(
            Arc::clone(&backing) as Arc<dyn NonceStore>,
            Duration::from_secs(60),
        );

        assert!(
            store
                .get(&KeyId::new("client1"), "abc123")
                .await
                .unwrap()
                .is_none()
        );
        store.run_pending().await;
        assert_eq!(store.entry_count(), 1, "negative entry is cached");

        let nonce = Nonce::new(
            KeyId::new("client1"),
            "abc123",
            Utc::now() + chrono::Duration::seconds(30),
        )
        .unwrap();
        store.register(nonce.clone()).await.unwrap();

        let found = store
            .get(&KeyId::new("client1"), "abc123")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found, nonce);
        assert_eq!(backing.len(), 1, "write went through");
    }

    #[tokio::test]
    async fn test_should_scope_cache_keys_by_entity_kind() {
        assert_ne!(
            client_key(&KeyId::new("a")),
            nonce_key(&KeyId::new("a"), "")
        );
        assert!(client_key(&KeyId::new("a")).starts_with("client:"));
        assert!(nonce_key(&KeyId::new("a"), "n").starts_with("nonce:"));
    }
}
