//! Caching decorators in the verification path.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use crate::{hmac_client, hmac_signing_settings, init_tracing, post_request};
    use sigstack_core::KeyId;
    use sigstack_signing::RequestSigner;
    use sigstack_store::{
        CachingClientStore, CachingNonceStore, ClientStore, InMemoryClientStore,
        InMemoryNonceStore,
    };
    use sigstack_verify::VerificationOrchestrator;

    #[tokio::test]
    async fn test_should_verify_through_caching_stores() {
        init_tracing();
        let backing_clients = Arc::new(InMemoryClientStore::new());
        backing_clients.register(hmac_client()).await.unwrap();

        let clients = Arc::new(CachingClientStore::new(
            backing_clients,
            Duration::from_secs(60),
        ));
        let nonces = Arc::new(CachingNonceStore::new(
            Arc::new(InMemoryNonceStore::new()),
            Duration::from_secs(60),
        ));
        let orchestrator = VerificationOrchestrator::new(clients, nonces);

        let signer = RequestSigner::new(Arc::new(hmac_signing_settings()));
        let mut request = post_request(b"");
        signer.sign(&mut request).unwrap();

        let result = orchestrator.verify(&request).await.unwrap();
        assert!(result.is_success(), "got {:?}", result.failure());

        // A second, freshly signed request is served from the client cache.
        let mut second = post_request(b"");
        signer.sign(&mut second).unwrap();
        let result = orchestrator.verify(&second).await.unwrap();
        assert!(result.is_success(), "got {:?}", result.failure());
    }

    #[tokio::test]
    async fn test_should_dispose_evicted_client_exactly_once() {
        init_tracing();
        let backing = Arc::new(InMemoryClientStore::new());
        let store = CachingClientStore::new(
            Arc::clone(&backing) as Arc<dyn ClientStore>,
            Duration::from_secs(60),
        );

        let client = hmac_client();
        let algorithm = Arc::clone(client.signature_algorithm());
        store.register(client).await.unwrap();
        assert!(!algorithm.is_disposed());

        store.invalidate(&KeyId::new("client1")).await;
        store.run_pending().await;
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(algorithm.is_disposed());

        // A second eviction cycle must not fault on the already-released
        // handle.
        store.invalidate(&KeyId::new("client1")).await;
        store.run_pending().await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(algorithm.is_disposed());
    }
}
