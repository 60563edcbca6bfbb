//! Sign-then-verify round trips.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        ecdsa_fixtures, hmac_client, hmac_signing_settings, orchestrator_with_clients,
        post_request,
    };
    use sigstack_signing::RequestSigner;
    use sigstack_verify::claim_types;

    #[tokio::test]
    async fn test_should_verify_hmac_signed_request() {
        let signer = RequestSigner::new(Arc::new(hmac_signing_settings()));
        let orchestrator = orchestrator_with_clients(vec![hmac_client()]).await;

        let mut request = post_request(b"{\"value\":42}");
        signer.sign(&mut request).unwrap();

        let result = orchestrator.verify(&request).await.unwrap();
        assert!(result.is_success(), "got {:?}", result.failure());

        let principal = result.principal().unwrap();
        assert_eq!(principal.claim(claim_types::APP_ID), Some("client1"));
        assert_eq!(principal.claim(claim_types::NAME), Some("Test Client One"));
        assert!(principal.claim(claim_types::VERSION).is_some());
    }

    #[tokio::test]
    async fn test_should_verify_ecdsa_signed_request() {
        let (settings, client) = ecdsa_fixtures();
        let signer = RequestSigner::new(Arc::new(settings));
        let orchestrator = orchestrator_with_clients(vec![client]).await;

        let mut request = post_request(b"");
        signer.sign(&mut request).unwrap();

        let result = orchestrator.verify(&request).await.unwrap();
        assert!(result.is_success(), "got {:?}", result.failure());
    }

    #[tokio::test]
    async fn test_should_reject_body_tampered_after_signing() {
        let signer = RequestSigner::new(Arc::new(hmac_signing_settings()));
        let orchestrator = orchestrator_with_clients(vec![hmac_client()]).await;

        let mut request = post_request(b"original body");
        signer.sign(&mut request).unwrap();

        // Swap the body after signing; the digest check must catch it.
        let tampered = request.map(|_| bytes::Bytes::from_static(b"tampered body"));

        let result = orchestrator.verify(&tampered).await.unwrap();
        assert!(!result.is_success());
    }

    #[tokio::test]
    async fn test_should_reject_signature_from_wrong_client() {
        let signer = RequestSigner::new(Arc::new(hmac_signing_settings()));
        let (_, ecdsa_client) = ecdsa_fixtures();
        // Only client2 is registered; the request is signed as client1.
        let orchestrator = orchestrator_with_clients(vec![ecdsa_client]).await;

        let mut request = post_request(b"");
        signer.sign(&mut request).unwrap();

        let result = orchestrator.verify(&request).await.unwrap();
        assert!(!result.is_success());
    }

    #[tokio::test]
    async fn test_should_replay_protect_signed_requests() {
        let signer = RequestSigner::new(Arc::new(hmac_signing_settings()));
        let orchestrator = orchestrator_with_clients(vec![hmac_client()]).await;

        let mut request = post_request(b"");
        signer.sign(&mut request).unwrap();

        let first = orchestrator.verify(&request).await.unwrap();
        assert!(first.is_success(), "got {:?}", first.failure());

        // Re-presenting the identical request replays the nonce.
        let second = orchestrator.verify(&request).await.unwrap();
        assert!(!second.is_success());
    }
}
