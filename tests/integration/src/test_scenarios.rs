//! Documented protocol scenarios.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{DateTime, Utc};

    use crate::{hmac_client, orchestrator_with_clients, post_request};
    use sigstack_core::{
        HashAlgorithm, HeaderName, KeyId, Nonce, Secret, SignatureAlgorithm,
    };
    use sigstack_crypto::HmacAlgorithm;
    use sigstack_crypto::digest::{digest_header_value, verify_digest_header};
    use sigstack_signing::{RequestSigner, SigningSettings};
    use sigstack_store::{InMemoryNonceStore, NonceStore};

    /// 2020-02-24T11:20:14+01:00.
    fn signing_time() -> DateTime<Utc> {
        DateTime::from_timestamp(1_582_539_614, 0).unwrap()
    }

    /// Signing a POST for client1 with HMAC-SHA384 and a five-minute expiry
    /// yields fixed created/expires timestamps and the declared header
    /// list.
    #[tokio::test]
    async fn test_should_produce_documented_authorization_header_for_client1() {
        let algorithm: Arc<dyn SignatureAlgorithm> = Arc::new(
            HmacAlgorithm::new(&Secret::new("s3cr3t"), HashAlgorithm::Sha384).unwrap(),
        );
        let mut settings = SigningSettings::new(KeyId::new("client1"), algorithm);
        settings.headers = vec![
            HeaderName::request_target(),
            HeaderName::date(),
            HeaderName::new("expires").unwrap(),
            HeaderName::new("dalion_app_id").unwrap(),
        ];
        settings.expires = std::time::Duration::from_secs(300);
        settings.enable_nonce = false;

        let signer = RequestSigner::new(Arc::new(settings));
        let mut request = post_request(b"");
        signer.sign_at(&mut request, signing_time()).unwrap();

        let authorization = request
            .headers()
            .get(http::header::AUTHORIZATION)
            .unwrap()
            .to_str()
            .unwrap();

        assert!(authorization.contains("created=1582539614"));
        assert!(authorization.contains("expires=1582539914"));
        assert!(
            authorization
                .contains("headers=\"(request-target) date expires dalion_app_id\"")
        );
    }

    /// The digest of body `abc123` with SHA-512 round-trips through the
    /// `Digest` header format.
    #[test]
    fn test_should_digest_abc123_with_sha512() {
        let value = digest_header_value(HashAlgorithm::Sha512, b"abc123").unwrap();
        assert!(value.starts_with("SHA-512="));
        assert!(verify_digest_header(&value, b"abc123").unwrap());
        assert!(!verify_digest_header(&value, b"abc124").unwrap());
    }

    /// Registering the same nonce twice with increasing expirations keeps
    /// only the later expiration.
    #[tokio::test]
    async fn test_should_keep_later_expiration_for_reregistered_nonce() {
        let store = InMemoryNonceStore::new();
        let now = Utc::now();

        let earlier = Nonce::new(
            KeyId::new("client1"),
            "abc123",
            now + chrono::Duration::seconds(30),
        )
        .unwrap();
        let later = Nonce::new(
            KeyId::new("client1"),
            "abc123",
            now + chrono::Duration::seconds(60),
        )
        .unwrap();

        store.register(earlier).await.unwrap();
        store.register(later.clone()).await.unwrap();

        let found = store
            .get(&KeyId::new("client1"), "abc123")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.expires_at, later.expires_at);
    }

    /// A mismatching digest surfaces the digest failure, not a signature
    /// mismatch: the digest task runs (and fails) before the
    /// signature-string comparison.
    #[tokio::test]
    async fn test_should_report_digest_failure_before_signature_comparison() {
        let algorithm: Arc<dyn SignatureAlgorithm> = Arc::new(
            HmacAlgorithm::new(&Secret::new("s3cr3t"), HashAlgorithm::Sha384).unwrap(),
        );
        let mut settings = SigningSettings::new(KeyId::new("client1"), algorithm);
        settings.headers = vec![
            HeaderName::request_target(),
            HeaderName::date(),
            HeaderName::digest(),
        ];
        let signer = RequestSigner::new(Arc::new(settings));

        let mut request = post_request(b"abc123");
        signer.sign(&mut request).unwrap();

        // Corrupt the digest header after signing. Both the digest check
        // and the signature comparison would now fail; the digest failure
        // must win because it runs first.
        let stale = digest_header_value(HashAlgorithm::Sha256, b"other").unwrap();
        request
            .headers_mut()
            .insert("digest", http::HeaderValue::from_str(&stale).unwrap());

        let orchestrator = orchestrator_with_clients(vec![hmac_client()]).await;
        let result = orchestrator.verify(&request).await.unwrap();

        let failure = result.failure().unwrap();
        assert_eq!(failure.code.as_str(), "INVALID_DIGEST_HEADER");
    }
}
