//! End-to-end tests for sigstack: a request is signed by the signing
//! pipeline and verified by the verification pipeline, across algorithms
//! and store configurations.

use std::sync::{Arc, Once};
use std::time::Duration;

use bytes::Bytes;

use sigstack_core::{
    Client, ClientOptions, HashAlgorithm, HeaderName, KeyId, Secret, SignatureAlgorithm,
};
use sigstack_crypto::{EcdsaAlgorithm, HmacAlgorithm};
use sigstack_signing::SigningSettings;
use sigstack_store::{ClientStore, InMemoryClientStore, InMemoryNonceStore};
use sigstack_verify::VerificationOrchestrator;

mod test_caching;
mod test_roundtrip;
mod test_scenarios;

static INIT: Once = Once::new();

/// Initialize tracing (once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// The shared secret used by the HMAC fixtures.
pub const TEST_SECRET: &str = "s3cr3t";

/// Build a POST request with a body and an application header.
#[must_use]
pub fn post_request(body: &'static [u8]) -> http::Request<Bytes> {
    http::Request::builder()
        .method("POST")
        .uri("http://dalion.eu/api/resource/id1")
        .header("dalion_app_id", "app-one")
        .body(Bytes::from_static(body))
        .unwrap()
}

/// HMAC-SHA384 signing settings for `client1`.
#[must_use]
pub fn hmac_signing_settings() -> SigningSettings {
    init_tracing();
    let algorithm: Arc<dyn SignatureAlgorithm> = Arc::new(
        HmacAlgorithm::new(&Secret::new(TEST_SECRET), HashAlgorithm::Sha384).unwrap(),
    );
    let mut settings = SigningSettings::new(KeyId::new("client1"), algorithm);
    settings.headers = vec![
        HeaderName::request_target(),
        HeaderName::date(),
        HeaderName::digest(),
        HeaderName::new("dalion_app_id").unwrap(),
    ];
    settings.expires = Duration::from_secs(300);
    settings
}

/// The verification-side client record matching [`hmac_signing_settings`].
#[must_use]
pub fn hmac_client() -> Client {
    let algorithm: Arc<dyn SignatureAlgorithm> = Arc::new(
        HmacAlgorithm::new(&Secret::new(TEST_SECRET), HashAlgorithm::Sha384).unwrap(),
    );
    Client::create(
        KeyId::new("client1"),
        "Test Client One",
        algorithm,
        ClientOptions::default(),
    )
    .unwrap()
}

/// A matching ECDSA P-256 signer/verifier pair for `client2`.
#[must_use]
pub fn ecdsa_fixtures() -> (SigningSettings, Client) {
    init_tracing();
    let pkcs8 = EcdsaAlgorithm::generate_pkcs8(HashAlgorithm::Sha256).unwrap();
    let signing = EcdsaAlgorithm::new_signing(&pkcs8, HashAlgorithm::Sha256).unwrap();
    let verification =
        EcdsaAlgorithm::new_verification(signing.public_key(), HashAlgorithm::Sha256).unwrap();

    let mut settings = SigningSettings::new(KeyId::new("client2"), Arc::new(signing));
    settings.headers = vec![HeaderName::request_target(), HeaderName::date()];

    let client = Client::create(
        KeyId::new("client2"),
        "Test Client Two",
        Arc::new(verification),
        ClientOptions::default(),
    )
    .unwrap();
    (settings, client)
}

/// Build an orchestrator over in-memory stores seeded with the given
/// clients.
pub async fn orchestrator_with_clients(clients: Vec<Client>) -> VerificationOrchestrator {
    let client_store = Arc::new(InMemoryClientStore::new());
    for client in clients {
        client_store.register(client).await.unwrap();
    }
    VerificationOrchestrator::new(client_store, Arc::new(InMemoryNonceStore::new()))
}
