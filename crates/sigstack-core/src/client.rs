//! Server-side client records.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;

use crate::algorithm::SignatureAlgorithm;
use crate::error::{ValidationError, Violation};
use crate::escaping::TargetEscaping;
use crate::types::{Claim, KeyId};

/// Options applied when registering a [`Client`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// How long a nonce registered by this client stays a replay candidate.
    pub nonce_lifetime: Duration,
    /// Permitted tolerance between signer and verifier clocks.
    pub clock_skew: Duration,
    /// How the request target is escaped in this client's signing strings.
    pub request_target_escaping: TargetEscaping,
    /// Extra claims granted to principals authenticated as this client.
    pub claims: Vec<Claim>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            nonce_lifetime: Duration::from_secs(300),
            clock_skew: Duration::from_secs(60),
            request_target_escaping: TargetEscaping::default(),
            claims: Vec::new(),
        }
    }
}

/// A registered client of the verification side.
///
/// Equality and hashing are by [`id`](Self::id) only, independent of the
/// other fields. A stale cached copy therefore still compares equal to a
/// freshly loaded record with the same identity.
///
/// A client exclusively owns its (verification-only) signature algorithm
/// handle; [`dispose`](Self::dispose) releases it and is idempotent.
#[derive(Clone)]
pub struct Client {
    id: KeyId,
    name: String,
    signature_algorithm: Arc<dyn SignatureAlgorithm>,
    nonce_lifetime: Duration,
    clock_skew: Duration,
    request_target_escaping: TargetEscaping,
    claims: Vec<Claim>,
}

impl Client {
    /// Create a client record.
    ///
    /// # Errors
    ///
    /// Returns all violated `{property, message}` pairs: empty id or name,
    /// zero nonce lifetime or clock skew.
    pub fn create(
        id: KeyId,
        name: impl Into<String>,
        signature_algorithm: Arc<dyn SignatureAlgorithm>,
        options: ClientOptions,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        let mut violations = Vec::new();

        if id.is_empty() {
            violations.push(Violation::new("id", "client id cannot be empty"));
        }
        if name.trim().is_empty() {
            violations.push(Violation::new("name", "client name cannot be empty"));
        }
        if options.nonce_lifetime.is_zero() {
            violations.push(Violation::new(
                "nonce_lifetime",
                "nonce lifetime must be positive",
            ));
        }
        if options.clock_skew.is_zero() {
            violations.push(Violation::new("clock_skew", "clock skew must be positive"));
        }

        if !violations.is_empty() {
            return Err(ValidationError::new(violations));
        }

        Ok(Self {
            id,
            name,
            signature_algorithm,
            nonce_lifetime: options.nonce_lifetime,
            clock_skew: options.clock_skew,
            request_target_escaping: options.request_target_escaping,
            claims: options.claims,
        })
    }

    /// The client's key id.
    #[must_use]
    pub fn id(&self) -> &KeyId {
        &self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The verification algorithm configured for this client.
    #[must_use]
    pub fn signature_algorithm(&self) -> &Arc<dyn SignatureAlgorithm> {
        &self.signature_algorithm
    }

    /// Replay window for nonces presented by this client.
    #[must_use]
    pub fn nonce_lifetime(&self) -> Duration {
        self.nonce_lifetime
    }

    /// Permitted clock tolerance for created/expires checks.
    #[must_use]
    pub fn clock_skew(&self) -> Duration {
        self.clock_skew
    }

    /// Request-target escaping mode used when re-deriving signing strings.
    #[must_use]
    pub fn request_target_escaping(&self) -> TargetEscaping {
        self.request_target_escaping
    }

    /// Extra claims configured for this client.
    #[must_use]
    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    /// Release the owned signature algorithm handle. Idempotent.
    pub fn dispose(&self) {
        self.signature_algorithm.dispose();
    }
}

impl PartialEq for Client {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Client {}

impl Hash for Client {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("algorithm", &self.signature_algorithm.name())
            .field("nonce_lifetime", &self.nonce_lifetime)
            .field("clock_skew", &self.clock_skew)
            .field("request_target_escaping", &self.request_target_escaping)
            .field("claims", &self.claims)
            .finish()
    }
}
