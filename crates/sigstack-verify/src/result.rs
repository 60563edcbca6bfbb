//! Verification results and principal derivation.

use sigstack_core::{Claim, Client};

use crate::failure::SignatureVerificationFailure;

/// Authentication type attached to principals produced by this library.
pub const AUTHENTICATION_TYPE: &str = "SignedHttpRequest";

/// Well-known claim types used in derived principals.
pub mod claim_types {
    /// The authenticated client's key id.
    pub const APP_ID: &str = "appid";
    /// The name claim type of the identity.
    pub const NAME: &str = "name";
    /// The library version that performed the verification.
    pub const VERSION: &str = "ver";
    /// The role claim type of the identity.
    pub const ROLE: &str = "role";
}

/// The identity granted to a successfully verified caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Fixed authentication scheme constant.
    pub authentication_type: &'static str,
    /// Ordered claim set; duplicate claim types are preserved.
    pub claims: Vec<Claim>,
}

impl Principal {
    /// First value of the given claim type, if any.
    #[must_use]
    pub fn claim(&self, claim_type: &str) -> Option<&str> {
        self.claims
            .iter()
            .find(|claim| claim.claim_type == claim_type)
            .map(|claim| claim.value.as_str())
    }
}

/// Derive the default principal for a client: `appid`, `name` and `ver`
/// claims, then the client's own claims appended verbatim.
pub(crate) fn principal_for(client: &Client) -> Principal {
    let mut claims = vec![
        Claim::new(claim_types::APP_ID, client.id().as_str()),
        Claim::new(claim_types::NAME, client.name()),
        Claim::new(claim_types::VERSION, env!("CARGO_PKG_VERSION")),
    ];
    claims.extend(client.claims().iter().cloned());
    Principal {
        authentication_type: AUTHENTICATION_TYPE,
        claims,
    }
}

/// Outcome of verifying a request signature.
///
/// Exactly one variant applies; a result never carries both a principal and
/// a failure.
#[derive(Debug, Clone)]
pub enum VerificationResult {
    /// The request was authentically signed by the resolved client.
    Success {
        /// The resolved client.
        client: Client,
        /// The derived principal.
        principal: Principal,
    },
    /// Verification failed.
    Failure {
        /// The resolved client, when resolution succeeded.
        client: Option<Client>,
        /// The specific failure.
        failure: SignatureVerificationFailure,
    },
}

impl VerificationResult {
    /// Whether this is a success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The principal, for successes.
    #[must_use]
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            Self::Success { principal, .. } => Some(principal),
            Self::Failure { .. } => None,
        }
    }

    /// The failure, for failures.
    #[must_use]
    pub fn failure(&self) -> Option<&SignatureVerificationFailure> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { failure, .. } => Some(failure),
        }
    }
}
