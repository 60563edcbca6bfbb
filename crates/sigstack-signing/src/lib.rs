//! Request signing for sigstack HTTP message signing.
//!
//! The signing pipeline takes a mutable request and a set of
//! [`SigningSettings`], ensures the required headers exist, composes the
//! canonical signing string, hashes it with the configured algorithm and
//! writes the result into the `Authorization` header:
//!
//! ```text
//! validate settings
//!   → ensure Date / Expires / Digest headers (idempotent)
//!   → compose signing string
//!   → hash + base64
//!   → Authorization: Signature keyId="...",algorithm="...",...
//! ```
//!
//! Per-client settings can be kept in an explicit [`SignerRegistry`] instead
//! of global state; "not registered" is a recoverable lookup miss.

mod ensure;
mod error;
mod registry;
mod settings;
mod signer;

pub use error::SigningError;
pub use registry::SignerRegistry;
pub use settings::{SigningEvents, SigningSettings};
pub use signer::RequestSigner;
