//! Case-insensitive header names, including the synthetic pseudo-headers
//! that only ever appear inside the signing string.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// A case-insensitive header name, stored in its canonical lower-case form.
///
/// Three pseudo-headers exist — `(request-target)`, `(created)` and
/// `(expires)` — which are composed into the signing string but are never
/// sent as real wire headers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct HeaderName(String);

impl HeaderName {
    /// The `(request-target)` pseudo-header.
    #[must_use]
    pub fn request_target() -> Self {
        Self("(request-target)".to_owned())
    }

    /// The `(created)` pseudo-header.
    #[must_use]
    pub fn created() -> Self {
        Self("(created)".to_owned())
    }

    /// The `(expires)` pseudo-header.
    #[must_use]
    pub fn expires() -> Self {
        Self("(expires)".to_owned())
    }

    /// The `date` header.
    #[must_use]
    pub fn date() -> Self {
        Self("date".to_owned())
    }

    /// The `digest` header.
    #[must_use]
    pub fn digest() -> Self {
        Self("digest".to_owned())
    }

    /// Create a header name, normalizing to lower-case.
    ///
    /// # Errors
    ///
    /// Returns an argument error for an empty name.
    pub fn new(name: impl AsRef<str>) -> Result<Self, CoreError> {
        let name = name.as_ref();
        if name.trim().is_empty() {
            return Err(CoreError::argument("name", "header name cannot be empty"));
        }
        Ok(Self(name.trim().to_lowercase()))
    }

    /// Whether this is one of the synthetic pseudo-headers.
    #[must_use]
    pub fn is_pseudo(&self) -> bool {
        self.0.starts_with('(')
    }

    /// Get the canonical (lower-case) name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HeaderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for HeaderName {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
