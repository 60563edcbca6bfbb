//! Canonical signing-string composition.
//!
//! Both the signer and the verifier derive the signing string from the
//! request independently; the signature is computed over this exact text:
//!
//! ```text
//! (request-target): post /api/resource/id1
//! date: Mon, 24 Feb 2020 10:20:14 GMT
//! digest: SHA-256=...
//! dalion_app_id: app-one
//! ```
//!
//! Lines appear in the caller-supplied header order (never re-sorted) and
//! are joined with `\n` without a trailing newline. Header lookups are
//! case-insensitive in both directions; a header that is absent from the
//! request contributes an empty value rather than an error, so that the
//! verifier reaches the signature comparison with a deterministic string.

use chrono::{DateTime, Utc};
use http::{HeaderMap, Method, Uri};
use tracing::trace;

use crate::escaping::{TargetEscaping, escape_target};
use crate::header::HeaderName;

/// Compose the canonical signing string for a request.
///
/// `created` and `expires` feed the `(created)`/`(expires)` pseudo-header
/// lines; they come from the signature parameters, not from request headers.
///
/// # Examples
///
/// ```
/// use sigstack_core::{HeaderName, TargetEscaping, compose_signing_string};
///
/// let request = http::Request::builder()
///     .method("POST")
///     .uri("http://dalion.eu/api/resource/id1")
///     .header("date", "Mon, 24 Feb 2020 10:20:14 GMT")
///     .body(())
///     .unwrap();
///
/// let signing_string = compose_signing_string(
///     request.method(),
///     request.uri(),
///     request.headers(),
///     &[HeaderName::request_target(), HeaderName::date()],
///     None,
///     None,
///     TargetEscaping::Rfc3986,
/// );
/// assert_eq!(
///     signing_string,
///     "(request-target): post /api/resource/id1\ndate: Mon, 24 Feb 2020 10:20:14 GMT"
/// );
/// ```
#[must_use]
pub fn compose_signing_string(
    method: &Method,
    uri: &Uri,
    headers: &HeaderMap,
    header_list: &[HeaderName],
    created: Option<DateTime<Utc>>,
    expires: Option<DateTime<Utc>>,
    escaping: TargetEscaping,
) -> String {
    let lines: Vec<String> = header_list
        .iter()
        .map(|name| compose_line(name, method, uri, headers, created, expires, escaping))
        .collect();

    let signing_string = lines.join("\n");
    trace!(signing_string, "composed signing string");
    signing_string
}

/// Compose a single `name: value` line of the signing string.
fn compose_line(
    name: &HeaderName,
    method: &Method,
    uri: &Uri,
    headers: &HeaderMap,
    created: Option<DateTime<Utc>>,
    expires: Option<DateTime<Utc>>,
    escaping: TargetEscaping,
) -> String {
    if *name == HeaderName::request_target() {
        let target = escape_target(uri.path(), uri.query(), escaping);
        return format!(
            "(request-target): {} {}",
            method.as_str().to_lowercase(),
            target
        );
    }
    if *name == HeaderName::created() {
        return format!("(created): {}", unix_seconds(created));
    }
    if *name == HeaderName::expires() {
        return format!("(expires): {}", unix_seconds(expires));
    }

    format!("{}: {}", name.as_str(), header_values(headers, name))
}

/// Render an optional instant as unix seconds, or an empty value.
fn unix_seconds(instant: Option<DateTime<Utc>>) -> String {
    instant.map(|t| t.timestamp().to_string()).unwrap_or_default()
}

/// Look up a header case-insensitively and join multiple values with a
/// single comma+space in request order. Absent headers yield an empty value.
fn header_values(headers: &HeaderMap, name: &HeaderName) -> String {
    let Ok(header_name) = http::header::HeaderName::from_bytes(name.as_str().as_bytes()) else {
        return String::new();
    };

    headers
        .get_all(&header_name)
        .iter()
        .map(|value| value.to_str().unwrap_or("").trim())
        .collect::<Vec<_>>()
        .join(", ")
}
