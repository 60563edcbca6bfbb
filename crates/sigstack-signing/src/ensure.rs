//! Idempotent header ensurers.
//!
//! The `Date` and `Expires` ensurers set their header only when the signed
//! header list requires it and the request does not already carry it; the
//! digest ensurer is driven by the method and the configured digest
//! algorithm instead. An existing value is never overwritten. The
//! `(created)`/`(expires)` pseudo-values are stamped on the signature
//! itself by the signer and need no request mutation.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use http::HeaderValue;
use http::header::HeaderName as HttpHeaderName;

use sigstack_core::{HashAlgorithm, HeaderName};
use sigstack_crypto::digest::digest_header_value;

use crate::error::SigningError;

/// HTTP methods that can carry a body worth digesting.
const BODY_METHODS: &[&str] = &["POST", "PUT", "PATCH", "REPORT"];

/// Set the `Date` header to the signing instant when the header list covers
/// it and the request has none.
pub(crate) fn ensure_date(
    request: &mut http::Request<Bytes>,
    header_list: &[HeaderName],
    now: DateTime<Utc>,
) {
    if !header_list.contains(&HeaderName::date()) {
        return;
    }
    if request.headers().contains_key(http::header::DATE) {
        return;
    }
    request
        .headers_mut()
        .insert(http::header::DATE, http_date_value(now));
}

/// Set the `Expires` header to the signature expiry instant when the header
/// list covers it and the request has none.
pub(crate) fn ensure_expires(
    request: &mut http::Request<Bytes>,
    header_list: &[HeaderName],
    expires: DateTime<Utc>,
) {
    let expires_header = HttpHeaderName::from_static("expires");
    if !header_list.contains(&HeaderName::new("expires").expect("static name is valid")) {
        return;
    }
    if request.headers().contains_key(&expires_header) {
        return;
    }
    request
        .headers_mut()
        .insert(expires_header, http_date_value(expires));
}

/// Compute and set the `Digest` header for body-bearing requests.
///
/// Skipped when the method never carries a body (GET/HEAD/TRACE/DELETE and
/// friends), when no digest algorithm is configured, or when a `Digest`
/// header already exists. An unsupported digest algorithm aborts the
/// pipeline with a "not supported" error.
pub(crate) fn ensure_digest(
    request: &mut http::Request<Bytes>,
    digest_hash_algorithm: Option<HashAlgorithm>,
) -> Result<(), SigningError> {
    let Some(hash) = digest_hash_algorithm else {
        return Ok(());
    };
    if !BODY_METHODS.contains(&request.method().as_str()) {
        return Ok(());
    }
    let digest_header = HttpHeaderName::from_static("digest");
    if request.headers().contains_key(&digest_header) {
        return Ok(());
    }

    let value = digest_header_value(hash, request.body())?;
    let value = HeaderValue::from_str(&value).map_err(|e| SigningError::Header(e.to_string()))?;
    request.headers_mut().insert(digest_header, value);
    Ok(())
}

/// Render an instant as an RFC 7231 IMF-fixdate header value.
fn http_date_value(instant: DateTime<Utc>) -> HeaderValue {
    let formatted = instant.format("%a, %d %b %Y %H:%M:%S GMT").to_string();
    HeaderValue::from_str(&formatted).expect("an IMF-fixdate is a valid header value")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(method: &str, body: &'static [u8]) -> http::Request<Bytes> {
        http::Request::builder()
            .method(method)
            .uri("http://dalion.eu/api/resource/id1")
            .body(Bytes::from_static(body))
            .unwrap()
    }

    fn signing_time() -> DateTime<Utc> {
        DateTime::from_timestamp(1_582_539_614, 0).unwrap()
    }

    #[test]
    fn test_should_set_date_when_required_and_absent() {
        let mut req = request("POST", b"");
        ensure_date(&mut req, &[HeaderName::date()], signing_time());
        assert_eq!(
            req.headers().get(http::header::DATE).unwrap(),
            "Mon, 24 Feb 2020 10:20:14 GMT"
        );
    }

    #[test]
    fn test_should_not_overwrite_existing_date() {
        let mut req = request("POST", b"");
        req.headers_mut().insert(
            http::header::DATE,
            HeaderValue::from_static("Sat, 01 Feb 2020 00:00:00 GMT"),
        );
        ensure_date(&mut req, &[HeaderName::date()], signing_time());
        assert_eq!(
            req.headers().get(http::header::DATE).unwrap(),
            "Sat, 01 Feb 2020 00:00:00 GMT"
        );
    }

    #[test]
    fn test_should_skip_date_when_not_in_header_list() {
        let mut req = request("POST", b"");
        ensure_date(&mut req, &[HeaderName::request_target()], signing_time());
        assert!(req.headers().get(http::header::DATE).is_none());
    }

    #[test]
    fn test_should_set_expires_to_expiry_instant() {
        let mut req = request("POST", b"");
        let expires = DateTime::from_timestamp(1_582_539_914, 0).unwrap();
        ensure_expires(
            &mut req,
            &[HeaderName::new("expires").unwrap()],
            expires,
        );
        assert_eq!(
            req.headers().get("expires").unwrap(),
            "Mon, 24 Feb 2020 10:25:14 GMT"
        );
    }

    #[test]
    fn test_should_digest_body_bearing_methods_only() {
        let mut post = request("POST", b"abc123");
        ensure_digest(&mut post, Some(HashAlgorithm::Sha512)).unwrap();
        let value = post.headers().get("digest").unwrap().to_str().unwrap();
        assert!(value.starts_with("SHA-512="));

        let mut get = request("GET", b"");
        ensure_digest(&mut get, Some(HashAlgorithm::Sha512)).unwrap();
        assert!(get.headers().get("digest").is_none());
    }

    #[test]
    fn test_should_skip_digest_when_header_already_present() {
        let mut req = request("POST", b"abc123");
        req.headers_mut()
            .insert("digest", HeaderValue::from_static("SHA-256=precomputed"));
        ensure_digest(&mut req, Some(HashAlgorithm::Sha256)).unwrap();
        assert_eq!(req.headers().get("digest").unwrap(), "SHA-256=precomputed");
    }

    #[test]
    fn test_should_skip_digest_without_configured_algorithm() {
        let mut req = request("POST", b"abc123");
        ensure_digest(&mut req, None).unwrap();
        assert!(req.headers().get("digest").is_none());
    }

    #[test]
    fn test_should_abort_on_unsupported_digest_algorithm() {
        let mut req = request("POST", b"abc123");
        let result = ensure_digest(&mut req, Some(HashAlgorithm::Sha1));
        assert!(matches!(result, Err(SigningError::Algorithm(_))));
    }
}
