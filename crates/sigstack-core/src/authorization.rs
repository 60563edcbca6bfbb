//! `Authorization` header signature parameter codec.
//!
//! The signature travels in the `Authorization` header as a comma-separated
//! parameter list:
//!
//! ```text
//! Signature keyId="client1",algorithm="hmac_sha384",created=1582539614,
//!   expires=1582539914,headers="(request-target) date",signature="<base64>"
//! ```
//!
//! Field order is fixed — `keyId`, `algorithm`, `created`, `expires`,
//! `headers`, `nonce`, `signature` — and each field is present only when its
//! source value is.

use chrono::DateTime;

use crate::error::CoreError;
use crate::header::HeaderName;
use crate::signature::Signature;
use crate::types::KeyId;

/// Serialize a signature into the `Authorization` parameter string.
#[must_use]
pub fn serialize_signature_params(signature: &Signature) -> String {
    let mut fields = Vec::with_capacity(7);

    fields.push(format!("keyId=\"{}\"", signature.key_id));
    if let Some(ref algorithm) = signature.algorithm {
        fields.push(format!("algorithm=\"{algorithm}\""));
    }
    if let Some(created) = signature.created {
        fields.push(format!("created={}", created.timestamp()));
    }
    if let Some(expires) = signature.expires {
        fields.push(format!("expires={}", expires.timestamp()));
    }
    if !signature.headers.is_empty() {
        let names: Vec<&str> = signature.headers.iter().map(HeaderName::as_str).collect();
        fields.push(format!("headers=\"{}\"", names.join(" ")));
    }
    if let Some(ref nonce) = signature.nonce {
        fields.push(format!("nonce=\"{nonce}\""));
    }
    fields.push(format!("signature=\"{}\"", signature.signature));

    fields.join(",")
}

/// Split an `Authorization` header value into its scheme and parameter
/// halves.
#[must_use]
pub fn split_authorization(value: &str) -> Option<(&str, &str)> {
    value
        .split_once(' ')
        .map(|(scheme, params)| (scheme, params.trim_start()))
}

/// Parse an `Authorization` parameter string back into a [`Signature`].
///
/// Parsing is structural only; the result may still fail
/// [`Signature::validate`]. Unrecognized fields are ignored.
///
/// # Errors
///
/// Returns [`CoreError::AuthorizationFormat`] for malformed fields
/// (unparsable timestamps, invalid header names, missing `=` separators).
pub fn parse_signature_params(params: &str) -> Result<Signature, CoreError> {
    let mut signature = Signature::default();

    for field in params.split(',') {
        let field = field.trim();
        if field.is_empty() {
            continue;
        }
        let (name, raw_value) = field.split_once('=').ok_or_else(|| {
            CoreError::AuthorizationFormat(format!("field without value: {field}"))
        })?;

        match name {
            "keyId" => signature.key_id = KeyId::new(unquote(raw_value)),
            "algorithm" => signature.algorithm = Some(unquote(raw_value).to_owned()),
            "created" => signature.created = Some(parse_timestamp("created", raw_value)?),
            "expires" => signature.expires = Some(parse_timestamp("expires", raw_value)?),
            "headers" => {
                signature.headers = unquote(raw_value)
                    .split_whitespace()
                    .map(HeaderName::new)
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| CoreError::AuthorizationFormat(e.to_string()))?;
            }
            "nonce" => signature.nonce = Some(unquote(raw_value).to_owned()),
            "signature" => signature.signature = unquote(raw_value).to_owned(),
            _ => {}
        }
    }

    Ok(signature)
}

/// Strip one pair of surrounding double quotes, if present.
fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Parse a unix-seconds field into an instant.
fn parse_timestamp(
    field: &str,
    raw: &str,
) -> Result<chrono::DateTime<chrono::Utc>, CoreError> {
    let seconds: i64 = unquote(raw)
        .parse()
        .map_err(|_| CoreError::AuthorizationFormat(format!("{field} is not a unix timestamp")))?;
    DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| CoreError::AuthorizationFormat(format!("{field} is out of range")))
}
