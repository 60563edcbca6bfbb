//! Client-dictated signature defaults.

use sigstack_core::{Client, HeaderName, Signature, algorithm_token};

/// Fill in the defaults the resolved client dictates for a parsed
/// signature.
///
/// - An omitted header list defaults to `[(created)]` for algorithms that
///   request their timestamps through pseudo-headers, and `[date]`
///   otherwise.
/// - An omitted algorithm token defaults to the client's configured
///   algorithm.
pub(crate) fn sanitize(signature: &mut Signature, client: &Client) {
    let algorithm = client.signature_algorithm();

    if signature.headers.is_empty() {
        signature.headers = if algorithm.uses_timestamp_pseudo_headers() {
            vec![HeaderName::created()]
        } else {
            vec![HeaderName::date()]
        };
    }

    if signature.algorithm.is_none() {
        signature.algorithm = Some(algorithm_token(
            algorithm.name(),
            algorithm.hash_algorithm(),
        ));
    }
}
