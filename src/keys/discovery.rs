//! Verification key discovery from token claims
//!
//! Strategies run in a fixed order and the first one to produce a key wins:
//!
//! 1. header `kid`: resolved after stripping the `#fragment` and trailing `=`
//! 2. header `jwk`: constructed by the provider
//! 3. header `iss`: resolved
//! 4. payload `iss`: resolved
//!
//! Resolution failures (`kid`, `iss`) are logged and skipped. Construction
//! failures (`jwk`) are returned to the caller: an embedded key that does not
//! construct means the token is malformed, not that the key lives elsewhere.

use crate::keys::KeyProvider;
use crate::segment::JsonObject;
use tracing::debug;

/// Reduce a `kid` header value to the identifier handed to the provider
///
/// Keeps everything before the first `#` and strips trailing `=` characters,
/// so `did:example:123#key-1` resolves `did:example:123`.
pub fn normalize_key_id(kid: &str) -> &str {
    kid.split_once('#')
        .map_or(kid, |(identifier, _)| identifier)
        .trim_end_matches('=')
}

/// Run the discovery chain over decoded header and payload objects
pub(crate) async fn find_key<P>(
    header: Option<&JsonObject>,
    payload: Option<&JsonObject>,
    provider: &P,
) -> Result<Option<P::Key>, P::Error>
where
    P: KeyProvider + ?Sized,
{
    if let Some(kid) = string_claim(header, "kid") {
        let identifier = normalize_key_id(kid);
        if identifier.is_empty() {
            debug!(kid, "kid has no identifier before its fragment, skipping");
        } else if let Some(key) = resolve_or_skip(provider, "kid", identifier).await {
            return Ok(Some(key));
        }
    }

    if let Some(jwk) = header.and_then(|h| h.get("jwk")).filter(|v| !v.is_null()) {
        debug!("constructing key from embedded jwk");
        return provider.create_from_jwk(jwk).await.map(Some);
    }

    if let Some(issuer) = string_claim(header, "iss") {
        if let Some(key) = resolve_or_skip(provider, "header iss", issuer).await {
            return Ok(Some(key));
        }
    }

    if let Some(issuer) = string_claim(payload, "iss") {
        if let Some(key) = resolve_or_skip(provider, "payload iss", issuer).await {
            return Ok(Some(key));
        }
    }

    debug!("no key could be determined from token claims");
    Ok(None)
}

/// Resolve an identifier, turning any provider error into "not found"
async fn resolve_or_skip<P>(provider: &P, claim: &'static str, identifier: &str) -> Option<P::Key>
where
    P: KeyProvider + ?Sized,
{
    debug!(claim, identifier, "resolving key");
    match provider.resolve(identifier).await {
        Ok(key) => Some(key),
        Err(e) => {
            debug!(claim, identifier, error = %e, "key resolution failed, trying next strategy");
            None
        }
    }
}

/// A claim that is present as a non-empty string
fn string_claim<'a>(object: Option<&'a JsonObject>, name: &str) -> Option<&'a str> {
    object
        .and_then(|o| o.get(name))
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
}
