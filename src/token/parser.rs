//! Compact serialization parser

use crate::error::{Error, Result};
use crate::limits::SizeLimits;
use crate::token::token::is_absent_or_empty;
use crate::token::{PayloadSegment, Token};
use crate::utils::base64url;
use tracing::debug;

/// Split `header.payload.signature` into its segments
///
/// Every segment must be one or more Base64URL alphabet characters. Padding,
/// whitespace and empty segments do not match.
pub(crate) fn split_compact(input: &str) -> Option<(&str, &str, &str)> {
    let mut parts = input.split('.');
    let header = parts.next()?;
    let payload = parts.next()?;
    let signature = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    [header, payload, signature]
        .iter()
        .all(|part| !part.is_empty() && base64url::is_alphabet(part))
        .then_some((header, payload, signature))
}

/// Parse a compact token, decoding both segments before validating
pub(crate) fn parse(input: &str, limits: &SizeLimits) -> Result<Token> {
    if input.len() > limits.max_token_length {
        debug!(
            length = input.len(),
            max = limits.max_token_length,
            "token exceeds maximum length"
        );
        return Err(Error::InvalidToken);
    }

    let Some((header, payload, signature)) = split_compact(input) else {
        debug!("token does not match header.payload.signature");
        return Err(Error::InvalidToken);
    };

    let mut token = Token {
        raw: Some(input.to_string()),
        header_segment: header.to_string(),
        payload_segment: PayloadSegment::Encoded(payload.to_string()),
        signature_segment: signature.to_string(),
        header: None,
        payload: None,
    };
    token.decode_bounded(limits.max_header_size, limits.max_payload_size);

    // Single gate: both segments have been attempted by now
    if is_absent_or_empty(&token.header)
        || is_absent_or_empty(&token.payload)
        || token.signature_segment.is_empty()
    {
        debug!(
            header = token.header.is_some(),
            payload = token.payload.is_some(),
            "token header or payload is not a non-empty JSON object"
        );
        return Err(Error::InvalidToken);
    }

    Ok(token)
}
