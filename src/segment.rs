//! Segment serialization
//!
//! A segment is the Base64URL (no padding) encoding of a JSON object's UTF-8
//! text. Encoding never fails; decoding reports any failure as `None` so the
//! parser can attempt both segments before deciding whether the token is valid.

use crate::utils::base64url;
use serde_json::{Map, Value};

/// A JSON object with insertion-ordered keys
pub type JsonObject = Map<String, Value>;

/// Encode a JSON object as a Base64URL segment
pub fn encode_segment(object: &JsonObject) -> String {
    // `Map` serialization cannot fail: keys are strings and values are plain JSON
    let json = serde_json::to_string(object).unwrap_or_default();
    base64url::encode(&json)
}

/// Decode a Base64URL segment into a JSON object
///
/// Returns `None` when the segment is not Base64URL, not UTF-8, not JSON, or
/// not a JSON object. Callers check for `None`; nothing here is an error.
///
/// No size limit applies here. [`TokenCodec::decode_segment`] and parsing
/// enforce the configured limits.
///
/// [`TokenCodec::decode_segment`]: crate::TokenCodec::decode_segment
pub fn decode_segment(segment: &str) -> Option<JsonObject> {
    decode_segment_bounded(segment, usize::MAX)
}

/// [`decode_segment`] with an explicit decoded size limit
pub(crate) fn decode_segment_bounded(segment: &str, max_size: usize) -> Option<JsonObject> {
    let json = match base64url::decode_string(segment, max_size) {
        Ok(json) => json,
        Err(e) => {
            tracing::trace!(error = %e, "segment is not base64url text");
            return None;
        }
    };

    match serde_json::from_str::<Value>(&json) {
        Ok(Value::Object(object)) => Some(object),
        Ok(_) => {
            tracing::trace!("segment JSON is not an object");
            None
        }
        Err(e) => {
            tracing::trace!(error = %e, "segment is not JSON");
            None
        }
    }
}
