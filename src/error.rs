//! Errors for jwtcodec

use thiserror::Error;

/// jwtcodec Errors
///
/// Key resolution errors are not part of this enum: [`find_key`] swallows
/// them for `kid`/`iss` lookups and hands the provider's own error back
/// unchanged for embedded `jwk` construction.
///
/// [`find_key`]: crate::TokenCodec::find_key
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // ============================================================================
    // Format Errors
    // ============================================================================
    #[error("Invalid JWT: expected three Base64URL parts with JSON object header and payload")]
    InvalidToken,

    #[error("Base64URL decoding failed: {0}")]
    FormatInvalidBase64(String),

    #[error("JSON parsing failed: {0}")]
    FormatInvalidJson(String),

    #[error("Cannot sign token: {0} segment is missing")]
    SegmentMissing(&'static str),

    // ============================================================================
    // Size Errors
    // ============================================================================
    #[error("Token too large: {size} bytes (maximum: {max} bytes)")]
    TokenTooLarge { size: usize, max: usize },

    #[error("Decoded {segment} too large: {size} bytes (maximum: {max} bytes)")]
    SegmentTooLarge {
        segment: &'static str,
        size: usize,
        max: usize,
    },

    // ============================================================================
    // Signature Errors
    // ============================================================================
    #[error("No algorithm in token header and key advertises none")]
    AlgorithmMissing,

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("Key operation failed: {0}")]
    KeyOperation(String),
}

/// Result type alias for jwtcodec operations
pub type Result<T> = std::result::Result<T, Error>;
