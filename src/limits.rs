//! Size limit constants and codec defaults

/// Algorithm written into the header when neither the caller nor the header names one
pub(crate) const DEFAULT_ALGORITHM: &str = "ES256";

/// Maximum length for a JWT token string (64KB)
pub(crate) const MAX_TOKEN_LENGTH: usize = 64 * 1024;

// ============================================================================
// Decoded segment size limits
// ============================================================================

/// Maximum size for decoded JWT header JSON (8KB)
/// Headers are typically small, but an embedded `jwk` can carry an RSA modulus
pub(crate) const MAX_DECODED_HEADER_SIZE: usize = 8 * 1024;

/// Maximum size for decoded JWT payload JSON (64KB)
pub(crate) const MAX_DECODED_PAYLOAD_SIZE: usize = 64 * 1024;

/// Maximum size for decoded signature bytes (8KB)
/// RSA signatures are 256-512 bytes; ML-DSA signatures run to several KB
pub(crate) const MAX_DECODED_SIGNATURE_SIZE: usize = 1024 * 8;

/// Size limits enforced when parsing and when signing
///
/// A token that signs successfully under a set of limits always parses under
/// the same limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SizeLimits {
    pub(crate) max_token_length: usize,
    pub(crate) max_header_size: usize,
    pub(crate) max_payload_size: usize,
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self {
            max_token_length: MAX_TOKEN_LENGTH,
            max_header_size: MAX_DECODED_HEADER_SIZE,
            max_payload_size: MAX_DECODED_PAYLOAD_SIZE,
        }
    }
}
