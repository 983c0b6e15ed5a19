//! Base64URL encoding/decoding per RFC 4648
//!
//! This module provides a thin wrapper around the `base64` crate with
//! size limit validation. Padding is never produced and never accepted.

use crate::error::{Error, Result};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

/// Encode bytes to Base64URL string
pub fn encode_bytes(input: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Encode string to Base64URL
pub fn encode(input: &str) -> String {
    encode_bytes(input.as_bytes())
}

/// Decode Base64URL string to bytes with maximum size limit
pub fn decode_bytes(input: &str, max_size: usize) -> Result<Vec<u8>> {
    // Reject before allocating: every 4 characters decode to at most 3 bytes
    if input.len() / 4 * 3 > max_size {
        return Err(Error::FormatInvalidBase64(format!(
            "Encoded size exceeds limit: {} characters (max decoded: {max_size})",
            input.len()
        )));
    }

    let result = URL_SAFE_NO_PAD
        .decode(input)
        .map_err(|e| Error::FormatInvalidBase64(format!("Base64URL decode failed: {e}")))?;

    if result.len() > max_size {
        return Err(Error::FormatInvalidBase64(format!(
            "Decoded size exceeds limit: {} bytes (max: {})",
            result.len(),
            max_size
        )));
    }

    Ok(result)
}

/// Decode Base64URL string to UTF-8 string with size limit
pub fn decode_string(input: &str, max_size: usize) -> Result<String> {
    decode_bytes(input, max_size).and_then(|bytes| {
        String::from_utf8(bytes)
            .map_err(|e| Error::FormatInvalidBase64(format!("Invalid UTF-8: {e}")))
    })
}

/// Exact decoded length of an unpadded Base64URL string
pub fn decoded_len(input: &str) -> usize {
    input.len() * 3 / 4
}

/// Check that every character belongs to the Base64URL alphabet
pub fn is_alphabet(input: &str) -> bool {
    input
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_bytes() {
        assert_eq!(encode_bytes(b""), "");
        assert_eq!(encode_bytes(b"f"), "Zg");
        assert_eq!(encode_bytes(b"fo"), "Zm8");
        assert_eq!(encode_bytes(b"foo"), "Zm9v");
        assert_eq!(encode_bytes(b"foobar"), "Zm9vYmFy");
        assert_eq!(encode_bytes([1u8, 2, 3]), "AQID");
    }

    #[test]
    fn test_url_safe_characters() {
        let encoded = encode_bytes([0xfb, 0xff]);
        assert_eq!(encoded, "-_8");
        assert!(!encoded.contains('+'));
        assert!(!encoded.contains('/'));
    }

    #[test]
    fn test_decode_invalid() {
        assert!(decode_bytes("!!!", 1000).is_err());
        // Standard base64 with padding is rejected
        assert!(decode_bytes("SGVsbG8=", 1000).is_err());
        // A single trailing character can never be a complete group
        assert!(decode_bytes("A", 1000).is_err());
    }

    #[test]
    fn test_decode_with_limit() {
        assert_eq!(decode_bytes("SGVsbG8", 10).unwrap(), b"Hello");
        assert!(decode_bytes("SGVsbG8", 3).is_err());
    }

    #[test]
    fn test_decode_empty() {
        assert_eq!(decode_bytes("", 10).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_decode_string() {
        assert_eq!(decode_string("SGVsbG8", 10).unwrap(), "Hello");
        // 0xff 0xfe is not UTF-8
        assert!(matches!(
            decode_string("__4", 10),
            Err(Error::FormatInvalidBase64(_))
        ));
    }

    #[test]
    fn test_decoded_len() {
        for input in ["", "f", "fo", "foo", "foob", "fooba", "foobar"] {
            assert_eq!(decoded_len(&encode(input)), input.len());
        }
    }

    #[test]
    fn test_is_alphabet() {
        assert!(is_alphabet("abcXYZ019-_"));
        assert!(!is_alphabet("abc="));
        assert!(!is_alphabet("a+b"));
        assert!(!is_alphabet("a b"));
        assert!(is_alphabet(""));
    }
}
