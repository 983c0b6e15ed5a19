//! Signature creation and verification
//!
//! Signing encodes the header and payload, computes the signing input and asks
//! the [`Signer`] for a signature. Verification recomputes the signing input
//! from the segments exactly as received and hands it to a [`Key`].

use crate::error::{Error, Result};
use crate::keys::{Key, Signature};
use crate::limits::{MAX_DECODED_SIGNATURE_SIZE, SizeLimits};
use crate::segment::encode_segment;
use crate::token::{PayloadSegment, Token, compact, signing_input};
use crate::utils::base64url;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use tracing::debug;

/// Bare signing function over the signing input
///
/// Returns the Base64URL-encoded signature. Used for external or opaque
/// signing schemes; no algorithm is written into the header.
pub type SigningFn = Box<
    dyn Fn(Vec<u8>) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'static>>
        + Send
        + Sync,
>;

/// What produces the signature in [`TokenCodec::sign`](crate::TokenCodec::sign)
pub enum Signer<'a> {
    /// A key; the chosen algorithm is recorded in the header's `alg`
    Key(&'a dyn Key),

    /// A bare signing function; the header is signed as it stands
    Function(SigningFn),
}

impl<'a> Signer<'a> {
    pub fn key<K: Key>(key: &'a K) -> Self {
        Signer::Key(key)
    }

    /// Wrap an async closure as a [`Signer::Function`]
    ///
    /// # Example
    /// ```ignore
    /// let signer = Signer::function(|data| async move {
    ///     Ok(base64url::encode_bytes(hsm.sign(&data).await?))
    /// });
    /// ```
    pub fn function<F, Fut>(f: F) -> Self
    where
        F: Fn(Vec<u8>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String>> + Send + 'static,
    {
        Signer::Function(Box::new(move |data| Box::pin(f(data))))
    }
}

impl<'a, K: Key> From<&'a K> for Signer<'a> {
    fn from(key: &'a K) -> Self {
        Signer::Key(key)
    }
}

impl std::fmt::Debug for Signer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Signer::Key(key) => f.debug_tuple("Key").field(&key.algorithms()).finish(),
            Signer::Function(_) => f.write_str("Function"),
        }
    }
}

/// Sign `token` in place
///
/// The new header, segments and raw string are built aside and written to
/// `token` only once the signature is in hand and every limit holds. On
/// success `header.alg` (key signers only), the segments and the raw string
/// are replaced; on error `token` is untouched.
pub(crate) async fn sign(
    token: &mut Token,
    signer: Signer<'_>,
    algorithm: Option<&str>,
    default_algorithm: &str,
    limits: &SizeLimits,
) -> Result<()> {
    let algorithm = algorithm
        .or_else(|| token.algorithm())
        .unwrap_or(default_algorithm)
        .to_string();

    let mut header = token.header.clone();
    if let (Signer::Key(_), Some(header)) = (&signer, header.as_mut()) {
        header.insert("alg".to_string(), Value::String(algorithm.clone()));
    }

    // Absent objects keep whatever segment was built beforehand
    let header_segment = match &header {
        Some(header) => encode_segment(header),
        None => token.header_segment.clone(),
    };
    let payload_segment = match &token.payload {
        Some(payload) => PayloadSegment::Encoded(encode_segment(payload)),
        None => token.payload_segment.clone(),
    };
    if header_segment.is_empty() {
        return Err(Error::SegmentMissing("header"));
    }

    check_segment_size("header", &header_segment, limits.max_header_size)?;
    if let Some(payload) = payload_segment.as_encoded() {
        check_segment_size("payload", payload, limits.max_payload_size)?;
    }

    let data = signing_input(&header_segment, &payload_segment);
    let signature = match signer {
        Signer::Key(key) => {
            debug!(%algorithm, "signing with key");
            match key
                .sign(&algorithm, &data)
                .await
                .map_err(|e| Error::Signing(e.to_string()))?
            {
                Signature::Bytes(bytes) => base64url::encode_bytes(bytes),
                Signature::Encoded(encoded) => encoded,
            }
        }
        Signer::Function(f) => {
            debug!("signing with signing function");
            f(data).await?
        }
    };

    if signature.is_empty() || !base64url::is_alphabet(&signature) {
        return Err(Error::Signing(
            "signer did not return a non-empty unpadded Base64URL signature".to_string(),
        ));
    }

    let raw = compact(&header_segment, &payload_segment, &signature);
    if raw.len() > limits.max_token_length {
        debug!(
            length = raw.len(),
            max = limits.max_token_length,
            "signed token exceeds maximum length"
        );
        return Err(Error::TokenTooLarge {
            size: raw.len(),
            max: limits.max_token_length,
        });
    }

    token.header = header;
    token.header_segment = header_segment;
    token.payload_segment = payload_segment;
    token.signature_segment = signature;
    token.raw = Some(raw);
    Ok(())
}

/// Reject a segment whose decoded JSON would not pass the parser's limit
fn check_segment_size(segment: &'static str, encoded: &str, max: usize) -> Result<()> {
    let size = base64url::decoded_len(encoded);
    if size > max {
        debug!(segment, size, max, "segment exceeds maximum size");
        return Err(Error::SegmentTooLarge { segment, size, max });
    }
    Ok(())
}

/// Verify the signature of `token` with `key`
///
/// A mismatch is `Ok(false)`.
pub(crate) async fn verify<K: Key + ?Sized>(token: &Token, key: &K) -> Result<bool> {
    let algorithm = match token.algorithm() {
        Some(algorithm) => algorithm.to_string(),
        None => key
            .algorithms()
            .into_iter()
            .next()
            .ok_or(Error::AlgorithmMissing)?,
    };

    let signature =
        base64url::decode_bytes(token.signature_segment(), MAX_DECODED_SIGNATURE_SIZE)?;
    let data = token.signing_input();

    let verified = key
        .verify(&algorithm, &signature, &data)
        .await
        .map_err(|e| Error::KeyOperation(e.to_string()))?;

    if !verified {
        debug!(%algorithm, "signature mismatch");
    }
    Ok(verified)
}
