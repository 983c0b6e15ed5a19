use crate::error::Result;
use crate::keys::discovery;
use crate::keys::{Key, KeyProvider};
use crate::limits::{
    DEFAULT_ALGORITHM, MAX_DECODED_HEADER_SIZE, MAX_DECODED_PAYLOAD_SIZE, MAX_TOKEN_LENGTH,
    SizeLimits,
};
use crate::segment::{JsonObject, decode_segment_bounded, encode_segment};
use crate::signer::{self, Signer};
use crate::token::{Token, parser};

/// JWT codec
///
/// Parses, serializes, signs and verifies compact tokens and discovers their
/// verification keys. The codec is configured once and can be reused for any
/// number of tokens; it holds no per-token state.
///
/// # Example
/// ```ignore
/// let codec = TokenCodec::new().default_algorithm("EdDSA").build();
///
/// let mut token = Token::new(header, payload);
/// codec.sign(&mut token, Signer::key(&key), None).await?;
///
/// let parsed = codec.parse(token.raw().unwrap_or_default())?;
/// if let Some(key) = codec.find_key(&parsed, &provider).await? {
///     assert!(codec.verify(&parsed, &key).await?);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct TokenCodec {
    config_default_algorithm: String,
    config_max_token_length: usize,
    config_max_header_size: usize,
    config_max_payload_size: usize,
}

impl TokenCodec {
    /// Create a new codec with default limits and `ES256` as default algorithm
    pub fn new() -> Self {
        Self {
            config_default_algorithm: DEFAULT_ALGORITHM.to_string(),
            config_max_token_length: MAX_TOKEN_LENGTH,
            config_max_header_size: MAX_DECODED_HEADER_SIZE,
            config_max_payload_size: MAX_DECODED_PAYLOAD_SIZE,
        }
    }

    /// Algorithm used by `sign` when neither the caller nor the header names one
    pub fn default_algorithm(&mut self, algorithm: impl Into<String>) -> &mut Self {
        self.config_default_algorithm = algorithm.into();
        self
    }

    /// Longest compact string `parse` accepts and `sign` produces
    pub fn max_token_length(&mut self, length: usize) -> &mut Self {
        self.config_max_token_length = length;
        self
    }

    /// Largest decoded header JSON `parse` accepts and `sign` produces
    pub fn max_header_size(&mut self, size: usize) -> &mut Self {
        self.config_max_header_size = size;
        self
    }

    /// Largest decoded payload JSON `parse` accepts and `sign` produces
    pub fn max_payload_size(&mut self, size: usize) -> &mut Self {
        self.config_max_payload_size = size;
        self
    }

    pub fn build(&mut self) -> Self {
        self.clone()
    }

    fn limits(&self) -> SizeLimits {
        SizeLimits {
            max_token_length: self.config_max_token_length,
            max_header_size: self.config_max_header_size,
            max_payload_size: self.config_max_payload_size,
        }
    }
}

impl TokenCodec {
    /// Parse a compact JWT string
    ///
    /// Fails with [`Error::InvalidToken`](crate::Error::InvalidToken) unless the
    /// input is three non-empty Base64URL segments whose header and payload
    /// decode to non-empty JSON objects.
    pub fn parse(&self, token: &str) -> Result<Token> {
        parser::parse(token, &self.limits())
    }

    /// Encode a JSON object as a Base64URL segment
    pub fn encode_segment(&self, object: &JsonObject) -> String {
        encode_segment(object)
    }

    /// Decode a Base64URL segment into a JSON object, `None` on any failure
    pub fn decode_segment(&self, segment: &str) -> Option<JsonObject> {
        decode_segment_bounded(segment, self.config_max_payload_size)
    }

    /// Discover the key that should verify `token`
    ///
    /// Tries header `kid`, header `jwk`, header `iss`, then payload `iss`, and
    /// returns the first key found. `Ok(None)` means no key could be
    /// determined. Only a failing `jwk` construction is returned as an error.
    pub async fn find_key<P: KeyProvider + ?Sized>(
        &self,
        token: &Token,
        provider: &P,
    ) -> std::result::Result<Option<P::Key>, P::Error> {
        discovery::find_key(token.header(), token.payload(), provider).await
    }

    /// Sign `token` in place
    ///
    /// The algorithm is `algorithm`, else the header's `alg`, else the codec
    /// default. With [`Signer::Key`] the algorithm is written into the
    /// header's `alg` before encoding; [`Signer::Function`] leaves the header
    /// alone. Header and payload objects are re-encoded into their segments
    /// (absent objects keep pre-built segments), the signing input is signed
    /// and the compact string is assembled.
    ///
    /// Fails with [`Error::SegmentTooLarge`](crate::Error::SegmentTooLarge) or
    /// [`Error::TokenTooLarge`](crate::Error::TokenTooLarge) when the result
    /// would exceed this codec's limits, so every signed token parses with the
    /// same codec. On any error `token` is left exactly as it was.
    pub async fn sign(
        &self,
        token: &mut Token,
        signer: Signer<'_>,
        algorithm: Option<&str>,
    ) -> Result<()> {
        signer::sign(
            token,
            signer,
            algorithm,
            &self.config_default_algorithm,
            &self.limits(),
        )
        .await
    }

    /// Verify the signature of `token` over its segments as they stand
    ///
    /// Uses the header's `alg`, else the key's first algorithm. A signature
    /// that does not match is `Ok(false)`.
    pub async fn verify<K: Key + ?Sized>(&self, token: &Token, key: &K) -> Result<bool> {
        signer::verify(token, key).await
    }
}

impl Default for TokenCodec {
    fn default() -> Self {
        Self::new()
    }
}
