use crate::codec::TokenCodec;
use crate::error::{Error, Result};
use crate::keys::{Key, KeyProvider};
use crate::limits::{MAX_DECODED_HEADER_SIZE, MAX_DECODED_PAYLOAD_SIZE};
use crate::segment::{JsonObject, decode_segment_bounded};
use crate::signer::Signer;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// The payload part of the signing input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadSegment {
    /// Base64URL-encoded payload (the usual case)
    Encoded(String),

    /// Raw bytes signed verbatim; the compact form carries a detached payload
    Unencoded(Vec<u8>),
}

impl PayloadSegment {
    /// Bytes contributed to the signing input
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            PayloadSegment::Encoded(segment) => segment.as_bytes(),
            PayloadSegment::Unencoded(bytes) => bytes,
        }
    }

    /// The encoded segment, if this payload is encoded
    pub fn as_encoded(&self) -> Option<&str> {
        match self {
            PayloadSegment::Encoded(segment) => Some(segment),
            PayloadSegment::Unencoded(_) => None,
        }
    }
}

impl Default for PayloadSegment {
    fn default() -> Self {
        PayloadSegment::Encoded(String::new())
    }
}

/// A compact-serialized JSON Web Token
///
/// A token comes from one of two places:
/// - [`Token::parse`] on a received string. Parsed tokens always carry
///   non-empty segments and non-empty decoded header and payload objects.
/// - [`Token::new`] (or [`Token::from_claims`], [`Token::from_segments`],
///   [`Token::with_unencoded_payload`]) for a token about to be signed. The
///   header and payload stay freely mutable until [`Token::sign`] encodes
///   them and assembles the compact string.
///
/// The signing input is always recomputed from the current segments, so
/// editing the decoded header or payload of a parsed token never changes
/// what [`Token::verify`] checks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Token {
    pub(crate) raw: Option<String>,
    pub(crate) header_segment: String,
    pub(crate) payload_segment: PayloadSegment,
    pub(crate) signature_segment: String,
    pub(crate) header: Option<JsonObject>,
    pub(crate) payload: Option<JsonObject>,
}

impl Token {
    /// Create an unsigned token from header and payload objects
    pub fn new(header: JsonObject, payload: JsonObject) -> Self {
        Self {
            header: Some(header),
            payload: Some(payload),
            ..Default::default()
        }
    }

    /// Create an unsigned token from typed header and payload values
    ///
    /// Both values must serialize to JSON objects.
    pub fn from_claims<H, P>(header: &H, payload: &P) -> Result<Self>
    where
        H: Serialize + ?Sized,
        P: Serialize + ?Sized,
    {
        Ok(Self::new(to_object(header, "header")?, to_object(payload, "payload")?))
    }

    /// Create an unsigned token from segments that are already encoded
    ///
    /// Signing leaves these segments untouched and signs them as given.
    pub fn from_segments(
        header_segment: impl Into<String>,
        payload_segment: impl Into<String>,
    ) -> Self {
        Self {
            header_segment: header_segment.into(),
            payload_segment: PayloadSegment::Encoded(payload_segment.into()),
            ..Default::default()
        }
    }

    /// Create an unsigned token whose payload bytes are signed without encoding
    ///
    /// The assembled compact form detaches the payload: `header..signature`.
    pub fn with_unencoded_payload(header: JsonObject, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            header: Some(header),
            payload_segment: PayloadSegment::Unencoded(payload.into()),
            ..Default::default()
        }
    }

    /// Parse a compact JWT string with the default [`TokenCodec`]
    ///
    /// # Example
    /// ```ignore
    /// let token = Token::parse("eyJ...")?;
    /// ```
    pub fn parse(token: &str) -> Result<Self> {
        TokenCodec::default().parse(token)
    }

    /// Decode header and payload segments into objects where the objects are
    /// absent or empty
    ///
    /// Objects that are already populated are left as they are. Segments that
    /// fail to decode leave the object absent.
    pub fn decode(&mut self) {
        self.decode_bounded(MAX_DECODED_HEADER_SIZE, MAX_DECODED_PAYLOAD_SIZE);
    }

    pub(crate) fn decode_bounded(&mut self, max_header_size: usize, max_payload_size: usize) {
        if !self.header_segment.is_empty() && is_absent_or_empty(&self.header) {
            self.header = decode_segment_bounded(&self.header_segment, max_header_size);
        }

        if let Some(segment) = self.payload_segment.as_encoded() {
            if !segment.is_empty() && is_absent_or_empty(&self.payload) {
                self.payload = decode_segment_bounded(segment, max_payload_size);
            }
        }
    }

    /// The compact string, once parsed or signed
    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    pub fn header(&self) -> Option<&JsonObject> {
        self.header.as_ref()
    }

    pub fn payload(&self) -> Option<&JsonObject> {
        self.payload.as_ref()
    }

    /// Mutable header, created empty if absent
    pub fn header_mut(&mut self) -> &mut JsonObject {
        self.header.get_or_insert_with(JsonObject::new)
    }

    /// Mutable payload, created empty if absent
    pub fn payload_mut(&mut self) -> &mut JsonObject {
        self.payload.get_or_insert_with(JsonObject::new)
    }

    pub fn header_segment(&self) -> &str {
        &self.header_segment
    }

    pub fn payload_segment(&self) -> &PayloadSegment {
        &self.payload_segment
    }

    pub fn signature_segment(&self) -> &str {
        &self.signature_segment
    }

    /// The `alg` header value
    pub fn algorithm(&self) -> Option<&str> {
        self.header_str("alg")
    }

    /// The `kid` header value
    pub fn key_id(&self) -> Option<&str> {
        self.header_str("kid")
    }

    /// The `iss` claim from the payload
    pub fn issuer(&self) -> Option<&str> {
        self.payload
            .as_ref()
            .and_then(|p| p.get("iss"))
            .and_then(Value::as_str)
    }

    fn header_str(&self, name: &str) -> Option<&str> {
        self.header
            .as_ref()
            .and_then(|h| h.get(name))
            .and_then(Value::as_str)
    }

    /// Deserialize the payload into a typed claims value
    ///
    /// Note: You should not trust this data until after signature verification!
    pub fn claims<T: DeserializeOwned>(&self) -> Result<T> {
        from_object(self.payload.as_ref(), "payload")
    }

    /// Deserialize the header into a typed value
    pub fn header_as<T: DeserializeOwned>(&self) -> Result<T> {
        from_object(self.header.as_ref(), "header")
    }

    /// The signing input: `header_segment "." payload_segment`
    pub fn signing_input(&self) -> Vec<u8> {
        signing_input(&self.header_segment, &self.payload_segment)
    }

    /// Sign with the default [`TokenCodec`]; see [`TokenCodec::sign`]
    pub async fn sign(&mut self, signer: Signer<'_>, algorithm: Option<&str>) -> Result<()> {
        TokenCodec::default().sign(self, signer, algorithm).await
    }

    /// Verify with the default [`TokenCodec`]; see [`TokenCodec::verify`]
    pub async fn verify<K: Key + ?Sized>(&self, key: &K) -> Result<bool> {
        TokenCodec::default().verify(self, key).await
    }

    /// Discover a verification key; see [`TokenCodec::find_key`]
    pub async fn find_key<P: KeyProvider + ?Sized>(
        &self,
        provider: &P,
    ) -> std::result::Result<Option<P::Key>, P::Error> {
        TokenCodec::default().find_key(self, provider).await
    }
}

impl FromStr for Token {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Token::parse(s)
    }
}

impl TryFrom<&str> for Token {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Token::parse(s)
    }
}

/// Writes the compact string once the token has been parsed or signed, and
/// nothing before that
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.raw.as_deref().unwrap_or_default())
    }
}

pub(crate) fn signing_input(header_segment: &str, payload_segment: &PayloadSegment) -> Vec<u8> {
    let payload = payload_segment.as_bytes();
    let mut input = Vec::with_capacity(header_segment.len() + 1 + payload.len());
    input.extend_from_slice(header_segment.as_bytes());
    input.push(b'.');
    input.extend_from_slice(payload);
    input
}

/// Join segments into the compact serialization, detaching unencoded payloads
pub(crate) fn compact(
    header_segment: &str,
    payload_segment: &PayloadSegment,
    signature_segment: &str,
) -> String {
    let payload = payload_segment.as_encoded().unwrap_or_default();
    format!("{header_segment}.{payload}.{signature_segment}")
}

pub(crate) fn is_absent_or_empty(object: &Option<JsonObject>) -> bool {
    object.as_ref().is_none_or(|o| o.is_empty())
}

fn to_object<T: Serialize + ?Sized>(value: &T, part: &str) -> Result<JsonObject> {
    match serde_json::to_value(value) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(_) => Err(Error::FormatInvalidJson(format!(
            "{part} must serialize to a JSON object"
        ))),
        Err(e) => Err(Error::FormatInvalidJson(format!(
            "Failed to serialize {part}: {e}"
        ))),
    }
}

fn from_object<T: DeserializeOwned>(object: Option<&JsonObject>, part: &str) -> Result<T> {
    let object = object.ok_or_else(|| Error::FormatInvalidJson(format!("{part} is absent")))?;
    serde_json::from_value(Value::Object(object.clone()))
        .map_err(|e| Error::FormatInvalidJson(format!("Failed to parse {part}: {e}")))
}
