//! Key capabilities consumed by the codec
//!
//! jwtcodec never implements signature algorithms or key resolution itself.
//! Callers plug in:
//! - a [`Key`] that can sign and verify for one or more algorithms
//! - a [`KeyProvider`] that resolves identifiers (a `kid`, a DID, an issuer URL)
//!   and constructs keys from embedded JWKs
//!
//! [`TokenCodec::find_key`](crate::TokenCodec::find_key) walks the token's
//! claims to pick the key.

pub(crate) mod discovery;

pub use discovery::normalize_key_id;

use async_trait::async_trait;
use serde_json::Value;

/// Failure reported by a [`Key`] operation
pub type KeyError = Box<dyn std::error::Error + Send + Sync>;

/// Output of [`Key::sign`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signature {
    /// Raw signature bytes, Base64URL-encoded by the codec
    Bytes(Vec<u8>),

    /// Signature already encoded as a Base64URL string (no padding)
    Encoded(String),
}

impl From<Vec<u8>> for Signature {
    fn from(bytes: Vec<u8>) -> Self {
        Signature::Bytes(bytes)
    }
}

impl From<String> for Signature {
    fn from(encoded: String) -> Self {
        Signature::Encoded(encoded)
    }
}

/// A cryptographic key able to sign and verify JWS signing inputs
#[async_trait]
pub trait Key: Send + Sync {
    /// Algorithm identifiers this key supports, preferred first
    fn algorithms(&self) -> Vec<String>;

    /// Sign `data` with `algorithm`
    async fn sign(
        &self,
        algorithm: &str,
        data: &[u8],
    ) -> std::result::Result<Signature, KeyError>;

    /// Verify `signature` over `data` with `algorithm`
    ///
    /// A mismatching signature is `Ok(false)`. `Err` is reserved for keys that
    /// cannot perform the check at all (unsupported algorithm, hardware fault).
    async fn verify(
        &self,
        algorithm: &str,
        signature: &[u8],
        data: &[u8],
    ) -> std::result::Result<bool, KeyError>;
}

/// Source of verification keys
#[async_trait]
pub trait KeyProvider: Send + Sync {
    /// The key type produced by this provider
    type Key: Key;

    /// Error reported by resolution and construction
    type Error: std::error::Error + Send + Sync;

    /// Resolve an identifier (key ID, DID, issuer) to a key
    async fn resolve(&self, identifier: &str) -> std::result::Result<Self::Key, Self::Error>;

    /// Construct a key from an embedded JSON Web Key
    async fn create_from_jwk(&self, jwk: &Value) -> std::result::Result<Self::Key, Self::Error>;
}

#[async_trait]
impl<K: Key + ?Sized> Key for std::sync::Arc<K> {
    fn algorithms(&self) -> Vec<String> {
        (**self).algorithms()
    }

    async fn sign(
        &self,
        algorithm: &str,
        data: &[u8],
    ) -> std::result::Result<Signature, KeyError> {
        (**self).sign(algorithm, data).await
    }

    async fn verify(
        &self,
        algorithm: &str,
        signature: &[u8],
        data: &[u8],
    ) -> std::result::Result<bool, KeyError> {
        (**self).verify(algorithm, signature, data).await
    }
}
