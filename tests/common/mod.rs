//! Shared fixtures for integration tests
//!
//! - `Hs256Key`: a real HMAC-SHA256 key, so signatures change with every byte
//! - `RecordingProvider`: a `KeyProvider` that logs every request it receives

#![allow(dead_code)]

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use jwtcodec::{JsonObject, Key, KeyError, KeyProvider, Signature};
use serde_json::Value;
use sha2::Sha256;
use std::collections::HashMap;
use std::sync::Mutex;

/// Build a `JsonObject` from a `json!` literal
pub fn object(value: Value) -> JsonObject {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// HMAC-SHA256 key used as a stand-in for an external key implementation
#[derive(Debug, Clone, PartialEq)]
pub struct Hs256Key {
    secret: Vec<u8>,
}

impl Hs256Key {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            secret: secret.to_vec(),
        }
    }

    fn mac(&self, data: &[u8]) -> Hmac<Sha256> {
        let mut mac = Hmac::<Sha256>::new_from_slice(&self.secret).unwrap();
        mac.update(data);
        mac
    }
}

#[async_trait]
impl Key for Hs256Key {
    fn algorithms(&self) -> Vec<String> {
        vec!["HS256".to_string()]
    }

    async fn sign(&self, algorithm: &str, data: &[u8]) -> Result<Signature, KeyError> {
        if algorithm != "HS256" {
            return Err(format!("unsupported algorithm {algorithm}").into());
        }
        Ok(Signature::Bytes(self.mac(data).finalize().into_bytes().to_vec()))
    }

    async fn verify(
        &self,
        algorithm: &str,
        signature: &[u8],
        data: &[u8],
    ) -> Result<bool, KeyError> {
        if algorithm != "HS256" {
            return Err(format!("unsupported algorithm {algorithm}").into());
        }
        Ok(self.mac(data).verify_slice(signature).is_ok())
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ProviderError {
    #[error("cannot resolve {0}")]
    Unresolvable(String),

    #[error("malformed jwk: {0}")]
    MalformedJwk(String),
}

/// Provider with a fixed identifier table and JWK secrets under `"k"`
#[derive(Default)]
pub struct RecordingProvider {
    keys: HashMap<String, Hs256Key>,
    requests: Mutex<Vec<String>>,
}

impl RecordingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(mut self, identifier: &str, key: Hs256Key) -> Self {
        self.keys.insert(identifier.to_string(), key);
        self
    }

    /// Every request so far, as `resolve:<id>` or `jwk`
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl KeyProvider for RecordingProvider {
    type Key = Hs256Key;
    type Error = ProviderError;

    async fn resolve(&self, identifier: &str) -> Result<Hs256Key, ProviderError> {
        self.requests
            .lock()
            .unwrap()
            .push(format!("resolve:{identifier}"));
        self.keys
            .get(identifier)
            .cloned()
            .ok_or_else(|| ProviderError::Unresolvable(identifier.to_string()))
    }

    async fn create_from_jwk(&self, jwk: &Value) -> Result<Hs256Key, ProviderError> {
        self.requests.lock().unwrap().push("jwk".to_string());
        jwk.get("k")
            .and_then(Value::as_str)
            .map(|secret| Hs256Key::new(secret.as_bytes()))
            .ok_or_else(|| ProviderError::MalformedJwk(jwk.to_string()))
    }
}
