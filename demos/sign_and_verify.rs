//! Sign a token, parse it back, discover its key and verify it
//!
//! Run with `RUST_LOG=jwtcodec=debug` to see discovery and signing events.
//!
//! 1. Build an unsigned token from header and payload claims
//! 2. Sign it with an HMAC-SHA256 key
//! 3. Parse the compact string as a receiver would
//! 4. Discover the verification key from `kid` via a provider
//! 5. Verify the signature, then tamper with it and verify again

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use jwtcodec::*;
use serde_json::{Value, json};
use sha2::Sha256;
use std::collections::HashMap;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

struct SharedSecret(Vec<u8>);

impl SharedSecret {
    fn mac(&self, data: &[u8]) -> std::result::Result<Hmac<Sha256>, KeyError> {
        let mut mac = Hmac::<Sha256>::new_from_slice(&self.0).map_err(|e| e.to_string())?;
        mac.update(data);
        Ok(mac)
    }
}

#[async_trait]
impl Key for SharedSecret {
    fn algorithms(&self) -> Vec<String> {
        vec!["HS256".to_string()]
    }

    async fn sign(&self, _: &str, data: &[u8]) -> std::result::Result<Signature, KeyError> {
        Ok(Signature::Bytes(self.mac(data)?.finalize().into_bytes().to_vec()))
    }

    async fn verify(
        &self,
        _: &str,
        signature: &[u8],
        data: &[u8],
    ) -> std::result::Result<bool, KeyError> {
        Ok(self.mac(data)?.verify_slice(signature).is_ok())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown identifier: {0}")]
struct UnknownIdentifier(String);

/// In-memory directory of shared secrets by identifier
struct Directory(HashMap<String, Vec<u8>>);

#[async_trait]
impl KeyProvider for Directory {
    type Key = SharedSecret;
    type Error = UnknownIdentifier;

    async fn resolve(&self, identifier: &str) -> std::result::Result<SharedSecret, Self::Error> {
        self.0
            .get(identifier)
            .map(|secret| SharedSecret(secret.clone()))
            .ok_or_else(|| UnknownIdentifier(identifier.to_string()))
    }

    async fn create_from_jwk(&self, jwk: &Value) -> std::result::Result<SharedSecret, Self::Error> {
        Err(UnknownIdentifier(jwk.to_string()))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jwtcodec=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== jwtcodec - Sign and Verify ===\n");

    let secret = b"your-256-bit-secret-key-here!".to_vec();
    let directory = Directory(HashMap::from([(
        "did:example:alice".to_string(),
        secret.clone(),
    )]));

    // Step 1-2: Build and sign
    let mut token = Token::from_claims(
        &json!({"typ": "JWT", "kid": "did:example:alice#key-1"}),
        &json!({"iss": "did:example:alice", "sub": "user123"}),
    )?;
    token
        .sign(Signer::key(&SharedSecret(secret)), Some("HS256"))
        .await?;
    println!("Token: {token}\n");

    // Step 3: Parse
    let parsed = Token::parse(token.raw().unwrap_or_default())?;
    println!("  ✓ Algorithm: {:?}", parsed.algorithm());
    println!("  ✓ Key ID: {:?}", parsed.key_id());

    // Step 4: Discover
    let key = match parsed.find_key(&directory).await {
        Ok(Some(key)) => key,
        Ok(None) => {
            println!("  ✗ No key found");
            return Ok(());
        }
        Err(e) => return Err(Error::KeyOperation(e.to_string())),
    };
    println!("  ✓ Key resolved from kid");

    // Step 5: Verify
    println!("  ✓ Signature valid: {}", parsed.verify(&key).await?);

    let raw = parsed.to_string();
    let (signing_input, signature) = raw.rsplit_once('.').unwrap_or_default();
    let flipped = if signature.starts_with('A') { 'B' } else { 'A' };
    let tampered = format!("{signing_input}.{flipped}{}", signature.get(1..).unwrap_or_default());
    let tampered = Token::parse(&tampered)?;
    println!("  ✓ Tampered signature valid: {}", tampered.verify(&key).await?);

    Ok(())
}
