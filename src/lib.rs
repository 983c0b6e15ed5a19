//! # jwtcodec - Compact JWT Encoding, Signing and Key Discovery
//!
//! **jwtcodec** parses and produces JSON Web Tokens in compact serialization and
//! drives their signature lifecycle against keys you bring. It does not ship any
//! signature algorithm and does not fetch keys: both are capabilities supplied
//! through the [`Key`] and [`KeyProvider`] traits, so the same codec works with
//! software keys, HSMs, DID resolvers or JWKS endpoints.
//!
//! ## Overview
//!
//! A compact JWT is three Base64URL segments joined by `.`:
//!
//! ```text
//! base64url(header-json) . base64url(payload-json) . base64url(signature)
//! ```
//!
//! The signature covers the *signing input* `header-segment "." payload-segment`,
//! exactly as the bytes appear on the wire. [`TokenCodec`] combines four steps:
//!
//! - **Parse**: split and decode a received string into a [`Token`]
//! - **Serialize**: encode header and payload objects into segments
//! - **Discover**: pick a verification key from the token's `kid`, `jwk` or `iss`
//! - **Sign / Verify**: run the signing input through a [`Signer`] or a [`Key`]
//!
//! ## Quick Start
//!
//! ```ignore
//! use jwtcodec::*;
//!
//! // Sign
//! let mut token = Token::from_claims(
//!     &serde_json::json!({"typ": "JWT", "kid": "did:example:123#key-1"}),
//!     &serde_json::json!({"iss": "did:example:123", "sub": "u1"}),
//! )?;
//! token.sign(Signer::key(&signing_key), Some("ES256")).await?;
//!
//! // Parse, discover, verify
//! let received = Token::parse(token.raw().unwrap_or_default())?;
//! let key = received.find_key(&resolver).await?.ok_or("no key")?;
//! assert!(received.verify(&key).await?);
//! ```
//!
//! ## Key Discovery
//!
//! [`TokenCodec::find_key`] tries, in order, and stops at the first key found:
//!
//! ```text
//! header.kid  ──(strip #fragment, '=')──▶ resolve          (errors skipped)
//! header.jwk  ────────────────────────▶ create_from_jwk  (errors returned)
//! header.iss  ────────────────────────▶ resolve          (errors skipped)
//! payload.iss ────────────────────────▶ resolve          (errors skipped)
//! ```
//!
//! `Ok(None)` means no key could be determined.
//!
//! ## Errors
//!
//! Parsing has a single failure, [`Error::InvalidToken`]. Segment decoding never
//! fails on its own: an undecodable segment is simply absent, and the parser
//! rejects tokens whose header or payload end up absent or empty. A signature
//! that does not match is `Ok(false)`, not an error.
//!
//! ## Logging
//!
//! The crate emits [`tracing`](https://docs.rs/tracing) events at `debug` and
//! `trace` level (strategy attempts, swallowed resolution errors, rejected
//! tokens). Install any subscriber to see them.
//!
//! ## References
//!
//! - [RFC 7515](https://datatracker.ietf.org/doc/html/rfc7515): JSON Web Signature (JWS)
//! - [RFC 7519](https://datatracker.ietf.org/doc/html/rfc7519): JSON Web Token (JWT)
//! - [RFC 7797](https://datatracker.ietf.org/doc/html/rfc7797): JWS Unencoded Payload Option

// Core modules
pub mod error;
pub mod utils;

pub(crate) mod limits;

// Serialization and token types
pub mod segment;
pub mod token;

// Keys, discovery and signatures
pub mod keys;
pub mod signer;

// Codec (main public API)
pub mod codec;

// ============================================================================
// PUBLIC API
// ============================================================================

pub use codec::TokenCodec;
pub use token::{PayloadSegment, Token};

pub use keys::{Key, KeyError, KeyProvider, Signature, normalize_key_id};
pub use signer::{Signer, SigningFn};

pub use error::{Error, Result};
pub use segment::{JsonObject, decode_segment, encode_segment};
