//! Token codec performance benchmarks
//!
//! Benchmarks parsing by token size, segment encoding and the
//! sign/verify round trip through an HMAC-SHA256 key.

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use jwtcodec::*;

/// Helpers to build keys and tokens of different sizes
mod helpers {
    use async_trait::async_trait;
    use hmac::{Hmac, Mac};
    use jwtcodec::utils::base64url;
    use jwtcodec::{Key, KeyError, Signature};
    use sha2::Sha256;

    pub struct Hs256(pub Vec<u8>);

    impl Hs256 {
        fn mac(&self, data: &[u8]) -> Hmac<Sha256> {
            let mut mac = Hmac::<Sha256>::new_from_slice(&self.0).unwrap();
            mac.update(data);
            mac
        }
    }

    #[async_trait]
    impl Key for Hs256 {
        fn algorithms(&self) -> Vec<String> {
            vec!["HS256".to_string()]
        }

        async fn sign(&self, _: &str, data: &[u8]) -> Result<Signature, KeyError> {
            Ok(Signature::Bytes(self.mac(data).finalize().into_bytes().to_vec()))
        }

        async fn verify(
            &self,
            _: &str,
            signature: &[u8],
            data: &[u8],
        ) -> Result<bool, KeyError> {
            Ok(self.mac(data).verify_slice(signature).is_ok())
        }
    }

    pub fn generate_token_with_payload_size(secret: &[u8], payload_size: usize) -> String {
        let header = r#"{"alg":"HS256","typ":"JWT","kid":"did:example:123#key-1"}"#;

        let mut payload =
            r#"{"sub":"user123","iss":"did:example:123","iat":1516239022"#.to_string();
        let extra_size = payload_size.saturating_sub(payload.len());
        if extra_size > 0 {
            payload.push_str(",\"data\":\"");
            payload.push_str(&"x".repeat(extra_size.saturating_sub(10)));
            payload.push_str("\"}");
        } else {
            payload.push('}');
        }

        let signing_input = format!(
            "{}.{}",
            base64url::encode(header),
            base64url::encode(&payload)
        );
        let signature = Hs256(secret.to_vec())
            .mac(signing_input.as_bytes())
            .finalize()
            .into_bytes();

        format!("{}.{}", signing_input, base64url::encode_bytes(signature))
    }
}

fn bench_parsing_by_size(c: &mut Criterion) {
    use helpers::generate_token_with_payload_size;

    let secret = b"test-secret-key";
    let sizes = vec![64, 256, 1024, 4096, 16384];

    let mut group = c.benchmark_group("parse_by_size");

    for size in sizes {
        let token = generate_token_with_payload_size(secret, size);
        group.throughput(Throughput::Bytes(token.len() as u64));
        group.bench_function(format!("size_{}", size), |b| {
            b.iter(|| {
                let _ = Token::parse(black_box(&token));
            });
        });
    }

    group.finish();
}

fn bench_segments(c: &mut Criterion) {
    let object = serde_json::json!({
        "iss": "did:example:123",
        "sub": "user123",
        "scope": ["read", "write"],
        "iat": 1516239022
    });
    let object = object.as_object().cloned().unwrap_or_default();
    let segment = encode_segment(&object);

    let mut group = c.benchmark_group("segments");

    group.bench_function("encode", |b| {
        b.iter(|| {
            let _ = encode_segment(black_box(&object));
        });
    });

    group.bench_function("decode", |b| {
        b.iter(|| {
            let _ = decode_segment(black_box(&segment));
        });
    });

    group.finish();
}

fn bench_sign_verify(c: &mut Criterion) {
    use helpers::{Hs256, generate_token_with_payload_size};

    let runtime = tokio::runtime::Runtime::new().unwrap();
    let key = Hs256(b"test-secret-key".to_vec());
    let token = Token::parse(&generate_token_with_payload_size(&key.0, 256)).unwrap();

    let mut group = c.benchmark_group("sign_verify");

    group.bench_function("sign", |b| {
        b.iter(|| {
            let mut unsigned = Token::new(
                token.header().cloned().unwrap_or_default(),
                token.payload().cloned().unwrap_or_default(),
            );
            runtime
                .block_on(unsigned.sign(Signer::key(&key), Some("HS256")))
                .unwrap();
            black_box(unsigned);
        });
    });

    group.bench_function("verify", |b| {
        b.iter(|| {
            let valid = runtime.block_on(black_box(&token).verify(&key)).unwrap();
            assert!(valid);
        });
    });

    group.finish();
}

fn bench_invalid_tokens(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_invalid");

    // Missing parts
    group.bench_function("missing_parts", |b| {
        let invalid = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9";
        b.iter(|| {
            let _ = Token::parse(black_box(invalid));
        });
    });

    // Characters outside the alphabet
    group.bench_function("invalid_alphabet", |b| {
        let invalid = "invalid.base64.signature!!!";
        b.iter(|| {
            let _ = Token::parse(black_box(invalid));
        });
    });

    // Valid alphabet, not JSON underneath
    group.bench_function("invalid_json", |b| {
        let invalid = "eyJpbnZhbGlkX2pzb24.Invalid.Signature";
        b.iter(|| {
            let _ = Token::parse(black_box(invalid));
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_parsing_by_size,
    bench_segments,
    bench_sign_verify,
    bench_invalid_tokens
);
criterion_main!(benches);
