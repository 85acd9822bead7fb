//! HMAC-SHA256 webhook signatures.
//!
//! A gateway signs the raw webhook body with the shared secret and sends the
//! lowercase hex digest in the `x-signature` header.

use sha2::{Digest, Sha256};

const BLOCK_SIZE: usize = 64;

/// HMAC-SHA256 (RFC 2104) of `payload` under `secret`.
fn hmac_sha256(secret: &[u8], payload: &[u8]) -> [u8; 32] {
    let mut key = [0u8; BLOCK_SIZE];
    if secret.len() > BLOCK_SIZE {
        key[..32].copy_from_slice(&Sha256::digest(secret));
    } else {
        key[..secret.len()].copy_from_slice(secret);
    }

    let mut inner = Sha256::new();
    inner.update(key.map(|b| b ^ 0x36));
    inner.update(payload);
    let inner = inner.finalize();

    let mut outer = Sha256::new();
    outer.update(key.map(|b| b ^ 0x5c));
    outer.update(inner);
    outer.finalize().into()
}

/// Signature a gateway sends for `payload`: hex-encoded HMAC-SHA256.
pub fn sign_webhook(secret: &str, payload: &str) -> String {
    hex::encode(hmac_sha256(secret.as_bytes(), payload.as_bytes()))
}

/// Checks `signature` against `payload` without short-circuiting on the
/// first differing byte.
pub fn verify_webhook(secret: &str, payload: &str, signature: &str) -> bool {
    let Ok(given) = hex::decode(signature.trim()) else {
        return false;
    };
    let expected = hmac_sha256(secret.as_bytes(), payload.as_bytes());
    given.len() == expected.len()
        && given
            .iter()
            .zip(expected.iter())
            .fold(0u8, |diff, (a, b)| diff | (a ^ b))
            == 0
}
