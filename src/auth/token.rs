// src/auth/token.rs
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

pub const DEFAULT_TOKEN_BYTES: usize = 16;
pub const SALT_BYTES: usize = 16;

/// Random URL-safe token from the OS RNG. Used for JWT ids.
pub fn generate_token_default() -> String {
    let mut rng = OsRng;
    generate_token(&mut rng, DEFAULT_TOKEN_BYTES)
}

/// Base64 URL-safe (no padding) encoding of `nbytes` random bytes.
pub fn generate_token<R: RngCore>(rng: &mut R, nbytes: usize) -> String {
    let mut buf = vec![0u8; nbytes];
    rng.fill_bytes(&mut buf);
    base64_url_nopad(&buf)
}

/// Salted SHA-256 password hash, stored as `salt$digest` (both base64).
pub fn hash_password(password: &str) -> String {
    let mut rng = OsRng;
    hash_password_with(&mut rng, password)
}

pub fn hash_password_with<R: RngCore>(rng: &mut R, password: &str) -> String {
    let mut salt = [0u8; SALT_BYTES];
    rng.fill_bytes(&mut salt);
    let digest = salted_digest(&salt, password);
    format!("{}${}", base64_url_nopad(&salt), base64_url_nopad(&digest))
}

/// False for a wrong password and for anything that isn't a stored hash.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt, digest)) = stored.split_once('$') else {
        return false;
    };
    let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
    let (Ok(salt), Ok(expected)) = (engine.decode(salt), engine.decode(digest)) else {
        return false;
    };

    hashes_equal(&salted_digest(&salt, password), &expected)
}

fn salted_digest(salt: &[u8], password: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    let out = hasher.finalize();
    let mut arr = [0u8; 32];
    arr.copy_from_slice(&out);
    arr
}

/// Constant-time-ish compare for hashes.
pub fn hashes_equal(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff: u8 = 0;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

fn base64_url_nopad(bytes: &[u8]) -> String {
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}
