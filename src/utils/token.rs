//! Opaque refresh-token generation and digesting.
//!
//! Refresh tokens are 32 bytes of CSPRNG output, hex encoded. Only their
//! SHA-256 digest is persisted; the raw value is returned to the client
//! exactly once. The digest is a fast lookup key, not a password hash: the
//! token's own entropy is the security boundary, so a compromised table
//! yields nothing redeemable.

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Number of random bytes in a raw refresh token.
const REFRESH_TOKEN_BYTES: usize = 32;

/// Generates a new opaque refresh token (64 hex characters).
pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Computes the digest under which a refresh token is stored and looked up.
pub fn hash_refresh_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
