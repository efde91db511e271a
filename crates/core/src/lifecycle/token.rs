//! Deletion token generation

use haven_domain::constants::DELETION_TOKEN_BYTES;
use rand::RngCore;

/// Generate a fresh deletion token: random bytes from the OS-seeded RNG,
/// hex-encoded. The token is a bearer secret, so it must be unguessable;
/// uniqueness across profiles is additionally enforced by the store.
pub fn generate_deletion_token() -> String {
    let mut bytes = [0u8; DELETION_TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Minimal shape check before hitting storage: tokens we issue are always
/// lowercase hex of a fixed length.
pub fn is_plausible_token(token: &str) -> bool {
    token.len() == DELETION_TOKEN_BYTES * 2
        && token.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}
