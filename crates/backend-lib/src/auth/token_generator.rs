// ============================
// crates/backend-lib/src/auth/token_generator.rs
// ============================
//! Session token generation.
//!
//! Tokens are 32 bytes from the OS RNG, base64url encoded without padding,
//! which gives a fixed 43 character cookie value.
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::{rngs::OsRng, RngCore};

/// Token size in bytes (256 bits of entropy)
const TOKEN_BYTES: usize = 32;

/// Encoded token length
pub const TOKEN_LEN: usize = 43;

/// Generate a fresh session token
pub fn generate_session_token() -> String {
    let mut buffer = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut buffer);
    URL_SAFE_NO_PAD.encode(buffer)
}

/// Cheap shape check applied to cookie values before any store lookup
pub fn is_well_formed(token: &str) -> bool {
    token.len() == TOKEN_LEN
        && token
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}
