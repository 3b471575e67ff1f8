// ============================
// crates/backend-lib/src/auth/token.rs
// ============================
//! Session token issuance.
use crate::error::AppError;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::RngCore;

/// Default token size in bytes (32 bytes = 256 bits of entropy)
const DEFAULT_TOKEN_BYTES: usize = 32;

/// Issues the bearer token handed back on a successful login.
pub trait TokenIssuer: Send + Sync {
    fn issue_token(&self, user_id: &str, email: &str) -> Result<String, AppError>;
}

/// Issues random opaque tokens. The identity is not encoded in the token.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpaqueTokenIssuer;

impl TokenIssuer for OpaqueTokenIssuer {
    fn issue_token(&self, user_id: &str, _email: &str) -> Result<String, AppError> {
        tracing::trace!(user_id, "issuing session token");
        Ok(generate_secure_token())
    }
}

/** Generate a cryptographically secure random token
# Returns
A base64 URL-safe encoded string without padding */
pub fn generate_secure_token() -> String {
    generate_secure_token_with_size(DEFAULT_TOKEN_BYTES)
}

/** Generate a cryptographically secure random token with specified size
# Arguments
* `bytes` - The size of the random token in bytes */
pub fn generate_secure_token_with_size(bytes: usize) -> String {
    let mut buffer = vec![0u8; bytes];
    rand::rng().fill_bytes(&mut buffer);
    URL_SAFE_NO_PAD.encode(buffer)
}
