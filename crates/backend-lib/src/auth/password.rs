// ============================
// crates/backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
use crate::auth::token::generate_secure_token;
use crate::error::AppError;
use rand::RngCore;
use scrypt::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Params, Scrypt,
};
use zeroize::Zeroize;

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: usize = 10;

/// Salt size in bytes for new hashes
const SALT_BYTES: usize = 16;

/// Hashing primitive used by the credential verifier.
pub trait CredentialHasher: Send + Sync {
    /// Produce a PHC-format hash of `plain`
    fn hash(&self, plain: &str) -> Result<String, AppError>;

    /// Check `candidate` against `stored_hash`. A malformed hash never matches.
    fn verify(&self, candidate: &str, stored_hash: &str) -> bool;

    /// Well-formed hash that no password matches, costed like a real one.
    fn dummy_hash(&self) -> &str;
}

/// scrypt with a fixed cost.
///
/// The dummy hash is computed once in [`ScryptHasher::new`] from a random
/// secret that is then discarded, using the same parameters as every stored
/// hash, so checking a password against it takes as long as a real check.
#[derive(Clone)]
pub struct ScryptHasher {
    params: Params,
    dummy_hash: String,
}

impl std::fmt::Debug for ScryptHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScryptHasher")
            .field("log_n", &self.params.log_n())
            .finish_non_exhaustive()
    }
}

impl ScryptHasher {
    /// Build a hasher with cost `2^log_n`.
    pub fn new(log_n: u8) -> anyhow::Result<Self> {
        let params = Params::new(
            log_n,
            Params::RECOMMENDED_R,
            Params::RECOMMENDED_P,
            Params::RECOMMENDED_LEN,
        )
        .map_err(|e| anyhow::anyhow!("invalid scrypt parameters: {e}"))?;

        let mut secret = generate_secure_token();
        let dummy_hash = hash_with(&params, &secret);
        secret.zeroize();

        Ok(Self {
            params,
            dummy_hash: dummy_hash?,
        })
    }
}

fn hash_with(params: &Params, plain: &str) -> anyhow::Result<String> {
    let mut salt_bytes = [0u8; SALT_BYTES];
    rand::rng().fill_bytes(&mut salt_bytes);
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| anyhow::anyhow!("salt encoding failed: {e}"))?;

    let hash = Scrypt
        .hash_password_customized(plain.as_bytes(), None, None, *params, &salt)
        .map_err(|e| anyhow::anyhow!("scrypt hashing failed: {e}"))?
        .to_string();
    Ok(hash)
}

impl CredentialHasher for ScryptHasher {
    fn hash(&self, plain: &str) -> Result<String, AppError> {
        Ok(hash_with(&self.params, plain)?)
    }

    fn verify(&self, candidate: &str, stored_hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(stored_hash) {
            Ok(h) => h,
            Err(_) => return false,
        };
        Scrypt
            .verify_password(candidate.as_bytes(), &parsed_hash)
            .is_ok()
    }

    fn dummy_hash(&self) -> &str {
        &self.dummy_hash
    }
}

/// Password complexity requirements
#[derive(Debug, Clone)]
pub struct PasswordRequirements {
    pub min_length: usize,
    pub require_uppercase: bool,
    pub require_lowercase: bool,
    pub require_digit: bool,
    pub require_special: bool,
}

impl Default for PasswordRequirements {
    fn default() -> Self {
        Self {
            min_length: MIN_PASSWORD_LENGTH,
            require_uppercase: true,
            require_lowercase: true,
            require_digit: true,
            require_special: true,
        }
    }
}

/// Check if a password meets the complexity requirements
pub fn validate_password_strength(password: &str, requirements: &PasswordRequirements) -> bool {
    if password.chars().count() < requirements.min_length {
        return false;
    }

    if requirements.require_uppercase && !password.chars().any(char::is_uppercase) {
        return false;
    }

    if requirements.require_lowercase && !password.chars().any(char::is_lowercase) {
        return false;
    }

    if requirements.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }

    if requirements.require_special && !password.chars().any(|c| !c.is_alphanumeric()) {
        return false;
    }

    true
}
