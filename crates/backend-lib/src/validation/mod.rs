// ============================
// crates/backend-lib/src/validation/mod.rs
// ============================
//! Request shape validation and log redaction.
//!
//! Only structure is checked here. Emails are never trimmed or lower-cased;
//! the throttle and the account lookup both key on the exact string.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321 SMTP limit
const MAX_PASSWORD_LENGTH: usize = 128;

static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+$").expect("static regex"));

/// Possible validation errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid email: {0}")]
    InvalidEmail(&'static str),

    #[error("Invalid password: {0}")]
    InvalidPassword(&'static str),
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

impl From<ValidationError> for crate::error::AppError {
    fn from(err: ValidationError) -> Self {
        crate::error::AppError::InvalidInput(err.to_string())
    }
}

/// Check that a login request is well formed before touching any state.
pub fn validate_login(email: &str, password: &str) -> ValidationResult<()> {
    validate_email(email)?;
    validate_password(password)
}

pub fn validate_email(email: &str) -> ValidationResult<()> {
    if email.is_empty() {
        return Err(ValidationError::InvalidEmail("must not be empty"));
    }
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::InvalidEmail("too long"));
    }
    if !EMAIL_SHAPE.is_match(email) {
        return Err(ValidationError::InvalidEmail("expected local@domain"));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::InvalidPassword("must not be empty"));
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::InvalidPassword("too long"));
    }
    Ok(())
}

/// Mask an email address for logging: `use***@example.com`.
pub fn mask_email(email: &str) -> String {
    let (local, domain) = match email.find('@') {
        Some(at) => email.split_at(at),
        None => (email, ""),
    };
    let visible: String = local.chars().take(3).collect();
    format!("{visible}***{domain}")
}
