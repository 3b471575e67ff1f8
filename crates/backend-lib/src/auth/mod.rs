// ============================
// crates/backend-lib/src/auth/mod.rs
// ============================
//! Authentication module.

pub mod clock;
pub mod login;
pub mod password;
pub mod throttle;
pub mod token;
pub mod verifier;

pub use clock::{Clock, ManualClock, SystemClock};
pub use login::LoginService;
pub use password::{validate_password_strength, CredentialHasher, PasswordRequirements, ScryptHasher, MIN_PASSWORD_LENGTH};
pub use throttle::{LockStatus, LoginThrottle, LOCKOUT_THRESHOLD, THROTTLE_WINDOW};
pub use token::{generate_secure_token, OpaqueTokenIssuer, TokenIssuer};
pub use verifier::CredentialVerifier;
