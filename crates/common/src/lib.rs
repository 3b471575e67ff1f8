// ================
// common/src/lib.rs
// ================
//! Wire types shared between the login backend and its clients.
//! The backend serialises these as JSON over HTTP.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/auth/login`
///
/// The email is taken verbatim: it is not trimmed or case-folded before it
/// is used as the account key.
#[derive(Serialize, Deserialize, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Authenticated session returned on a successful login
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Email of the authenticated account
    pub email: String,
    /// Display name
    pub name: String,
    /// Stable account identifier
    pub user_id: String,
    /// Opaque bearer token
    pub token: String,
}

/// Error envelope returned for every non-2xx response
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Machine-readable code plus a human-readable message
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetail {
    /// One of `INVALID_CREDENTIALS`, `RATE_LIMITED`, `INVALID_INPUT`, `INTERNAL`
    pub code: String,
    pub message: String,
    /// Seconds until another attempt is accepted; only set for `RATE_LIMITED`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_after_secs: Option<u64>,
}
