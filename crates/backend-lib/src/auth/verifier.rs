// ============================
// crates/backend-lib/src/auth/verifier.rs
// ============================
//! Email + password verification.
//!
//! A password comparison runs on every call. When the account does not
//! exist the comparison is made against the hasher's dummy hash, so a
//! caller cannot tell from latency alone whether an email is registered.

use crate::auth::password::CredentialHasher;
use crate::auth::token::TokenIssuer;
use crate::error::AppError;
use crate::storage::UserRepository;
use std::sync::Arc;
use userauth_common::Session;
use zeroize::Zeroize;

/// Checks credentials and mints a session on success
#[derive(Clone)]
pub struct CredentialVerifier {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn CredentialHasher>,
    tokens: Arc<dyn TokenIssuer>,
}

impl CredentialVerifier {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn CredentialHasher>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    /// Authenticate one email/password pair.
    ///
    /// `Ok(None)` covers both an unknown email and a wrong password.
    /// Lookup and token failures are returned as errors.
    pub async fn verify(&self, email: &str, password: &str) -> Result<Option<Session>, AppError> {
        let user = self.users.find_user_by_email(email).await?;

        let hash_to_compare = match &user {
            Some(user) => user.password_hash.clone(),
            None => self.hasher.dummy_hash().to_owned(),
        };

        let hasher = Arc::clone(&self.hasher);
        let mut candidate = password.to_owned();
        let matched = tokio::task::spawn_blocking(move || {
            let matched = hasher.verify(&candidate, &hash_to_compare);
            candidate.zeroize();
            matched
        })
        .await?;

        match user {
            Some(user) if matched => {
                let token = self.tokens.issue_token(&user.id, &user.email)?;
                Ok(Some(Session {
                    email: user.email,
                    name: user.name,
                    user_id: user.id,
                    token,
                }))
            },
            _ => Ok(None),
        }
    }
}
