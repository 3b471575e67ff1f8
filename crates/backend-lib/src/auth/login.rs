// ============================
// crates/backend-lib/src/auth/login.rs
// ============================
//! Login orchestration: lock check, then verification, then bookkeeping.
use crate::auth::clock::Clock;
use crate::auth::throttle::LoginThrottle;
use crate::auth::verifier::CredentialVerifier;
use crate::error::AppError;
use crate::metrics::{LOGIN_FAILURE, LOGIN_REJECTED, LOGIN_SUCCESS};
use crate::validation::mask_email;
use metrics::counter;
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use userauth_common::Session;

/// Sole owner of the failed-attempt throttle.
///
/// Each request runs strictly in order: lock check, credential check,
/// counter update. Only the counter reads and writes take the throttle's
/// per-key lock; hashing happens outside it.
#[derive(Clone)]
pub struct LoginService {
    throttle: LoginThrottle,
    verifier: CredentialVerifier,
    clock: Arc<dyn Clock>,
}

impl LoginService {
    pub fn new(throttle: LoginThrottle, verifier: CredentialVerifier, clock: Arc<dyn Clock>) -> Self {
        Self {
            throttle,
            verifier,
            clock,
        }
    }

    pub fn throttle(&self) -> &LoginThrottle {
        &self.throttle
    }

    /// Authenticate `email`/`password`.
    ///
    /// # Errors
    /// * `RateLimited` when the account is locked, or becomes locked by this failure
    /// * `InvalidCredentials` for an unknown email or wrong password
    /// * anything the collaborators return, with the throttle left untouched
    #[instrument(skip_all, fields(email = %mask_email(email)))]
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AppError> {
        let now = self.clock.now();
        self.throttle.check_and_maybe_reset(email, now);

        let status = self.throttle.is_locked(email, now);
        if status.locked {
            counter!(LOGIN_REJECTED).increment(1);
            warn!(retry_after_secs = status.retry_after_secs, "login rejected, account locked");
            return Err(AppError::RateLimited {
                retry_after_secs: status.retry_after_secs,
            });
        }

        match self.verifier.verify(email, password).await? {
            Some(session) => {
                self.throttle.record_success(email);
                counter!(LOGIN_SUCCESS).increment(1);
                debug!(user_id = %session.user_id, "login succeeded");
                Ok(session)
            },
            None => {
                let status = self.throttle.record_failure(email, self.clock.now());
                counter!(LOGIN_FAILURE).increment(1);
                warn!(attempts = self.throttle.attempts(email), "login failed");
                if status.locked {
                    Err(AppError::RateLimited {
                        retry_after_secs: status.retry_after_secs,
                    })
                } else {
                    Err(AppError::InvalidCredentials)
                }
            },
        }
    }
}
