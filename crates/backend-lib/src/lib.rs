// ============================
// crates/backend-lib/src/lib.rs
// ============================
//! Login backend: credential verification behind a per-account
//! failed-attempt throttle.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod routes;
pub mod storage;
pub mod validation;

use crate::auth::{
    Clock, CredentialHasher, CredentialVerifier, LoginService, LoginThrottle, OpaqueTokenIssuer,
    ScryptHasher, SystemClock, TokenIssuer,
};
use crate::config::Settings;
use crate::storage::{InMemoryUserRepository, UserRepository};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Login orchestration, owns the throttle
    pub login: LoginService,
    /// Settings the server was started with
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Wire the login service from its collaborators
    pub fn new(
        settings: Settings,
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn CredentialHasher>,
        tokens: Arc<dyn TokenIssuer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let verifier = CredentialVerifier::new(users, hasher, tokens);
        let login = LoginService::new(LoginThrottle::new(), verifier, clock);

        Self {
            login,
            settings: Arc::new(settings),
        }
    }

    /// Build the default stack: scrypt hashing, in-memory accounts seeded
    /// from `settings.users_file`, opaque tokens, system clock.
    pub async fn from_settings(settings: Settings) -> anyhow::Result<Self> {
        let log_n = settings.scrypt_log_n;
        // computing the dummy hash is a full scrypt run
        let hasher: Arc<dyn CredentialHasher> =
            Arc::new(tokio::task::spawn_blocking(move || ScryptHasher::new(log_n)).await??);

        let users = InMemoryUserRepository::new(Arc::clone(&hasher));
        if let Some(path) = &settings.users_file {
            users.load_seed_file(path).await?;
        }

        Ok(Self::new(
            settings,
            Arc::new(users),
            hasher,
            Arc::new(OpaqueTokenIssuer),
            Arc::new(SystemClock),
        ))
    }

    pub fn throttle(&self) -> &LoginThrottle {
        self.login.throttle()
    }
}
