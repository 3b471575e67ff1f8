// ============================
// crates/backend-lib/src/storage.rs
// ============================
//! Account lookup abstraction with an in-memory implementation.
use crate::auth::password::{validate_password_strength, CredentialHasher, PasswordRequirements};
use crate::error::AppError;
use crate::validation::{validate_email, validate_password};
use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use tokio::fs as tokio_fs;
use uuid::Uuid;
use zeroize::Zeroize;

/// Stored account
#[derive(Clone)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

/// Account to be created; the password is hashed before it is stored
#[derive(Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Trait for account storage backends
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Look up an account by its exact email
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Create an account, hashing its password
    async fn create_user(&self, new_user: NewUser) -> Result<User, AppError>;
}

/// Accounts held in memory, keyed by email exactly as given
#[derive(Clone)]
pub struct InMemoryUserRepository {
    users: Arc<DashMap<String, User>>,
    hasher: Arc<dyn CredentialHasher>,
    requirements: PasswordRequirements,
}

impl InMemoryUserRepository {
    pub fn new(hasher: Arc<dyn CredentialHasher>) -> Self {
        Self {
            users: Arc::new(DashMap::new()),
            hasher,
            requirements: PasswordRequirements::default(),
        }
    }

    /// Number of stored accounts
    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Create every account listed in a JSON file of
    /// `[{"name": .., "email": .., "password": ..}]`.
    ///
    /// Returns the number of accounts created.
    pub async fn load_seed_file<P: AsRef<Path>>(&self, path: P) -> Result<usize, AppError> {
        let path = path.as_ref();
        let content = tokio_fs::read_to_string(path).await?;
        let seeds: Vec<NewUser> = serde_json::from_str(&content)?;

        let count = seeds.len();
        for seed in seeds {
            self.create_user(seed).await?;
        }
        tracing::info!(count, path = %path.display(), "seeded user accounts");
        Ok(count)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.get(email).map(|user| user.value().clone()))
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, AppError> {
        let NewUser {
            name,
            email,
            mut password,
        } = new_user;

        // mirrors the login request limits
        if let Err(e) = validate_email(&email).and_then(|()| validate_password(&password)) {
            password.zeroize();
            return Err(e.into());
        }
        if !validate_password_strength(&password, &self.requirements) {
            password.zeroize();
            return Err(AppError::InvalidInput(format!(
                "Password must be at least {} characters and contain uppercase, lowercase, digit, and special character",
                self.requirements.min_length
            )));
        }
        if self.users.contains_key(&email) {
            password.zeroize();
            return Err(AppError::InvalidInput("Email already registered".to_string()));
        }

        let hasher = Arc::clone(&self.hasher);
        let password_hash = tokio::task::spawn_blocking(move || {
            let hash = hasher.hash(&password);
            password.zeroize();
            hash
        })
        .await??;

        let user = User {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            password_hash,
        };

        // re-checked under the entry lock in case of a concurrent insert
        match self.users.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(AppError::InvalidInput("Email already registered".to_string())),
            Entry::Vacant(slot) => {
                slot.insert(user.clone());
                Ok(user)
            },
        }
    }
}
