//! Authentication service
//!
//! This module couples the credential store, the password hasher, and the
//! token issuer. Route handlers and the auth middleware go through it for
//! registration, login, seed-user creation, and token validation.

use std::sync::Arc;

use chrono::Duration;
use rand::Rng;

use crate::database::Database;
use crate::error::AuthError;
use crate::models::NewUser;

use super::password::{hash_password, verify_password};
use super::session::{issue_token, verify_token, Claims, DEFAULT_TOKEN_TTL_SECS};

/// Configuration for the authentication service
#[derive(Debug, Clone)]
pub struct AuthSettings {
    /// Token signing secret
    pub secret_key: String,

    /// Session token lifetime in seconds
    pub token_ttl_secs: u64,

    /// Whether the session cookie carries the Secure flag
    pub cookie_secure: bool,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            secret_key: crate::config::DEFAULT_SECRET_KEY.to_string(),
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            cookie_secure: false,
        }
    }
}

impl From<&crate::config::AuthConfig> for AuthSettings {
    fn from(config: &crate::config::AuthConfig) -> Self {
        Self {
            secret_key: config.secret_key.clone(),
            token_ttl_secs: config.token_ttl_secs,
            cookie_secure: config.cookie_secure,
        }
    }
}

/// Authentication service
///
/// Provides registration, login, and token validation over a credential
/// store.
pub struct AuthService<D: Database> {
    db: Arc<D>,
    settings: AuthSettings,
}

impl<D: Database> AuthService<D> {
    /// Create a new authentication service
    pub fn new(db: Arc<D>, settings: AuthSettings) -> Self {
        Self { db, settings }
    }

    /// Whether session cookies should carry the Secure flag
    pub fn cookie_secure(&self) -> bool {
        self.settings.cookie_secure
    }

    /// Register a new user with a hashed password
    ///
    /// Returns the new user's id. Duplicate usernames surface as a store
    /// error; callers respond with a generic failure either way.
    pub async fn register(&self, username: &str, password: &str) -> Result<i64, AuthError> {
        let password_hash =
            hash_password(password).map_err(|e| AuthError::Hash(e.to_string()))?;

        let id = self
            .db
            .create_user(&NewUser::new(username, password_hash))
            .await?;

        Ok(id)
    }

    /// Log a user in and mint a session token
    ///
    /// Unknown usernames and wrong passwords collapse into the same
    /// `InvalidCredentials` error so callers cannot distinguish them.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let user = self
            .db
            .get_user_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        issue_token(
            user.id,
            &self.settings.secret_key,
            Duration::seconds(self.settings.token_ttl_secs as i64),
        )
    }

    /// Validate a session token and return its claims
    pub fn authenticate(&self, token: &str) -> Result<Claims, AuthError> {
        verify_token(token, &self.settings.secret_key)
    }

    /// Create a user with random credentials (test-data seeding)
    ///
    /// The values are non-cryptographic random strings; the password is
    /// hashed like any other before storage.
    pub async fn create_random_user(&self) -> Result<i64, AuthError> {
        let name = random_string(5);
        let username = format!("user_{}", random_string(5));
        let password = random_string(8);

        let password_hash =
            hash_password(&password).map_err(|e| AuthError::Hash(e.to_string()))?;

        let id = self
            .db
            .create_user(&NewUser::new(username, password_hash).with_name(name))
            .await?;

        Ok(id)
    }
}

/// Generate a random lowercase alphanumeric string
fn random_string(len: usize) -> String {
    const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();

    (0..len)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}
