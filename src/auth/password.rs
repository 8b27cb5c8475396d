//! Password hashing and verification
//!
//! This module provides functions for hashing and verifying user passwords.
//! Hashes use Argon2id with a random salt and are stored in PHC string format.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;

/// Hash a password using Argon2id
///
/// The hash includes a random salt, so hashing the same password twice
/// produces different strings.
///
/// # Errors
///
/// Returns an error if hashing fails (should not happen in normal operation)
pub fn hash_password(password: &str) -> Result<String, HashError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| HashError::HashFailed(e.to_string()))
}

/// Verify a password against a stored hash
///
/// The comparison inside the argon2 crate is constant-time. Malformed
/// hashes verify as `false`.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Error type for password hashing operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HashError {
    /// Hashing failed
    #[error("Hash failed: {0}")]
    HashFailed(String),
}
