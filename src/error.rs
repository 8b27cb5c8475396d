//! Application error types for userbase
//!
//! This module defines common error types used throughout the application.
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Authentication-related errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// No token in the cookie or the Authorization header
    #[error("Access forbidden: No token provided")]
    MissingToken,

    /// Signature mismatch, malformed token, or passed expiry
    #[error("Access forbidden: Invalid token")]
    InvalidToken,

    /// Unknown username or wrong password (indistinguishable on purpose)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Token signing failed
    #[error("Failed to issue token: {0}")]
    TokenIssue(String),

    /// Password hashing failed
    #[error("Password hashing failed: {0}")]
    Hash(String),

    /// Underlying store failure
    #[error(transparent)]
    Store(#[from] DbError),
}

/// Database-related errors
#[derive(Debug, Error)]
pub enum DbError {
    /// SQLite error
    #[error("Database error: {0}")]
    Sqlite(rusqlite::Error),

    /// Connection handle failure
    #[error("Database connection error: {0}")]
    Connection(String),

    /// Record not found
    #[error("Record not found")]
    NotFound,

    /// Constraint violation (e.g. duplicate username)
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(String),
}

impl From<rusqlite::Error> for DbError {
    fn from(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(e, _) = &err {
            if e.code == rusqlite::ErrorCode::ConstraintViolation {
                return DbError::ConstraintViolation(err.to_string());
            }
        }
        DbError::Sqlite(err)
    }
}

impl From<tokio_rusqlite::Error> for DbError {
    fn from(err: tokio_rusqlite::Error) -> Self {
        match err {
            tokio_rusqlite::Error::Rusqlite(e) => e.into(),
            other => DbError::Connection(other.to_string()),
        }
    }
}
