//! Database layer for userbase
//!
//! This module defines the database trait and SQLite implementation.

pub mod migrations;
pub mod sqlite;

pub use sqlite::SqliteDatabase;

use async_trait::async_trait;

use crate::error::DbError;
use crate::models::{NewUser, User};

/// Database trait for data persistence
///
/// This trait defines all database operations needed by the application.
/// It uses `async_trait` for async methods and `mockall::automock` for testing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Database: Send + Sync {
    /// Insert a new user row
    ///
    /// Returns the store-generated id. Duplicate usernames fail with
    /// `DbError::ConstraintViolation`.
    async fn create_user(&self, user: &NewUser) -> Result<i64, DbError>;

    /// Get a user by id
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>, DbError>;

    /// Get a user by username
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, DbError>;

    /// Update a user's name and username
    ///
    /// Returns `DbError::NotFound` when no row matches the id.
    async fn update_user(&self, id: i64, name: &str, username: &str) -> Result<(), DbError>;

    /// Get one page of users ordered by id
    async fn list_users(&self, limit: u32, offset: u32) -> Result<Vec<User>, DbError>;

    /// Get the total number of users
    async fn count_users(&self) -> Result<u64, DbError>;

    /// Round-trip a literal through the store (health probe)
    async fn ping(&self) -> Result<String, DbError>;
}
