//! SQLite implementation of the Database trait
//!
//! This module provides a SQLite-based implementation of the Database trait
//! using rusqlite and tokio-rusqlite for async operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension;
use tokio_rusqlite::Connection;

use super::migrations::CREATE_SCHEMA;
use super::Database;
use crate::error::DbError;
use crate::models::{NewUser, User};

/// SQLite database implementation
pub struct SqliteDatabase {
    conn: Connection,
}

impl SqliteDatabase {
    /// Create a new SQLite database connection
    ///
    /// Use `:memory:` for an in-memory database or a file path for
    /// persistent storage.
    pub async fn new(path: &str) -> Result<Self, DbError> {
        let conn = Connection::open(path).await?;

        // Run migrations
        conn.call(|conn| {
            conn.execute_batch(CREATE_SCHEMA)?;
            Ok(())
        })
        .await?;

        Ok(Self { conn })
    }

    /// Create a new in-memory database (useful for testing)
    pub async fn in_memory() -> Result<Self, DbError> {
        Self::new(":memory:").await
    }
}

#[async_trait]
impl Database for SqliteDatabase {
    async fn create_user(&self, user: &NewUser) -> Result<i64, DbError> {
        let name = user.name.clone();
        let username = user.username.clone();
        let password_hash = user.password_hash.clone();

        let id = self
            .conn
            .call(move |conn| {
                conn.execute(
                    r#"
                    INSERT INTO users (name, username, password_hash)
                    VALUES (?1, ?2, ?3)
                    "#,
                    rusqlite::params![name, username, password_hash],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await?;

        Ok(id)
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>, DbError> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT id, name, username, password_hash, created_at
                    FROM users
                    WHERE id = ?1
                    "#,
                )?;

                let result = stmt.query_row([id], user_from_row).optional()?;
                Ok(result)
            })
            .await
            .map_err(Into::into)
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, DbError> {
        let username = username.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT id, name, username, password_hash, created_at
                    FROM users
                    WHERE username = ?1
                    "#,
                )?;

                let result = stmt.query_row([&username], user_from_row).optional()?;
                Ok(result)
            })
            .await
            .map_err(Into::into)
    }

    async fn update_user(&self, id: i64, name: &str, username: &str) -> Result<(), DbError> {
        let name = name.to_string();
        let username = username.to_string();

        let rows_affected = self
            .conn
            .call(move |conn| {
                let count = conn.execute(
                    "UPDATE users SET name = ?1, username = ?2 WHERE id = ?3",
                    rusqlite::params![name, username, id],
                )?;
                Ok(count)
            })
            .await?;

        if rows_affected == 0 {
            return Err(DbError::NotFound);
        }

        Ok(())
    }

    async fn list_users(&self, limit: u32, offset: u32) -> Result<Vec<User>, DbError> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT id, name, username, password_hash, created_at
                    FROM users
                    ORDER BY id
                    LIMIT ?1 OFFSET ?2
                    "#,
                )?;

                let users = stmt
                    .query_map(rusqlite::params![limit, offset], user_from_row)?
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(users)
            })
            .await
            .map_err(Into::into)
    }

    async fn count_users(&self) -> Result<u64, DbError> {
        let count = self
            .conn
            .call(|conn| {
                let count: i64 =
                    conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
                Ok(count)
            })
            .await?;

        Ok(count as u64)
    }

    async fn ping(&self) -> Result<String, DbError> {
        self.conn
            .call(|conn| {
                let result: String =
                    conn.query_row("SELECT 'hello world' AS RESULT", [], |row| row.get(0))?;
                Ok(result)
            })
            .await
            .map_err(Into::into)
    }
}

/// Map a `users` row to the domain model
fn user_from_row(row: &rusqlite::Row<'_>) -> Result<User, rusqlite::Error> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        username: row.get(2)?,
        password_hash: row.get(3)?,
        created_at: parse_datetime(row.get::<_, Option<String>>(4)?),
    })
}

/// Parse a datetime string to DateTime<Utc>
fn parse_datetime(s: Option<String>) -> Option<DateTime<Utc>> {
    s.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|| {
                // Try parsing SQLite's datetime format
                chrono::NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S")
                    .ok()
                    .map(|dt| dt.and_utc())
            })
    })
}
