//! Database migrations for userbase
//!
//! This module contains SQL migrations for the SQLite database schema.

/// SQL statement to create the initial database schema
pub const CREATE_SCHEMA: &str = r#"
-- Users table
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT,
    username TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS idx_users_username ON users(username);
"#;

/// Get the migration version
pub fn migration_version() -> i32 {
    1
}
