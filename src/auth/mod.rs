//! Authentication system for userbase
//!
//! This module provides authentication functionality:
//! - Password hashing and verification
//! - Session token issuance and verification
//! - The service tying both to the credential store

pub mod password;
pub mod service;
pub mod session;

pub use password::{hash_password, verify_password, HashError};
pub use service::{AuthService, AuthSettings};
pub use session::{issue_token, verify_token, Claims, DEFAULT_TOKEN_TTL_SECS};
