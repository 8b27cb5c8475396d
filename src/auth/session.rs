//! Stateless session tokens
//!
//! This module issues and verifies the signed tokens that carry a login
//! session. Tokens are HS256 JWTs embedding the user id and an absolute
//! expiry; nothing is persisted server-side, so a token remains valid until
//! it expires.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Default session lifetime in seconds
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;

/// Claims carried by a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id the session belongs to
    pub sub: i64,

    /// Issued-at (Unix timestamp)
    pub iat: i64,

    /// Absolute expiry (Unix timestamp)
    pub exp: i64,
}

/// Issue a signed session token for a user
///
/// # Errors
///
/// Returns `AuthError::TokenIssue` if signing fails.
pub fn issue_token(user_id: i64, secret: &str, ttl: Duration) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::TokenIssue(e.to_string()))
}

/// Verify a session token and return its claims
///
/// Fails with `AuthError::InvalidToken` on signature mismatch, malformed
/// input, or passed expiry.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AuthError::InvalidToken)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_secret_key";

    // Test 1: issue and verify round-trip
    #[test]
    fn test_issue_verify_roundtrip() {
        let token = issue_token(42, SECRET, Duration::hours(1)).unwrap();
        let claims = verify_token(&token, SECRET).unwrap();

        assert_eq!(claims.sub, 42);
        assert!(claims.exp > claims.iat);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    // Test 2: verification fails with the wrong secret
    #[test]
    fn test_verify_wrong_secret() {
        let token = issue_token(42, SECRET, Duration::hours(1)).unwrap();
        let result = verify_token(&token, "another_secret");

        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    // Test 3: verification fails for tampered tokens
    #[test]
    fn test_verify_tampered_token() {
        let token = issue_token(42, SECRET, Duration::hours(1)).unwrap();

        // Flip a character in the payload segment
        let mut tampered = token.clone();
        let mid = tampered.len() / 2;
        let replacement = if tampered.as_bytes()[mid] == b'A' { "B" } else { "A" };
        tampered.replace_range(mid..mid + 1, replacement);

        let result = verify_token(&tampered, SECRET);
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    // Test 4: verification fails for garbage input
    #[test]
    fn test_verify_garbage() {
        let result = verify_token("not.a.token", SECRET);
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    // Test 5: expired tokens are rejected
    #[test]
    fn test_verify_expired_token() {
        // Expired well beyond the validation leeway
        let token = issue_token(42, SECRET, Duration::hours(-2)).unwrap();
        let result = verify_token(&token, SECRET);

        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    // Test 6: tokens for different users carry different subjects
    #[test]
    fn test_distinct_subjects() {
        let token_a = issue_token(1, SECRET, Duration::hours(1)).unwrap();
        let token_b = issue_token(2, SECRET, Duration::hours(1)).unwrap();

        assert_eq!(verify_token(&token_a, SECRET).unwrap().sub, 1);
        assert_eq!(verify_token(&token_b, SECRET).unwrap().sub, 2);
    }
}
