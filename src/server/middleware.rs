//! HTTP middleware for userbase
//!
//! This module provides middleware layers for:
//! - Authentication (session cookie or bearer token)
//! - Request/response logging

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use std::time::Instant;
use tower_cookies::Cookies;

use crate::auth::{AuthService, Claims};
use crate::database::Database;

/// Name of the session cookie
pub const TOKEN_COOKIE: &str = "token";

/// Authenticated identity extension for requests
#[derive(Clone, Debug)]
pub struct CurrentUser(pub Claims);

/// Authentication middleware function
///
/// This middleware:
/// 1. Extracts the session token from the `token` cookie, falling back to
///    the bearer segment of the `Authorization` header
/// 2. Verifies the token signature and expiry
/// 3. Adds the decoded claims to the request extensions
pub async fn auth_middleware<D: Database + 'static>(
    State(auth): State<Arc<AuthService<D>>>,
    cookies: Cookies,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthResponse> {
    let token = cookies
        .get(TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .or_else(|| bearer_token(request.headers()));

    let Some(token) = token else {
        return Err(AuthResponse::missing_token());
    };

    let claims = auth
        .authenticate(&token)
        .map_err(|_| AuthResponse::invalid_token())?;

    request.extensions_mut().insert(CurrentUser(claims));

    Ok(next.run(request).await)
}

/// Extract the token from a bearer Authorization header
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|token| token.to_string())
}

/// Authentication error response
pub struct AuthResponse {
    status: StatusCode,
    message: String,
}

impl AuthResponse {
    fn missing_token() -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            message: "Access forbidden: No token provided".to_string(),
        }
    }

    fn invalid_token() -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            message: "Access forbidden: Invalid token".to_string(),
        }
    }

    /// Authenticated, but acting on another user's record
    pub fn not_owner() -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            message: "Access forbidden: Cannot edit another user".to_string(),
        }
    }
}

impl IntoResponse for AuthResponse {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.message
        });
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            serde_json::to_string(&body).unwrap(),
        )
            .into_response()
    }
}

/// Logging middleware function
///
/// Logs request and response details including:
/// - Method and path
/// - Status code
/// - Response time
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let elapsed = start.elapsed();
    let status = response.status();

    tracing::info!(
        method = %method,
        path = %uri.path(),
        status = %status.as_u16(),
        duration_ms = %elapsed.as_millis(),
        "Request completed"
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{issue_token, AuthSettings};
    use crate::database::MockDatabase;
    use axum::{middleware, routing::get, Router};
    use tower_cookies::CookieManagerLayer;

    const SECRET: &str = "test_secret_key";

    fn create_test_auth() -> Arc<AuthService<MockDatabase>> {
        let settings = AuthSettings {
            secret_key: SECRET.to_string(),
            token_ttl_secs: 3600,
            cookie_secure: false,
        };
        Arc::new(AuthService::new(Arc::new(MockDatabase::new()), settings))
    }

    async fn test_handler() -> &'static str {
        "OK"
    }

    async fn spawn_guarded_app() -> std::net::SocketAddr {
        let auth = create_test_auth();

        let app = Router::new()
            .route("/guarded", get(test_handler))
            .route_layer(middleware::from_fn_with_state(
                auth,
                auth_middleware::<MockDatabase>,
            ))
            .layer(CookieManagerLayer::new());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        addr
    }

    // Test 1: requests without any token are rejected with 403
    #[tokio::test]
    async fn test_auth_middleware_rejects_no_token() {
        let addr = spawn_guarded_app().await;

        let client = reqwest::Client::new();
        let response = client
            .get(format!("http://{}/guarded", addr))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 403);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Access forbidden: No token provided");
    }

    // Test 2: a valid session cookie is accepted
    #[tokio::test]
    async fn test_auth_middleware_accepts_cookie() {
        let addr = spawn_guarded_app().await;
        let token = issue_token(1, SECRET, chrono::Duration::hours(1)).unwrap();

        let client = reqwest::Client::new();
        let response = client
            .get(format!("http://{}/guarded", addr))
            .header("Cookie", format!("{}={}", TOKEN_COOKIE, token))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
    }

    // Test 3: a valid bearer token is accepted
    #[tokio::test]
    async fn test_auth_middleware_accepts_bearer() {
        let addr = spawn_guarded_app().await;
        let token = issue_token(1, SECRET, chrono::Duration::hours(1)).unwrap();

        let client = reqwest::Client::new();
        let response = client
            .get(format!("http://{}/guarded", addr))
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
    }

    // Test 4: tampered tokens are rejected with 403
    #[tokio::test]
    async fn test_auth_middleware_rejects_invalid_token() {
        let addr = spawn_guarded_app().await;

        let client = reqwest::Client::new();
        let response = client
            .get(format!("http://{}/guarded", addr))
            .header("Cookie", format!("{}=not.a.token", TOKEN_COOKIE))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 403);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Access forbidden: Invalid token");
    }

    // Test 5: the cookie takes precedence over the header
    #[tokio::test]
    async fn test_auth_middleware_cookie_precedence() {
        let addr = spawn_guarded_app().await;
        let good = issue_token(1, SECRET, chrono::Duration::hours(1)).unwrap();

        // Good cookie + garbage header: the cookie wins, request passes
        let client = reqwest::Client::new();
        let response = client
            .get(format!("http://{}/guarded", addr))
            .header("Cookie", format!("{}={}", TOKEN_COOKIE, good))
            .header("Authorization", "Bearer garbage")
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
    }

    // Test 6: bearer_token parsing
    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, "Bearer abc123".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("abc123".to_string()));

        headers.insert(header::AUTHORIZATION, "Basic abc123".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);
    }

    // Test 7: AuthResponse shapes
    #[test]
    fn test_auth_response_shapes() {
        let resp = AuthResponse::missing_token();
        assert_eq!(resp.status, StatusCode::FORBIDDEN);
        assert!(resp.message.contains("No token"));

        let resp = AuthResponse::not_owner();
        assert_eq!(resp.status, StatusCode::FORBIDDEN);
        assert!(resp.message.contains("another user"));
    }
}
