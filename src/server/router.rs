//! HTTP router for userbase
//!
//! This module defines the axum router that handles all HTTP requests:
//! registration, login, the protected route, user editing, the paginated
//! user list, and the ping / create-random helpers.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    middleware,
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Form, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_cookies::{cookie::SameSite, Cookie, CookieManagerLayer, Cookies};

use crate::auth::AuthService;
use crate::database::Database;
use crate::error::{AuthError, DbError};
use crate::webui::pages;

use super::middleware::{auth_middleware, AuthResponse, CurrentUser, TOKEN_COOKIE};

/// Shared application state
pub struct AppState<D: Database> {
    /// Authentication service
    pub auth: Arc<AuthService<D>>,

    /// Database
    pub database: Arc<D>,
}

impl<D: Database> Clone for AppState<D> {
    fn clone(&self) -> Self {
        Self {
            auth: Arc::clone(&self.auth),
            database: Arc::clone(&self.database),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Registration and login form payload
#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    pub username: String,
    pub password: String,
}

/// Edit form payload
#[derive(Debug, Deserialize)]
pub struct EditForm {
    pub name: String,
    pub username: String,
}

/// Pagination query parameters
///
/// Kept as raw strings so malformed values fall back to the defaults
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Build the main application router
///
/// # Arguments
///
/// * `state` - Application state containing the store and auth service
///
/// # Returns
///
/// An axum Router configured with all endpoints
pub fn build_router<D: Database + 'static>(state: AppState<D>) -> Router {
    let protected = Router::new()
        .route("/protected", get(protected_handler))
        .route(
            "/edit/:id",
            get(edit_form_handler::<D>).post(edit_submit_handler::<D>),
        )
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state.auth),
            auth_middleware::<D>,
        ));

    Router::new()
        .route("/", get(list_users_handler::<D>))
        .route("/health", get(health_handler))
        .route(
            "/register",
            get(register_form_handler).post(register_handler::<D>),
        )
        .route("/login", get(login_form_handler).post(login_handler::<D>))
        .route("/ping", get(ping_handler::<D>))
        .route("/create", get(create_random_handler::<D>))
        .merge(protected)
        .layer(CookieManagerLayer::new())
        .with_state(state)
}

// =============================================================================
// Health Handler
// =============================================================================

/// Health check endpoint handler
async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// Registration Handlers
// =============================================================================

/// Registration form handler
async fn register_form_handler() -> Html<String> {
    Html(pages::register_page())
}

/// Registration submission handler
///
/// Duplicate usernames and store failures are deliberately
/// indistinguishable in the response; the cause is only logged.
async fn register_handler<D: Database + 'static>(
    State(state): State<AppState<D>>,
    Form(form): Form<CredentialsForm>,
) -> Response {
    match state.auth.register(&form.username, &form.password).await {
        Ok(id) => {
            tracing::info!(user_id = id, "User registered");
            (StatusCode::CREATED, "User registered").into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to register user");
            (StatusCode::INTERNAL_SERVER_ERROR, "Error registering user").into_response()
        }
    }
}

// =============================================================================
// Login Handlers
// =============================================================================

/// Login form handler
async fn login_form_handler() -> Html<String> {
    Html(pages::login_page())
}

/// Login submission handler
async fn login_handler<D: Database + 'static>(
    State(state): State<AppState<D>>,
    cookies: Cookies,
    Form(form): Form<CredentialsForm>,
) -> Response {
    match state.auth.login(&form.username, &form.password).await {
        Ok(token) => {
            let mut cookie = Cookie::new(TOKEN_COOKIE, token);
            cookie.set_http_only(true);
            cookie.set_same_site(SameSite::Lax);
            cookie.set_secure(state.auth.cookie_secure());
            cookie.set_path("/");
            cookies.add(cookie);

            Json(serde_json::json!({ "message": "Logged in successfully" })).into_response()
        }
        Err(AuthError::InvalidCredentials) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "Invalid credentials" })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to log user in");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Error logging in" })),
            )
                .into_response()
        }
    }
}

// =============================================================================
// Protected Handlers
// =============================================================================

/// Protected route handler
async fn protected_handler() -> &'static str {
    "This is a protected route"
}

/// Edit form handler
///
/// Renders the pre-filled edit form. Only the owner of the record may view
/// it.
async fn edit_form_handler<D: Database + 'static>(
    State(state): State<AppState<D>>,
    Path(id): Path<i64>,
    Extension(CurrentUser(claims)): Extension<CurrentUser>,
) -> Response {
    if claims.sub != id {
        return AuthResponse::not_owner().into_response();
    }

    match state.database.get_user_by_id(id).await {
        Ok(Some(user)) => Html(pages::edit_page(&user)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "User not found").into_response(),
        Err(e) => {
            tracing::error!(error = %e, user_id = id, "Failed to load user for editing");
            (StatusCode::INTERNAL_SERVER_ERROR, "Error retrieving user").into_response()
        }
    }
}

/// Edit submission handler
async fn edit_submit_handler<D: Database + 'static>(
    State(state): State<AppState<D>>,
    Path(id): Path<i64>,
    Extension(CurrentUser(claims)): Extension<CurrentUser>,
    Form(form): Form<EditForm>,
) -> Response {
    if claims.sub != id {
        return AuthResponse::not_owner().into_response();
    }

    match state.database.update_user(id, &form.name, &form.username).await {
        Ok(()) => "User updated".into_response(),
        Err(DbError::NotFound) => (StatusCode::NOT_FOUND, "User not found").into_response(),
        Err(e) => {
            tracing::error!(error = %e, user_id = id, "Failed to update user");
            (StatusCode::INTERNAL_SERVER_ERROR, "Error updating user").into_response()
        }
    }
}

// =============================================================================
// Listing Handler
// =============================================================================

/// Paginated user list handler
async fn list_users_handler<D: Database + 'static>(
    State(state): State<AppState<D>>,
    Query(query): Query<ListQuery>,
) -> Response {
    let page = parse_page_param(query.page.as_deref(), 1);
    let limit = parse_page_param(query.limit.as_deref(), 10);
    let offset = (page - 1).saturating_mul(limit);

    let users = match state.database.list_users(limit, offset).await {
        Ok(users) => users,
        Err(e) => {
            tracing::error!(error = %e, "Failed to list users");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Error retrieving users").into_response();
        }
    };

    let total_users = match state.database.count_users().await {
        Ok(count) => count,
        Err(e) => {
            tracing::error!(error = %e, "Failed to count users");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Error retrieving users").into_response();
        }
    };

    let total_pages = total_users.div_ceil(u64::from(limit));

    Html(pages::users_page(&users, page, limit, total_pages)).into_response()
}

/// Parse a pagination parameter leniently
///
/// Garbage, zero, and out-of-range values all fall back to the default, so
/// a malformed query can never reach the store.
fn parse_page_param(value: Option<&str>, default: u32) -> u32 {
    value
        .and_then(|v| v.parse::<u32>().ok())
        .filter(|v| *v >= 1)
        .unwrap_or(default)
}

// =============================================================================
// Ping / Create-Random Handlers
// =============================================================================

/// Ping handler: round-trips a literal through the store
async fn ping_handler<D: Database + 'static>(State(state): State<AppState<D>>) -> Response {
    match state.database.ping().await {
        Ok(result) => Json(serde_json::json!({ "RESULT": result })).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Store ping failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Error pinging database").into_response()
        }
    }
}

/// Create a user with random credentials (test-data seeding)
async fn create_random_handler<D: Database + 'static>(
    State(state): State<AppState<D>>,
) -> Response {
    match state.auth.create_random_user().await {
        Ok(id) => Json(serde_json::json!({
            "message": "Random user created",
            "userId": id
        }))
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to create random user");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error creating random user",
            )
                .into_response()
        }
    }
}
