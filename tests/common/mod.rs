//! Common test utilities and helpers for integration tests

#![allow(dead_code)]

use std::sync::Arc;

use userbase::auth::{AuthService, AuthSettings};
use userbase::database::{Database, SqliteDatabase};
use userbase::server::AppState;

/// Token signing secret used by all integration tests
pub const TEST_SECRET: &str = "test_secret_key";

/// Create an in-memory database for testing
pub async fn create_test_database() -> Arc<SqliteDatabase> {
    Arc::new(
        SqliteDatabase::in_memory()
            .await
            .expect("Failed to create test database"),
    )
}

/// Create a test authentication service over the given store
pub fn create_test_auth<D: Database>(db: Arc<D>) -> Arc<AuthService<D>> {
    let settings = AuthSettings {
        secret_key: TEST_SECRET.to_string(),
        token_ttl_secs: 3600,
        cookie_secure: false,
    };
    Arc::new(AuthService::new(db, settings))
}

/// Create a test application state backed by an in-memory store
pub async fn create_test_state() -> AppState<SqliteDatabase> {
    let database = create_test_database().await;
    let auth = create_test_auth(Arc::clone(&database));

    AppState { auth, database }
}

/// Run a test server in the background and return the address
///
/// The server shuts down when the returned sender is dropped or sent.
pub async fn run_test_server(
    state: AppState<SqliteDatabase>,
) -> (std::net::SocketAddr, tokio::sync::oneshot::Sender<()>) {
    use tokio::net::TcpListener;

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test server");
    let addr = listener.local_addr().expect("Failed to get local address");

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let app = userbase::server::build_router(state);

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await
            .expect("Server error");
    });

    // Give the server a moment to start
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    (addr, shutdown_tx)
}

/// A reqwest client with an enabled cookie store
pub fn cookie_client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to build client")
}
