//! HTTP server components for userbase
//!
//! This module provides the HTTP server infrastructure including:
//! - Router configuration and route handlers
//! - Authentication and logging middleware
//! - Server lifecycle management

pub mod middleware;
pub mod router;

pub use middleware::{CurrentUser, TOKEN_COOKIE};
pub use router::{build_router, AppState, HealthResponse};

use std::future::Future;
use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::database::Database;

/// HTTP Server for userbase
///
/// Manages the axum server lifecycle, including:
/// - Binding to the configured address
/// - Applying middleware layers
/// - Graceful shutdown handling
pub struct Server<D: Database + 'static> {
    config: ServerConfig,
    state: AppState<D>,
}

impl<D: Database + 'static> Server<D> {
    /// Create a new server instance
    pub fn new(config: ServerConfig, state: AppState<D>) -> Self {
        Self { config, state }
    }

    /// Get the configured bind address
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.config.host.parse().unwrap_or([0, 0, 0, 0].into()),
            self.config.port,
        )
    }

    /// Run the server until shutdown signal is received
    ///
    /// # Arguments
    ///
    /// * `shutdown` - Future that resolves when the server should shut down
    ///
    /// # Returns
    ///
    /// Ok(()) if server shuts down gracefully, Err if there was an error
    pub async fn run(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        let addr = self.bind_addr();
        let app = build_router(self.state);

        // Apply middleware layers
        let app = app
            .layer(axum::middleware::from_fn(middleware::logging_middleware))
            .layer(tower_http::trace::TraceLayer::new_for_http())
            .layer(tower_http::compression::CompressionLayer::new());

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind(e.to_string()))?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ServerError::Serve(e.to_string()))?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Failed to bind to address
    #[error("Failed to bind to address: {0}")]
    Bind(String),

    /// Failed to serve requests
    #[error("Server error: {0}")]
    Serve(String),
}
