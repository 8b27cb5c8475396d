//! userbase - A minimal user-management HTTP service
//!
//! This is the main entry point for the userbase application.

use std::sync::Arc;

use clap::Parser;
use tokio::signal;
use tracing::{info, warn};

use userbase::auth::{AuthService, AuthSettings};
use userbase::config::{Config, DEFAULT_SECRET_KEY};
use userbase::database::SqliteDatabase;
use userbase::logging::init_tracing;
use userbase::server::{AppState, Server};

/// userbase - A minimal user-management HTTP service
#[derive(Parser, Debug)]
#[command(name = "userbase")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, env = "USERBASE_CONFIG")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration
    let config = load_config(&args)?;

    // Initialize tracing/logging
    init_tracing(&config.logging)?;

    info!(version = env!("CARGO_PKG_VERSION"), "Starting userbase");

    if config.auth.secret_key == DEFAULT_SECRET_KEY {
        warn!("Running with the default token signing secret; set USERBASE_SECRET_KEY in production");
    }

    // Initialize database
    let database = Arc::new(SqliteDatabase::new(&config.database.path).await?);
    info!(path = %config.database.path, "Database initialized");

    // Initialize authentication service
    let auth = Arc::new(AuthService::new(
        Arc::clone(&database),
        AuthSettings::from(&config.auth),
    ));

    // Create application state
    let state = AppState { auth, database };

    // Create and start the HTTP server
    let server = Server::new(config.server.clone(), state);

    info!(
        host = %config.server.host,
        port = %config.server.port,
        "Starting HTTP server"
    );

    server.run(shutdown_signal()).await?;

    info!("userbase shutdown complete");

    Ok(())
}

/// Load configuration from file or environment
fn load_config(args: &Args) -> anyhow::Result<Config> {
    match &args.config {
        Some(path) => {
            // Use eprintln! since tracing is not yet initialized
            eprintln!("Loading configuration from file: {}", path);
            Config::from_file(path).map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
        }
        None => Config::from_env().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e)),
    }
}

/// Create a future that resolves when a shutdown signal is received
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
