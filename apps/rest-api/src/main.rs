//! # Meridian REST API
//!
//! HTTP server for the Meridian Books backend.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          REST API Server                                │
//! │                                                                         │
//! │  Client ───► HTTP/JSON (8080) ───► Handlers ───► Tenant SQLite         │
//! │              x-tenant-db header         │                               │
//! │                                         ▼                               │
//! │                               one .db file per tenant                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use meridian_api::config::ServerConfig;
use meridian_api::routes::router;
use meridian_api::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (RUST_LOG wins, "info" otherwise)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("Starting Meridian REST API server...");

    // Load configuration
    let config = ServerConfig::load()?;
    info!(
        port = config.port,
        data_dir = %config.data_dir.display(),
        "Configuration loaded"
    );

    // Make sure the tenant data directory exists before the first request
    std::fs::create_dir_all(&config.data_dir)?;

    // Build shared state and the router
    let bind_addr = config.bind_address();
    let state = AppState::new(config);
    let app = router(state);

    let listener = TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
