//! Shared-text relay server - Entry Point
//!
//! Builds the registry, starts the expiry sweeper, and serves the HTTP
//! and WebSocket routes until interrupted.

use std::env;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::EnvFilter;

use text_relay::error::AppError;
use text_relay::{handler, sweeper, RoomRegistry};

/// Default listen port when `PORT` is unset
const DEFAULT_PORT: &str = "5000";

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize logging with environment filter
    // Use RUST_LOG env var to control log level
    // e.g., RUST_LOG=debug or RUST_LOG=text_relay=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("text_relay=info")),
        )
        .init();

    let port = env::var("PORT").unwrap_or_else(|_| DEFAULT_PORT.to_string());
    let addr = format!("0.0.0.0:{}", port);

    let registry = Arc::new(RoomRegistry::new());

    // Sweeper runs for the process lifetime, cancelled on shutdown.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(sweeper::run(
        registry.clone(),
        sweeper::SWEEP_PERIOD,
        sweeper::RETENTION,
        shutdown_rx,
    ));

    let app = handler::router(registry);

    let listener = TcpListener::bind(&addr).await?;
    info!("Relay server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
            let _ = shutdown_tx.send(true);
        })
        .await?;

    Ok(())
}
