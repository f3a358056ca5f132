//! Relay server entry point.
//!
//! Initializes logging, loads configuration from environment variables,
//! then runs the HTTP + `WebSocket` server until terminated.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use parley_server::{AppState, ServerConfig, start_server};

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the server fails to
/// bind or serve.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("parley-server starting");

    let config = ServerConfig::from_env()?;
    info!(
        host = config.host,
        port = config.port,
        origins = ?config.allowed_origins,
        static_dir = ?config.static_dir,
        "configuration loaded"
    );

    let state = Arc::new(AppState::new());
    start_server(&config, state).await?;

    Ok(())
}
