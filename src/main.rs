//! screeniverse-relay server entry point.
//!
//! Starts the Axum HTTP server with the site routes and the WebSocket
//! endpoint.

use tracing_subscriber::EnvFilter;

use screeniverse_relay::app_state::AppState;
use screeniverse_relay::build_app;
use screeniverse_relay::config::RelayConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = RelayConfig::from_env()?;
    let addr = config.listen_addr;
    tracing::info!(
        addr = %addr,
        base = %config.base_path,
        socket = %config.socket_path,
        "starting screeniverse-relay"
    );

    let app = build_app(AppState::new(config));

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
