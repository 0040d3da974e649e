//! Market Sync Server - Binary Entry Point

use std::sync::Arc;

use market_sync::{create_router, AppState, ServerConfig, StateStore};
use tracing_subscriber::EnvFilter;

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("market_sync=info,tower_http=info")),
        )
        .init();

    let config = ServerConfig::from_env();
    let store = StateStore::seeded(&config.seed);
    let state = Arc::new(AppState::new(store, &config));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.socket_addr()).await?;
    tracing::info!(addr = %listener.local_addr()?, "Market server listening (HTTP + WebSocket)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
