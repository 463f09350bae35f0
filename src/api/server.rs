use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::errors::{InkpostError, Result};
use crate::notifier::Notifier;
use crate::storage::DbPool;

use super::routes::build_router;

/// Bind and serve the HTTP API until shutdown.
pub async fn start_server(
    config: &AppConfig,
    pool: DbPool,
    notifier: Arc<dyn Notifier>,
) -> Result<()> {
    let addr: SocketAddr = config
        .server
        .bind_address()
        .parse()
        .map_err(|e| InkpostError::config(format!("Invalid server address: {}", e)))?;

    let router = build_router(pool, config, notifier);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| InkpostError::internal(format!("Failed to bind API server: {}", e)))?;

    info!(address = %addr, "Starting HTTP API server");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "API server shutdown listener failed");
            }
        })
        .await
        .map_err(|e| InkpostError::internal(format!("API server error: {}", e)))?;

    info!("API server shutdown completed");
    Ok(())
}
