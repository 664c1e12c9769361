use std::sync::Arc;

use tokio::net::TcpListener;

use bookledger_chain::InMemoryChain;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::state::AppState;

/// Checkout ledger server. Owns the chain for the life of the process.
pub struct LedgerServer {
    config: ServerConfig,
    chain: Arc<InMemoryChain>,
}

impl LedgerServer {
    /// Create a server with a freshly bootstrapped chain.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let chain = InMemoryChain::new()?;
        Ok(Self::with_chain(config, Arc::new(chain)))
    }

    pub fn with_chain(config: ServerConfig, chain: Arc<InMemoryChain>) -> Self {
        Self { config, chain }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn chain(&self) -> &Arc<InMemoryChain> {
        &self.chain
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(AppState {
            chain: Arc::clone(&self.chain),
            pretty_json: self.config.pretty_json,
        })
    }

    /// Start serving requests until Ctrl-C.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!("bookledger server listening on {}", self.config.bind_addr);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
