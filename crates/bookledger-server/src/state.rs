use std::sync::Arc;

use bookledger_chain::InMemoryChain;

/// Shared application state passed to axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub chain: Arc<InMemoryChain>,
    pub pretty_json: bool,
}

