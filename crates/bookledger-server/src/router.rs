use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handler;
use crate::state::AppState;

/// HTTP endpoint paths.
pub mod endpoints {
    pub const CHAIN: &str = "/";
    pub const NEW_BOOK: &str = "/new";
    pub const TAIL: &str = "/tail";
    pub const BLOCK: &str = "/blocks/:position";
    pub const VALIDATE: &str = "/validate";
    pub const HEALTH: &str = "/v1/health";
    pub const INFO: &str = "/v1/info";
}

/// Build the axum router with all ledger endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            endpoints::CHAIN,
            get(handler::list_blocks).post(handler::append_checkout),
        )
        .route(endpoints::NEW_BOOK, post(handler::new_book))
        .route(endpoints::TAIL, get(handler::tail))
        .route(endpoints::BLOCK, get(handler::get_block))
        .route(endpoints::VALIDATE, get(handler::validate))
        .route(endpoints::HEALTH, get(handler::health_handler))
        .route(endpoints::INFO, get(handler::info_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
