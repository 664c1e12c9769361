use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;

use bookledger_chain::{Block, ChainReader, ChainWriter, ValidationReport};
use bookledger_types::{Book, CheckoutRecord};

use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

/// Body of `POST /`. There is no genesis flag: callers can never set it.
#[derive(Clone, Debug, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub book_id: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub checkout_date: String,
}

impl CheckoutRequest {
    fn into_record(self) -> ServerResult<CheckoutRecord> {
        if self.book_id.trim().is_empty() {
            return Err(ServerError::BadRequest("book_id is required".into()));
        }
        if self.user.trim().is_empty() {
            return Err(ServerError::BadRequest("user is required".into()));
        }
        Ok(CheckoutRecord::new(self.book_id, self.user, self.checkout_date))
    }
}

/// Health check response.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".into(),
            version: env!("CARGO_PKG_VERSION").into(),
        }
    }
}

/// `GET /` — the whole chain.
pub async fn list_blocks(State(state): State<AppState>) -> ServerResult<Response> {
    let blocks = state.chain.snapshot()?;
    if !state.pretty_json {
        return Ok(Json(blocks).into_response());
    }
    let body = serde_json::to_string_pretty(&blocks)
        .map_err(|e| ServerError::Internal(format!("failed to encode chain: {e}")))?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

/// `POST /` — record a checkout.
pub async fn append_checkout(
    State(state): State<AppState>,
    payload: Result<Json<CheckoutRequest>, JsonRejection>,
) -> ServerResult<Json<Block>> {
    let Json(request) = payload.map_err(|e| ServerError::BadRequest(e.body_text()))?;
    let record = request.into_record()?;
    let block = state.chain.append(record)?;
    Ok(Json(block))
}

/// `POST /new` — register a book and return it with its derived id.
pub async fn new_book(
    payload: Result<Json<Book>, JsonRejection>,
) -> ServerResult<(StatusCode, Json<Book>)> {
    let Json(book) = payload.map_err(|e| ServerError::BadRequest(e.body_text()))?;
    let book = book
        .register()
        .map_err(|e| ServerError::BadRequest(e.to_string()))?;
    tracing::info!(isbn = %book.isbn, "book registered");
    Ok((StatusCode::CREATED, Json(book)))
}

/// `GET /tail`
pub async fn tail(State(state): State<AppState>) -> ServerResult<Json<Block>> {
    Ok(Json(state.chain.tail()?))
}

/// `GET /blocks/:position`
pub async fn get_block(
    State(state): State<AppState>,
    Path(position): Path<u64>,
) -> ServerResult<Json<Block>> {
    state
        .chain
        .get(position)?
        .map(Json)
        .ok_or_else(|| ServerError::NotFound(format!("block {position}")))
}

/// `GET /validate` — full-chain integrity report.
pub async fn validate(State(state): State<AppState>) -> ServerResult<Json<ValidationReport>> {
    Ok(Json(state.chain.validate()?))
}

/// Health check handler.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// Info handler.
pub async fn info_handler(State(state): State<AppState>) -> ServerResult<Json<serde_json::Value>> {
    Ok(Json(json!({
        "name": "bookledger-server",
        "version": env!("CARGO_PKG_VERSION"),
        "blocks": state.chain.block_count()?,
    })))
}
