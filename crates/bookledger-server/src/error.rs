use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use bookledger_chain::ChainError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("chain error: {0}")]
    Chain(#[from] ChainError),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Chain(e) if e.is_rejection() => StatusCode::CONFLICT,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::Chain(ChainError::Rejected(rejection)) => json!({
                "error": "rejected",
                "reason": rejection.code(),
                "message": rejection.to_string(),
            }),
            Self::BadRequest(msg) => json!({ "error": "bad_request", "message": msg }),
            Self::NotFound(msg) => json!({ "error": "not_found", "message": msg }),
            _ => {
                tracing::error!("request failed: {self}");
                json!({ "error": "internal", "message": "internal server error" })
            }
        };
        (status, Json(body)).into_response()
    }
}
