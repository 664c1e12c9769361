//! HTTP server for the book checkout ledger.
//!
//! Decodes checkout submissions, appends them to the in-memory chain, and
//! serves chain reads, integrity reports, and book registration.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handler::{CheckoutRequest, HealthResponse};
pub use router::build_router;
pub use server::LedgerServer;
pub use state::AppState;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::response::IntoResponse;
    use axum::Router;
    use bookledger_chain::{Block, ChainReader, ChainWriter, InMemoryChain};
    use bookledger_types::CheckoutRecord;
    use serde_json::Value;
    use tower::util::ServiceExt;

    use super::*;

    fn app() -> (Router, Arc<InMemoryChain>) {
        let chain = Arc::new(InMemoryChain::new().unwrap());
        let state = AppState {
            chain: Arc::clone(&chain),
            pretty_json: true,
        };
        (router::build_router(state), chain)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_endpoint() {
        let (app, _) = app();
        let response = app.oneshot(get("/v1/health")).await.unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn info_endpoint() {
        let (app, _) = app();
        let response = app.oneshot(get("/v1/info")).await.unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(json_body(response).await["blocks"], 1);
    }

    #[tokio::test]
    async fn list_starts_with_genesis() {
        let (app, _) = app();
        let response = app.oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), 200);
        let body = json_body(response).await;
        let blocks = body.as_array().unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0]["position"], 0);
        assert_eq!(blocks[0]["previous_hash"], "");
        assert_eq!(blocks[0]["data"]["is_genesis"], true);
    }

    #[tokio::test]
    async fn post_checkout_appends_block() {
        let (app, chain) = app();
        let genesis = chain.tail().unwrap();
        let response = app
            .oneshot(post_json(
                "/",
                r#"{"book_id":"b1","user":"alice","checkout_date":"2024-01-01T00:00:00Z"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let block: Block = serde_json::from_value(json_body(response).await).unwrap();
        assert_eq!(block.position, 1);
        assert_eq!(block.previous_hash, genesis.hash);
        assert_eq!(block.data.user, "alice");
        assert_eq!(chain.block_count().unwrap(), 2);
    }

    #[tokio::test]
    async fn caller_cannot_set_genesis_flag() {
        let (app, chain) = app();
        let response = app
            .oneshot(post_json(
                "/",
                r#"{"book_id":"b1","user":"alice","checkout_date":"d","is_genesis":true}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(!chain.tail().unwrap().data.is_genesis);
    }

    #[tokio::test]
    async fn malformed_checkout_is_bad_request() {
        let (app, chain) = app();
        let response = app.oneshot(post_json("/", "{not json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(chain.block_count().unwrap(), 1);
    }

    #[tokio::test]
    async fn checkout_without_user_is_bad_request() {
        let (app, chain) = app();
        let response = app
            .oneshot(post_json("/", r#"{"book_id":"b1"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(chain.block_count().unwrap(), 1);
    }

    #[tokio::test]
    async fn rejection_maps_to_conflict() {
        let chain = InMemoryChain::new().unwrap();
        let genesis = chain.tail().unwrap();
        let stale = Block::create(&genesis, CheckoutRecord::new("b1", "alice", "d")).unwrap();
        chain.append(CheckoutRecord::new("b2", "bob", "d")).unwrap();
        let err = chain.submit(stale).unwrap_err();

        let response = ServerError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = json_body(response).await;
        assert_eq!(body["error"], "rejected");
        assert_eq!(body["reason"], "lineage_mismatch");
    }

    #[tokio::test]
    async fn new_book_derives_id() {
        let (app, _) = app();
        let response = app
            .oneshot(post_json(
                "/new",
                r#"{"id":"forged","title":"Dune","author":"Frank Herbert","publish_date":"1965-08-01","isbn":"9780441013593"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        let id = body["id"].as_str().unwrap();
        assert_eq!(id.len(), 64);
        assert_ne!(id, "forged");
        assert_eq!(body["title"], "Dune");
    }

    #[tokio::test]
    async fn new_book_without_isbn_is_bad_request() {
        let (app, _) = app();
        let response = app
            .oneshot(post_json("/new", r#"{"title":"Untitled"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn tail_and_block_lookup() {
        let (app, chain) = app();
        let b1 = chain.append(CheckoutRecord::new("b1", "alice", "d")).unwrap();

        let response = app.clone().oneshot(get("/tail")).await.unwrap();
        assert_eq!(response.status(), 200);
        let tail: Block = serde_json::from_value(json_body(response).await).unwrap();
        assert_eq!(tail, b1);

        let response = app.clone().oneshot(get("/blocks/1")).await.unwrap();
        assert_eq!(response.status(), 200);

        let response = app.oneshot(get("/blocks/42")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn validate_reports_clean_chain() {
        let (app, chain) = app();
        chain.append(CheckoutRecord::new("b1", "alice", "d")).unwrap();
        let response = app.oneshot(get("/validate")).await.unwrap();
        assert_eq!(response.status(), 200);
        let body = json_body(response).await;
        assert_eq!(body["block_count"], 2);
        assert_eq!(body["violations"].as_array().unwrap().len(), 0);
    }
}
