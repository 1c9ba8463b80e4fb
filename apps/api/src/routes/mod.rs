pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        // Document intake
        .route("/upload/file", post(handlers::handle_upload_file))
        .route("/upload/url", post(handlers::handle_upload_url))
        .route("/analyze/batch", post(handlers::handle_analyze_batch))
        // Pre-structured records
        .route("/api/v1/match", post(handlers::handle_match))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
