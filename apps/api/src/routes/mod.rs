pub mod health;

use axum::{extract::DefaultBodyLimit, routing::get, Router};

use crate::alignment::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/upload",
            get(handlers::handle_readiness).post(handlers::handle_upload),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
