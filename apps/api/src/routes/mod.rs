pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::similarity::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/calculate_similarity",
            post(handlers::handle_calculate_similarity),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
