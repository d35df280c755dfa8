//! Route definitions

use super::handlers;
use super::state::AppState;
use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/my", get(handlers::my_documents))
        .route("/health", get(handlers::health))
        .route("/stats", get(handlers::stats))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
