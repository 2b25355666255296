pub mod health;
pub mod usage;

use axum::{http::Uri, routing::get, Router};

use crate::classify::handlers;
use crate::errors::AppError;
use crate::state::AppState;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(usage::usage_handler))
        .route("/healthz", get(health::health_handler))
        .route(
            "/route",
            get(handlers::handle_route_get).post(handlers::handle_route_post),
        )
        .fallback(not_found)
        .with_state(state)
}
