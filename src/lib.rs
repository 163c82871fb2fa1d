pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod prompt;
pub mod provider;
pub mod rate_limit;
pub mod state;

use axum::Router;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;

pub fn cors_layer(allowed_origin: &str) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if allowed_origin == "*" {
        layer.allow_origin(Any)
    } else {
        match allowed_origin.parse::<HeaderValue>() {
            Ok(origin) => layer.allow_origin(origin),
            Err(_) => {
                tracing::warn!(allowed_origin, "invalid ALLOWED_ORIGIN, allowing any origin");
                layer.allow_origin(Any)
            }
        }
    }
}

pub fn router(state: Arc<AppState>, allowed_origin: &str) -> Router {
    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/generate", post(handlers::generate_handler))
        .route("/metrics", get(handlers::metrics_handler))
        .layer(cors_layer(allowed_origin))
        .with_state(state)
}
