//! HTTP application wiring (Axum router + service wiring).
//!
//! Layout:
//! - `services.rs`: store/service construction from config
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request/response JSON shapes
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use crate::config::AppConfig;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router from config (public entrypoint for `main.rs`).
pub fn build_app(config: AppConfig) -> Router {
    let state = Arc::new(services::build_services(&config));
    build_router(state, config.body_limit)
}

/// Router over pre-built services; tests use this to inject store doubles.
pub fn build_router(state: Arc<services::AppState>, body_limit: usize) -> Router {
    Router::new()
        .route("/", get(routes::system::index))
        .route("/health", get(routes::system::health))
        .nest("/items", routes::items::router())
        .layer(
            ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(body_limit))
                .layer(Extension(state)),
        )
}
