mod handlers;
pub mod upload;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::llm::CompletionBackend;
use upload::UploadLimits;

/// Shared state for the feedback server's handlers.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn CompletionBackend>,
    pub limits: UploadLimits,
}

pub fn create_router(backend: Arc<dyn CompletionBackend>, config: &ServerConfig) -> Router {
    let state = AppState {
        backend,
        limits: config.limits.clone(),
    };

    Router::new()
        .route("/upload", post(handlers::upload_files))
        .route("/feedback", post(handlers::get_feedback))
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(config.limits.body_limit()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(config.cors_layer()),
        )
        .with_state(state)
}
