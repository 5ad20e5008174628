//! Route table for the lookup API.

use std::path::Path;
use std::sync::Arc;

use axum::{extract::Extension, routing::get, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::handlers;
use crate::state::AppState;

/// Build the router. Static assets, including `index.html` for `/`, come
/// from `static_dir`.
pub fn create_router(state: Arc<AppState>, static_dir: impl AsRef<Path>) -> Router {
    let static_dir = static_dir.as_ref();

    Router::new()
        // Lookup API
        .route("/api/data/:zipcode", get(handlers::data_handler))
        .route("/api/data/:zipcode/summary", get(handlers::summary_handler))
        .route("/api/status", get(handlers::status_handler))
        // Health check
        .route("/health", get(handlers::health_handler))
        // Metrics
        .route("/metrics", get(handlers::metrics_handler))
        // Static page and assets
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .fallback_service(ServeDir::new(static_dir))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
