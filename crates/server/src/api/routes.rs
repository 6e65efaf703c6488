use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use super::middleware::metrics_middleware;
use super::{audio, handlers, presets};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let max_upload_bytes = state.config().server.max_upload_bytes;
    let static_dir = state.config().server.static_dir.clone();

    let routes = Router::new()
        // Health, config and observability
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/status", get(handlers::get_status))
        .route("/metrics", get(handlers::get_metrics))
        // Audio sessions
        .route("/upload", post(audio::upload))
        .route("/download/{session_id}", get(audio::download))
        .route("/play/{session_id}/{file_type}", get(audio::play))
        .route("/cleanup/{session_id}", post(audio::cleanup))
        // Presets
        .route("/presets", get(presets::list_presets))
        .route("/presets/{name}", get(presets::get_preset))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state);

    // Serve the frontend with SPA fallback when one is configured
    let router = match static_dir {
        Some(dir) => {
            let index_path = dir.join("index.html");
            routes.fallback_service(ServeDir::new(&dir).fallback(ServeFile::new(index_path)))
        }
        None => routes,
    };

    router
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
}
