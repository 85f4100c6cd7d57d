//! Axum router configuration

use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::metrics::metrics_handler;
use crate::state::AppState;

use super::handlers::{health_check, version_check, video_info};
use super::stream::stream_video;

/// Create the Axum router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors_enabled = state.config.cors_enabled;

    let router = Router::new()
        // Health and version endpoints
        .route("/health", get(health_check))
        .route("/version", get(version_check))
        .route("/metrics", get(metrics_handler))
        // Video endpoints; HEAD is served by the GET handler
        .route("/api/stream/{video_id}", get(stream_video))
        .route("/api/video/{video_id}", get(video_info))
        .layer(TraceLayer::new_for_http());

    let router = if cors_enabled {
        router.layer(cors_layer())
    } else {
        router
    };

    router.with_state(state)
}

/// Players on other origins need to send `Range` and read the range
/// response headers to seek.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers([
            header::ACCEPT,
            header::RANGE,
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ORIGIN,
        ])
        .expose_headers([
            header::ACCEPT_RANGES,
            header::CONTENT_RANGE,
            header::CONTENT_LENGTH,
        ])
        .max_age(Duration::from_secs(3600))
}
