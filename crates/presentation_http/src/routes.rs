//! Route definitions

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::{handlers, middleware::RequestIdLayer, state::AppState};

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health and status endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        // Analysis API
        .route("/api/analyze", post(handlers::analyze::analyze))
        .route("/api/analyse", post(handlers::analyze::analyze))
        // History API
        .route("/api/history", get(handlers::history::list_history))
        .route(
            "/api/history/{id}",
            get(handlers::history::get_history_entry),
        )
        // Report API
        .route("/api/report", post(handlers::report::render_report))
        // Attach state
        .with_state(state)
}

/// Router plus the request-scoped layers every deployment needs
///
/// CORS and HTTP tracing are added by the binary.
pub fn create_app(state: AppState) -> Router {
    let body_limit = state.config.server.max_body_size_bytes;
    create_router(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestIdLayer::new())
}
