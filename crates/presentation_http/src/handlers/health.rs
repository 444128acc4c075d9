//! Health check handlers

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Liveness check - is the server running?
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    /// Generative answers are unavailable but rule fallback is serving
    pub degraded: bool,
    pub backend: BackendStatus,
    pub database: ServiceStatus,
}

/// Generative backend status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendStatus {
    pub configured: bool,
    pub healthy: bool,
    pub model: Option<String>,
}

/// Status of a service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub healthy: bool,
}

/// Readiness check - is the server ready to accept requests?
///
/// A configured but unhealthy backend only blocks readiness when rule
/// fallback is disabled.
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let configured = state.analysis.has_backend();
    let (backend_healthy, database_healthy) =
        tokio::join!(state.analysis.backend_healthy(), state.history.is_healthy());
    let fallback = state.config.analysis.fallback_to_rules;

    let backend_ok = !configured || backend_healthy || fallback;
    let ready = database_healthy && backend_ok;
    let degraded = configured && !backend_healthy;

    let status_code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(ReadinessResponse {
            ready,
            degraded,
            backend: BackendStatus {
                configured,
                healthy: backend_healthy,
                model: state.analysis.backend_model(),
            },
            database: ServiceStatus {
                healthy: database_healthy,
            },
        }),
    )
}
