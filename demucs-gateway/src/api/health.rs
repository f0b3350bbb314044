//! Health and readiness endpoints
//!
//! Neither endpoint requires authentication.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use crate::models::count_cached_models;
use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "ok" while the process is serving
    pub status: String,
    /// Entries found in the model cache directory
    pub models: usize,
}

/// Readiness response
#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    /// "ready" or "not ready"
    pub status: String,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let models = count_cached_models(&state.config.models_dir).await;

    Json(HealthResponse {
        status: "ok".to_string(),
        models,
    })
}

/// GET /ready
///
/// 503 until the model cache holds at least one entry.
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    if count_cached_models(&state.config.models_dir).await == 0 {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadyResponse {
                status: "not ready".to_string(),
            }),
        );
    }

    (
        StatusCode::OK,
        Json(ReadyResponse {
            status: "ready".to_string(),
        }),
    )
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
}
