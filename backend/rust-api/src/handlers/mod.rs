use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::metrics;
use crate::services::AppState;

pub mod practice;

pub async fn root() -> impl IntoResponse {
    Json(json!({ "message": "Math Practice API is running!" }))
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    // The engine lock is the only dependency this service has
    match state.engine() {
        Ok(engine) => (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "service": "mathpractice-api",
                "version": env!("CARGO_PKG_VERSION"),
                "attempts_recorded": engine.tracker().total_attempts()
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "unhealthy",
                "service": "mathpractice-api",
                "version": env!("CARGO_PKG_VERSION"),
                "error": e.to_string()
            })),
        ),
    }
}

pub async fn metrics_handler() -> impl IntoResponse {
    match metrics::render_metrics() {
        Ok(metrics_text) => (StatusCode::OK, metrics_text),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to render metrics: {}", e),
        ),
    }
}
