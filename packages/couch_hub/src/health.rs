use axum::{Json, extract::State, response::IntoResponse};
use std::sync::atomic::Ordering;

use crate::AppState;
use crate::metrics::HealthStatus;

/// Health check endpoint - returns server status
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthStatus {
        status: "healthy".to_string(),
        rooms: state.hub.room_count().await as u64,
        connections: state.metrics.active_connections.load(Ordering::Relaxed),
        uptime_secs: state.metrics.uptime_secs(),
    })
}

/// Liveness probe - returns 200 if the server is running
pub async fn health_live_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "alive" }))
}

/// Metrics endpoint - returns detailed server metrics
pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.metrics.snapshot(state.hub.stats().snapshot()))
}
