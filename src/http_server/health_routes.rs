//! Health check route

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub environment: String,
}

#[derive(Debug, Clone)]
pub struct HealthState {
    pub environment: String,
}

/// `GET /api/health`
pub fn health_routes(state: Arc<HealthState>) -> Router {
    Router::new()
        .route("/api/health", get(health_handler))
        .with_state(state)
}

async fn health_handler(State(state): State<Arc<HealthState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        environment: state.environment.clone(),
    })
}
