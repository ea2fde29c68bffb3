//! # Health Check Handlers

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::web::state::AppState;

/// Basic health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub activities: Vec<String>,
}

/// Basic health check endpoint: GET /health
///
/// Reports the service as up and lists the activities it accepts. Makes no
/// remote calls.
pub async fn basic_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        activities: state
            .service
            .config()
            .activities
            .iter()
            .map(|activity| activity.name.clone())
            .collect(),
    })
}
