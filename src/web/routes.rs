//! # Web API Route Definitions

use axum::routing::{get, post};
use axum::Router;

use crate::web::handlers;
use crate::web::state::AppState;

/// Routes under `/v1`
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/upload-location",
            post(handlers::workitems::issue_upload_location),
        )
        .route("/workitems", post(handlers::workitems::submit_work_item))
        .route(
            "/workitems/:id/status",
            get(handlers::workitems::work_item_status),
        )
        .route("/results", post(handlers::workitems::process_result))
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::basic_health))
}
