//! # Web API Module
//!
//! Axum-based HTTP front for the viewer automation operations.
//!
//! - [`routes`] - HTTP route definitions
//! - [`handlers`] - Request handlers
//! - [`errors`] - Error to response mapping
//! - [`state`] - Shared application state

pub mod errors;
pub mod handlers;
pub mod routes;
pub mod state;

use axum::Router;
use std::time::Duration;

pub use state::AppState;

/// Create the Axum application with all routes and middleware
///
/// `request_timeout` bounds every request, mirroring the gateway deadline the
/// status poll budget is sized against.
pub fn create_app(app_state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .merge(routes::health_routes())
        .nest("/v1", routes::api_v1_routes())
        .layer(tower_http::timeout::TimeoutLayer::new(request_timeout))
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(app_state)
}
