//! geosample Service Library
//!
//! HTTP handlers and types for the sampling service.
//! This library is used by both the geosample-service binary and integration tests.

pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use geosample::SamplingConfig;

/// Application state shared across handlers.
pub struct AppState {
    /// Defaults for parameters a request leaves out.
    pub config: SamplingConfig,
}

/// Build the API router without documentation or middleware layers.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/grid", get(handlers::get_grid))
        .route("/bbox", get(handlers::get_bbox))
        .route("/interpolate", post(handlers::post_interpolate))
        .route("/building-height", post(handlers::post_building_height))
        .route("/health", get(handlers::health_check))
        .with_state(state)
}

// Re-export commonly used types for convenience
pub use handlers::{
    BboxQuery, BboxResponse, BuildingHeightRequest, BuildingHeightResponse, ErrorResponse,
    GridQuery, GridResponse, HealthResponse, InterpolateRequest, InterpolateResponse,
};
