//! geosample Service - HTTP microservice for terrain sampling.
//!
//! A REST API for sampling grids, IDW interpolation and building heights.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `GEOSAMPLE_RADIUS` | Default search radius in meters | 500 |
//! | `GEOSAMPLE_RESOLUTION` | Default grid points per axis | 25 |
//! | `GEOSAMPLE_IDW_K` | Default neighbors per interpolation | 8 |
//! | `GEOSAMPLE_IDW_POWER` | Default IDW distance exponent | 2.0 |
//! | `GEOSAMPLE_PORT` | HTTP server port | 8080 |
//! | `RUST_LOG` | Log level (e.g., "info", "debug") | "info" |
//!
//! ## Endpoints
//!
//! - `GET /grid?lat=X&lon=Y` - Sampling grid around a center point
//! - `GET /bbox?lat=X&lon=Y` - Bounding box and Overpass query
//! - `POST /interpolate` - IDW interpolation at local points
//! - `POST /building-height` - Building height from tags
//! - `GET /health` - Health check
//! - `GET /docs` - OpenAPI documentation (Swagger UI)

use std::net::SocketAddr;
use std::sync::Arc;

use geosample::{SamplingConfig, SamplingConfigBuilder};
use geosample_service::{handlers, router, AppState};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

const DEFAULT_PORT: u16 = 8080;

/// OpenAPI documentation for the geosample service.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "geosample Service",
        version = "0.1.0",
        description = "REST API for sampling grids, IDW elevation interpolation and building heights.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
        contact(name = "Pedro Sanz Martinez", url = "https://github.com/pedrosanzmtz/geosample")
    ),
    paths(
        handlers::get_grid,
        handlers::get_bbox,
        handlers::post_interpolate,
        handlers::post_building_height,
        handlers::health_check,
    ),
    components(
        schemas(
            handlers::GridQuery,
            handlers::GridPointResponse,
            handlers::GridResponse,
            handlers::BboxQuery,
            handlers::BboxResponse,
            handlers::SampleInput,
            handlers::PointInput,
            handlers::InterpolateRequest,
            handlers::InterpolateResponse,
            handlers::BuildingHeightRequest,
            handlers::BuildingHeightResponse,
            handlers::ErrorResponse,
            handlers::HealthResponse,
        )
    ),
    tags(
        (name = "sampling", description = "Grid and bounding-box endpoints"),
        (name = "interpolation", description = "IDW elevation interpolation"),
        (name = "buildings", description = "Building height estimation"),
        (name = "system", description = "System and health endpoints")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "geosample_service=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load port from environment (service-specific config)
    let port: u16 = std::env::var("GEOSAMPLE_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    // Request defaults: GEOSAMPLE_RADIUS, GEOSAMPLE_RESOLUTION, GEOSAMPLE_IDW_K,
    // GEOSAMPLE_IDW_POWER
    let config = match SamplingConfigBuilder::from_env().build() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "Invalid sampling configuration, using defaults");
            SamplingConfig::default()
        }
    };

    tracing::info!(
        radius = config.radius_m,
        resolution = config.resolution,
        k = config.idw.k,
        power = config.idw.power,
        port = port,
        "Starting geosample service"
    );

    let state = Arc::new(AppState { config });

    // Build router
    let app = router(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
