//! HTTP request handlers for the sampling service.

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use geosample::{
    bounding_box, buildings_query,
    building::{building_type, height_meters, BuildingTags},
    ElevationSample, GeoError, GridSpec, IdwInterpolator, LocalPoint,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::AppState;

/// Largest grid resolution served over HTTP.
pub const MAX_GRID_RESOLUTION: usize = 500;

/// Query parameters for the grid endpoint.
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct GridQuery {
    /// Center latitude in decimal degrees (-90 to 90).
    pub lat: f64,
    /// Center longitude in decimal degrees (-180 to 180).
    pub lon: f64,
    /// Half-width of the grid in meters. Defaults to the service configuration.
    pub radius: Option<f64>,
    /// Points per axis. Defaults to the service configuration.
    pub resolution: Option<usize>,
}

/// One grid point in both coordinate systems.
#[derive(Debug, Serialize, ToSchema)]
pub struct GridPointResponse {
    pub row: usize,
    pub col: usize,
    /// Meters east of the center.
    pub x: f64,
    /// Meters north of the center.
    pub y: f64,
    pub lat: f64,
    pub lon: f64,
}

/// Sampling grid response. Points are row-major, south row first.
#[derive(Debug, Serialize, ToSchema)]
pub struct GridResponse {
    pub lat: f64,
    pub lon: f64,
    pub radius: f64,
    pub resolution: usize,
    pub points: Vec<GridPointResponse>,
}

/// Query parameters for the bounding-box endpoint.
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BboxQuery {
    /// Center latitude in decimal degrees.
    pub lat: f64,
    /// Center longitude in decimal degrees.
    pub lon: f64,
    /// Radius in meters. Defaults to the service configuration.
    pub radius: Option<f64>,
}

/// Bounding box with ready-to-use query strings.
#[derive(Debug, Serialize, ToSchema)]
pub struct BboxResponse {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
    /// `south,west,north,east`
    pub overpass_bbox: String,
    /// `west,south,east,north,EPSG:4326`
    pub wfs_bbox: String,
    /// Overpass QL query for buildings inside the box.
    pub overpass_query: String,
}

/// Elevation sample on the local plane.
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct SampleInput {
    pub x: f64,
    pub y: f64,
    pub elevation: f64,
}

impl From<SampleInput> for ElevationSample {
    fn from(s: SampleInput) -> Self {
        ElevationSample::new(s.x, s.y, s.elevation)
    }
}

/// Query point on the local plane.
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct PointInput {
    pub x: f64,
    pub y: f64,
}

/// Request body for the interpolation endpoint.
#[derive(Debug, Deserialize, ToSchema)]
pub struct InterpolateRequest {
    /// Known elevations.
    pub samples: Vec<SampleInput>,
    /// Points to estimate.
    pub points: Vec<PointInput>,
    /// Neighbors per point. Defaults to the service configuration.
    pub k: Option<usize>,
    /// Distance exponent. Defaults to the service configuration.
    pub power: Option<f64>,
}

/// Interpolated elevations, in the order of the requested points.
#[derive(Debug, Serialize, ToSchema)]
pub struct InterpolateResponse {
    pub k: usize,
    pub power: f64,
    pub elevations: Vec<f64>,
}

/// Request body for the building-height endpoint.
#[derive(Debug, Deserialize, ToSchema)]
pub struct BuildingHeightRequest {
    /// OpenStreetMap-style tags, e.g. `{"building": "school", "building:levels": "4"}`.
    #[schema(value_type = Object)]
    pub tags: BuildingTags,
}

/// Estimated building height.
#[derive(Debug, Serialize, ToSchema)]
pub struct BuildingHeightResponse {
    /// Height in meters.
    pub height: f64,
    /// Value of the `building` tag, or `Unknown`.
    pub building_type: String,
}

/// Error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message.
    pub error: String,
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
}

/// Generate a sampling grid around a center point.
///
/// # Returns
///
/// - `200 OK` with the grid points
/// - `400 Bad Request` if the parameters are missing or invalid
#[utoipa::path(
    get,
    path = "/grid",
    tag = "sampling",
    params(GridQuery),
    responses(
        (status = 200, description = "Grid points", body = GridResponse),
        (status = 400, description = "Invalid parameters", body = ErrorResponse)
    )
)]
pub async fn get_grid(
    State(state): State<Arc<AppState>>,
    query: Result<Query<GridQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    let radius = query.radius.unwrap_or(state.config.radius_m);
    let resolution = query.resolution.unwrap_or(state.config.resolution);

    tracing::debug!(
        lat = query.lat,
        lon = query.lon,
        radius = radius,
        resolution = resolution,
        "Grid query"
    );

    if let Err(message) = validate_center(query.lat, query.lon) {
        return bad_request(message);
    }
    if resolution > MAX_GRID_RESOLUTION {
        return bad_request(format!(
            "Resolution {} exceeds the maximum of {}",
            resolution, MAX_GRID_RESOLUTION
        ));
    }

    let spec = GridSpec::new(query.lat, query.lon, radius, resolution);
    if let Err(e) = spec.validate() {
        return error_response(e);
    }
    let grid = spec.generate();

    let mut points = Vec::with_capacity(grid.len());
    for (index, (local, geo)) in grid.points().iter().zip(grid.geo_points()).enumerate() {
        let Some((row, col)) = grid.row_col(index) else {
            break;
        };
        points.push(GridPointResponse {
            row,
            col,
            x: local.x,
            y: local.y,
            lat: geo.lat,
            lon: geo.lon,
        });
    }

    tracing::info!(points = points.len(), "Grid generated");

    (
        StatusCode::OK,
        Json(GridResponse {
            lat: query.lat,
            lon: query.lon,
            radius,
            resolution,
            points,
        }),
    )
        .into_response()
}

/// Bounding box and Overpass query around a center point.
#[utoipa::path(
    get,
    path = "/bbox",
    tag = "sampling",
    params(BboxQuery),
    responses(
        (status = 200, description = "Bounding box", body = BboxResponse),
        (status = 400, description = "Invalid parameters", body = ErrorResponse)
    )
)]
pub async fn get_bbox(
    State(state): State<Arc<AppState>>,
    query: Result<Query<BboxQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    let radius = query.radius.unwrap_or(state.config.radius_m);
    if let Err(message) = validate_center(query.lat, query.lon) {
        return bad_request(message);
    }
    if !radius.is_finite() || radius <= 0.0 {
        return error_response(GeoError::InvalidRadius { radius });
    }

    let bbox = bounding_box(query.lat, query.lon, radius);

    (
        StatusCode::OK,
        Json(BboxResponse {
            south: bbox.south,
            west: bbox.west,
            north: bbox.north,
            east: bbox.east,
            overpass_bbox: bbox.to_overpass_bbox(),
            wfs_bbox: bbox.to_wfs_bbox(),
            overpass_query: buildings_query(&bbox),
        }),
    )
        .into_response()
}

/// Interpolate elevations at local points from known samples.
///
/// With no samples every point gets `0.0`.
#[utoipa::path(
    post,
    path = "/interpolate",
    tag = "interpolation",
    request_body = InterpolateRequest,
    responses(
        (status = 200, description = "Interpolated elevations", body = InterpolateResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
pub async fn post_interpolate(
    State(state): State<Arc<AppState>>,
    body: Result<Json<InterpolateRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(b) => b,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    let k = request.k.unwrap_or(state.config.idw.k);
    let power = request.power.unwrap_or(state.config.idw.power);
    if k == 0 {
        return error_response(GeoError::InvalidConfig {
            message: "k must be at least 1".to_string(),
        });
    }
    if !power.is_finite() {
        return error_response(GeoError::InvalidConfig {
            message: format!("power must be finite, got {}", power),
        });
    }

    let samples: Vec<ElevationSample> = request.samples.into_iter().map(Into::into).collect();
    let points: Vec<LocalPoint> = request
        .points
        .iter()
        .map(|p| LocalPoint::new(p.x, p.y))
        .collect();

    let idw = IdwInterpolator::new(k, power);
    let elevations = idw.interpolate_many(&points, &samples);

    tracing::info!(
        samples = samples.len(),
        points = points.len(),
        k = k,
        power = power,
        "Interpolation complete"
    );

    (
        StatusCode::OK,
        Json(InterpolateResponse {
            k,
            power,
            elevations,
        }),
    )
        .into_response()
}

/// Estimate a building's height from its tags.
#[utoipa::path(
    post,
    path = "/building-height",
    tag = "buildings",
    request_body = BuildingHeightRequest,
    responses(
        (status = 200, description = "Estimated height", body = BuildingHeightResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
pub async fn post_building_height(body: Result<Json<BuildingHeightRequest>, JsonRejection>) -> Response {
    let Json(request) = match body {
        Ok(b) => b,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    let height = height_meters(&request.tags);
    let kind = building_type(&request.tags);

    tracing::debug!(height = height, building_type = %kind, "Building height estimated");

    (
        StatusCode::OK,
        Json(BuildingHeightResponse {
            height,
            building_type: kind,
        }),
    )
        .into_response()
}

/// Health check endpoint.
///
/// Returns service status and version.
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses((status = 200, description = "Service is healthy", body = HealthResponse))
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn validate_center(lat: f64, lon: f64) -> Result<(), String> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(format!("Latitude {} out of range [-90, 90]", lat));
    }
    if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
        return Err(format!("Longitude {} out of range [-180, 180]", lon));
    }
    Ok(())
}

fn bad_request(message: impl Into<String>) -> Response {
    let error = message.into();
    tracing::warn!(error = %error, "Rejected request");
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error })).into_response()
}

/// Map a library error to an HTTP response.
fn error_response(e: GeoError) -> Response {
    let status = match &e {
        GeoError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    };

    tracing::warn!(error = %e, "Request failed");

    (status, Json(ErrorResponse { error: e.to_string() })).into_response()
}
