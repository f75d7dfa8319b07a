//! # geosample - Local-plane sampling and IDW interpolation
//!
//! Small, dependency-light toolkit for sampling terrain around a geographic
//! center point.
//!
//! ## Features
//!
//! - **Geodesy**: meter/degree conversions and an equirectangular local plane
//! - **Grids**: square sampling grids in local meters or lat/lon
//! - **IDW**: k-nearest inverse-distance-weighted elevation interpolation
//! - **Overpass**: bounding boxes and query strings for building footprints
//! - **Buildings**: height estimates from OpenStreetMap-style tags
//!
//! ## Quick Start
//!
//! ```
//! use geosample::{generate_local_grid_points, ElevationSample, IdwInterpolator};
//!
//! let grid = generate_local_grid_points(46.55, 7.98, 500.0, 5);
//! assert_eq!(grid.len(), 25);
//!
//! let samples = vec![
//!     ElevationSample::new(-250.0, 0.0, 2000.0),
//!     ElevationSample::new(250.0, 0.0, 2100.0),
//! ];
//! let idw = IdwInterpolator::default();
//! let elevations = idw.interpolate_many(&grid, &samples);
//! assert_eq!(elevations.len(), grid.len());
//! ```
//!
//! ## Coordinate Conventions
//!
//! Two sets of constants are in use and are intentionally not unified:
//!
//! - Degree deltas (bounding boxes, grid extent) use 111 000 m per degree.
//! - Local projection uses 111 320 m per degree of longitude (scaled by the
//!   cosine of the center latitude) and 110 540 m per degree of latitude.
//!
//! Local `x` grows east and `y` grows north, in meters from the center.
//!
//! ## Optional Features
//!
//! - `geojson`: sample extraction and elevation draping for GeoJSON data
//! - `parallel`: [`IdwInterpolator::interpolate_many`] runs on rayon

pub mod bbox;
pub mod building;
pub mod config;
pub mod error;
pub mod geomath;
pub mod grid;
pub mod idw;
pub mod overpass;
pub mod types;

#[cfg(feature = "geojson")]
pub mod geojson;

// Re-export main types at crate root for convenience
pub use bbox::BoundingBox;
pub use building::{height_meters, BuildingTags};
pub use config::{SamplingConfig, SamplingConfigBuilder};
pub use error::{GeoError, Result};
pub use geomath::{
    bounding_box, from_local_xy, haversine_distance, lat_delta_from_meters,
    lon_delta_from_meters, to_local_xy, LocalProjection,
};
pub use grid::{generate_geo_grid_points, generate_local_grid_points, Grid, GridSpec};
pub use idw::{interpolate_elevation, IdwInterpolator};
pub use overpass::{buildings_query, OverpassQueryBuilder};
pub use types::{ElevationSample, GeoPoint, LocalPoint};
