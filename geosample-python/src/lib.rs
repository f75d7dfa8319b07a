//! Python bindings for the geosample library.

#![allow(clippy::useless_conversion)]

use pyo3::prelude::*;
use pyo3::types::PyDict;

// Use fully qualified path to avoid collision with the Python module name
use ::geosample as geo_lib;
use geo_lib::building::BuildingTags;

/// Latitude span in degrees covering `meters` north-south.
///
/// Args:
///     meters: Distance in meters.
///
/// Returns:
///     Degrees of latitude (111 000 m per degree).
#[pyfunction]
fn lat_delta_from_meters(meters: f64) -> f64 {
    geo_lib::lat_delta_from_meters(meters)
}

/// Longitude span in degrees covering `meters` east-west at `at_lat`.
///
/// Diverges towards the poles.
#[pyfunction]
fn lon_delta_from_meters(meters: f64, at_lat: f64) -> f64 {
    geo_lib::lon_delta_from_meters(meters, at_lat)
}

/// Bounding box around a center point.
///
/// Args:
///     lat: Center latitude in decimal degrees.
///     lon: Center longitude in decimal degrees.
///     radius_m: Half-width of the box in meters.
///
/// Returns:
///     Tuple of (south, west, north, east).
///
/// Example:
///     >>> bounding_box(0.0, 0.0, 1110.0)
///     (-0.01, -0.01, 0.01, 0.01)
#[pyfunction]
fn bounding_box(lat: f64, lon: f64, radius_m: f64) -> (f64, f64, f64, f64) {
    let bbox = geo_lib::bounding_box(lat, lon, radius_m);
    (bbox.south, bbox.west, bbox.north, bbox.east)
}

/// Project a point onto the local plane around a center.
///
/// Returns:
///     Tuple of (x, y) in meters, x east and y north.
#[pyfunction]
fn to_local_xy(lat: f64, lon: f64, center_lat: f64, center_lon: f64) -> (f64, f64) {
    let p = geo_lib::to_local_xy(lat, lon, center_lat, center_lon);
    (p.x, p.y)
}

/// Square sampling grid in local meters.
///
/// Args:
///     center_lat: Center latitude in decimal degrees.
///     center_lon: Center longitude in decimal degrees.
///     radius_m: Half-width of the grid in meters.
///     resolution: Points per axis.
///
/// Returns:
///     List of (x, y) tuples, row-major with the south row first.
#[pyfunction]
fn generate_local_grid_points(
    center_lat: f64,
    center_lon: f64,
    radius_m: f64,
    resolution: usize,
) -> Vec<(f64, f64)> {
    geo_lib::generate_local_grid_points(center_lat, center_lon, radius_m, resolution)
        .into_iter()
        .map(|p| (p.x, p.y))
        .collect()
}

/// Estimate the elevation at (x, y) by inverse distance weighting.
///
/// Args:
///     x: Query x in local meters.
///     y: Query y in local meters.
///     samples: List of (x, y, elevation) tuples.
///     k: Number of nearest samples used (default: 8).
///     power: Distance exponent (default: 2.0).
///
/// Returns:
///     Estimated elevation, or 0.0 if there are no samples. A non-finite
///     power falls back to the nearest sample's elevation.
#[pyfunction]
#[pyo3(signature = (x, y, samples, k=8, power=2.0))]
fn interpolate_elevation(
    x: f64,
    y: f64,
    samples: Vec<(f64, f64, f64)>,
    k: usize,
    power: f64,
) -> f64 {
    let samples: Vec<geo_lib::ElevationSample> = samples
        .into_iter()
        .map(|(sx, sy, e)| geo_lib::ElevationSample::new(sx, sy, e))
        .collect();
    geo_lib::interpolate_elevation(x, y, &samples, k, power)
}

/// Estimate a building's height from OpenStreetMap-style tags.
///
/// Args:
///     tags: Dict of tag values; non-string values are converted with str().
///         None values are ignored.
///
/// Returns:
///     Height in meters.
///
/// Example:
///     >>> height_meters({"building": "apartments", "building:levels": 5})
///     15.0
#[pyfunction]
fn height_meters(tags: &Bound<'_, PyDict>) -> PyResult<f64> {
    let mut building_tags = BuildingTags::new();
    for (key, value) in tags.iter() {
        if value.is_none() {
            continue;
        }
        building_tags.insert(key.extract::<String>()?, value.str()?.to_string());
    }
    Ok(geo_lib::height_meters(&building_tags))
}

/// Overpass QL query for every building inside a bounding box.
///
/// Args:
///     bbox: Tuple of (south, west, north, east), as returned by bounding_box().
///     timeout: Server-side timeout in seconds (default: 25).
#[pyfunction]
#[pyo3(signature = (bbox, timeout=25))]
fn buildings_query(bbox: (f64, f64, f64, f64), timeout: u32) -> String {
    let (south, west, north, east) = bbox;
    let bbox = geo_lib::BoundingBox::new(south, west, north, east);
    geo_lib::OverpassQueryBuilder::new()
        .timeout(timeout)
        .feature("building")
        .build(&bbox)
}

/// geosample - local-plane sampling grids and IDW elevation interpolation.
///
/// Example:
///     >>> import geosample
///     >>> bbox = geosample.bounding_box(46.55, 7.98, 500.0)
///     >>> grid = geosample.generate_local_grid_points(46.55, 7.98, 500.0, 25)
///     >>> geosample.interpolate_elevation(0.0, 0.0, [(10.0, 0.0, 100.0)])
///     100.0
#[pymodule]
#[pyo3(name = "geosample")]
fn geosample_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(lat_delta_from_meters, m)?)?;
    m.add_function(wrap_pyfunction!(lon_delta_from_meters, m)?)?;
    m.add_function(wrap_pyfunction!(bounding_box, m)?)?;
    m.add_function(wrap_pyfunction!(to_local_xy, m)?)?;
    m.add_function(wrap_pyfunction!(generate_local_grid_points, m)?)?;
    m.add_function(wrap_pyfunction!(interpolate_elevation, m)?)?;
    m.add_function(wrap_pyfunction!(height_meters, m)?)?;
    m.add_function(wrap_pyfunction!(buildings_query, m)?)?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add("DEFAULT_K", geo_lib::idw::DEFAULT_K)?;
    m.add("DEFAULT_POWER", geo_lib::idw::DEFAULT_POWER)?;
    Ok(())
}
