//! Regular sampling grids around a search center.
//!
//! A grid covers the square `[center - delta, center + delta]` on both axes,
//! where the deltas come from [`lat_delta_from_meters`] and
//! [`lon_delta_from_meters`]. It is a square, so the corners lie beyond the
//! nominal circular radius.
//!
//! # Ordering
//!
//! Points are row-major: row `i` walks latitude from south to north, and
//! within a row column `j` walks longitude from west to east. Index
//! `i * resolution + j` is point `(row i, col j)`. Mesh builders stitch faces
//! from this correspondence, so it must not change.

use serde::{Deserialize, Serialize};

use crate::error::{GeoError, Result};
use crate::geomath::{lat_delta_from_meters, lon_delta_from_meters, LocalProjection};
use crate::types::{ElevationSample, GeoPoint, LocalPoint};

/// Smallest resolution that yields a grid with a center point.
pub const MIN_RESOLUTION: usize = 3;

/// Generate the local-plane sample points of a `resolution × resolution` grid.
///
/// # Arguments
///
/// * `center_lat`, `center_lon` - Search center in decimal degrees
/// * `radius_m` - Half-side of the covered square in meters
/// * `resolution` - Points per axis
///
/// # Returns
///
/// `resolution²` points in row-major order, relative to the center. A
/// resolution of 0 yields no points and a resolution of 1 yields only the
/// center.
///
/// # Examples
///
/// ```
/// use geosample::grid::generate_local_grid_points;
///
/// let points = generate_local_grid_points(47.3769, 8.5417, 250.0, 3);
/// assert_eq!(points.len(), 9);
/// assert!(points[4].x.abs() < 1e-3 && points[4].y.abs() < 1e-3);
/// ```
pub fn generate_local_grid_points(
    center_lat: f64,
    center_lon: f64,
    radius_m: f64,
    resolution: usize,
) -> Vec<LocalPoint> {
    let projection = LocalProjection::new(GeoPoint::new(center_lat, center_lon));
    generate_geo_grid_points(center_lat, center_lon, radius_m, resolution)
        .into_iter()
        .map(|p| projection.to_local(p))
        .collect()
}

/// Generate the geographic positions of the grid, in the same order as
/// [`generate_local_grid_points`].
///
/// These are the coordinates an elevation source is queried with.
pub fn generate_geo_grid_points(
    center_lat: f64,
    center_lon: f64,
    radius_m: f64,
    resolution: usize,
) -> Vec<GeoPoint> {
    match resolution {
        0 => return Vec::new(),
        1 => return vec![GeoPoint::new(center_lat, center_lon)],
        _ => {}
    }

    let lat_delta = lat_delta_from_meters(radius_m);
    let lon_delta = lon_delta_from_meters(radius_m, center_lat);

    let min_lat = center_lat - lat_delta;
    let max_lat = center_lat + lat_delta;
    let min_lon = center_lon - lon_delta;
    let max_lon = center_lon + lon_delta;

    let steps = (resolution - 1) as f64;
    let mut points = Vec::with_capacity(resolution * resolution);

    for i in 0..resolution {
        let lat = min_lat + (max_lat - min_lat) * i as f64 / steps;
        for j in 0..resolution {
            let lon = min_lon + (max_lon - min_lon) * j as f64 / steps;
            points.push(GeoPoint::new(lat, lon));
        }
    }

    points
}

/// Parameters of a sampling grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Search center.
    pub center: GeoPoint,
    /// Half-side of the covered square in meters.
    pub radius_m: f64,
    /// Points per axis.
    pub resolution: usize,
}

impl GridSpec {
    pub fn new(center_lat: f64, center_lon: f64, radius_m: f64, resolution: usize) -> Self {
        Self {
            center: GeoPoint::new(center_lat, center_lon),
            radius_m,
            resolution,
        }
    }

    /// Reject parameters that would produce a degenerate grid.
    ///
    /// The generators themselves accept anything; this is for callers that
    /// take user input and want to report it.
    ///
    /// # Errors
    ///
    /// - [`GeoError::InvalidResolution`] below [`MIN_RESOLUTION`]
    /// - [`GeoError::InvalidRadius`] for zero, negative or non-finite radii
    /// - [`GeoError::InvalidCoordinate`] for a center outside lat ±90°, lon ±180°
    pub fn validate(&self) -> Result<()> {
        if self.resolution < MIN_RESOLUTION {
            return Err(GeoError::InvalidResolution {
                resolution: self.resolution,
                minimum: MIN_RESOLUTION,
            });
        }
        if !self.radius_m.is_finite() || self.radius_m <= 0.0 {
            return Err(GeoError::InvalidRadius {
                radius: self.radius_m,
            });
        }
        if !(-90.0..=90.0).contains(&self.center.lat) || !(-180.0..=180.0).contains(&self.center.lon)
        {
            return Err(GeoError::InvalidCoordinate {
                message: format!(
                    "center lat={}, lon={} outside lat ±90°, lon ±180°",
                    self.center.lat, self.center.lon
                ),
            });
        }
        Ok(())
    }

    /// Generate the grid described by this spec.
    pub fn generate(&self) -> Grid {
        Grid::generate(
            self.center.lat,
            self.center.lon,
            self.radius_m,
            self.resolution,
        )
    }
}

/// A generated grid: local points plus their geographic positions.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    resolution: usize,
    center: GeoPoint,
    local: Vec<LocalPoint>,
    geo: Vec<GeoPoint>,
}

impl Grid {
    /// Generate a grid. See [`generate_local_grid_points`].
    pub fn generate(center_lat: f64, center_lon: f64, radius_m: f64, resolution: usize) -> Self {
        let center = GeoPoint::new(center_lat, center_lon);
        let projection = LocalProjection::new(center);
        let geo = generate_geo_grid_points(center_lat, center_lon, radius_m, resolution);
        let local = geo.iter().map(|p| projection.to_local(*p)).collect();

        Self {
            resolution,
            center,
            local,
            geo,
        }
    }

    /// Points per axis.
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// The projection center.
    pub fn center(&self) -> GeoPoint {
        self.center
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.local.len()
    }

    pub fn is_empty(&self) -> bool {
        self.local.is_empty()
    }

    /// Local-plane points in row-major order.
    pub fn points(&self) -> &[LocalPoint] {
        &self.local
    }

    /// Geographic positions in row-major order.
    pub fn geo_points(&self) -> &[GeoPoint] {
        &self.geo
    }

    /// Flat index of `(row, col)`, or `None` if outside the grid.
    pub fn index(&self, row: usize, col: usize) -> Option<usize> {
        if row < self.resolution && col < self.resolution {
            Some(row * self.resolution + col)
        } else {
            None
        }
    }

    /// `(row, col)` of a flat index, or `None` if outside the grid.
    pub fn row_col(&self, index: usize) -> Option<(usize, usize)> {
        if index < self.len() {
            Some((index / self.resolution, index % self.resolution))
        } else {
            None
        }
    }

    /// Local points one row at a time, south to north.
    pub fn rows(&self) -> impl Iterator<Item = &[LocalPoint]> {
        self.local.chunks(self.resolution.max(1))
    }

    /// Pair grid points with elevations fetched in grid order.
    ///
    /// If the lengths differ, the extra entries on the longer side are ignored.
    pub fn attach_elevations(&self, elevations: &[f64]) -> Vec<ElevationSample> {
        self.local
            .iter()
            .zip(elevations)
            .map(|(p, e)| ElevationSample::at(*p, *e))
            .collect()
    }
}
