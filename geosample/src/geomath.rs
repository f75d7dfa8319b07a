//! Degree/meter conversions and the local tangent-plane projection.
//!
//! Two sets of meters-per-degree constants live here:
//!
//! - [`METERS_PER_DEGREE`] (111 000 m) drives the degree deltas used for
//!   bounding boxes and grid extents.
//! - [`METERS_PER_DEGREE_LON`] / [`METERS_PER_DEGREE_LAT`] (111 320 m and
//!   110 540 m) drive [`to_local_xy`].
//!
//! They are not consistent with each other: a point `radius` meters north of
//! the center by delta math projects to `radius * 110540 / 111000` meters.
//! Downstream geometry is built against both, so neither set is adjusted.
//!
//! All functions are pure and never panic. Latitudes approaching ±90° make
//! [`lon_delta_from_meters`] diverge; that case is not guarded.

use crate::bbox::BoundingBox;
use crate::types::{GeoPoint, LocalPoint};

/// Mean meters per degree used for degree deltas.
pub const METERS_PER_DEGREE: f64 = 111_000.0;

/// Meters per degree of longitude at the equator, used by the local projection.
pub const METERS_PER_DEGREE_LON: f64 = 111_320.0;

/// Meters per degree of latitude, used by the local projection.
pub const METERS_PER_DEGREE_LAT: f64 = 110_540.0;

/// Mean Earth radius in meters (IUGG), used by [`haversine_distance`].
pub const EARTH_MEAN_RADIUS: f64 = 6_371_008.8;

/// Degrees of latitude spanned by `meters`.
///
/// # Examples
///
/// ```
/// use geosample::geomath::lat_delta_from_meters;
///
/// assert!((lat_delta_from_meters(111_000.0) - 1.0).abs() < 1e-9);
/// ```
pub fn lat_delta_from_meters(meters: f64) -> f64 {
    meters / METERS_PER_DEGREE
}

/// Degrees of longitude spanned by `meters` at the given latitude.
///
/// Diverges as `at_lat` approaches ±90°.
///
/// # Examples
///
/// ```
/// use geosample::geomath::lon_delta_from_meters;
///
/// assert!((lon_delta_from_meters(111_000.0, 0.0) - 1.0).abs() < 1e-9);
/// assert!(lon_delta_from_meters(111_000.0, 60.0) > 1.99);
/// ```
pub fn lon_delta_from_meters(meters: f64, at_lat: f64) -> f64 {
    meters / (METERS_PER_DEGREE * at_lat.to_radians().cos())
}

/// Bounding box of the square of half-side `radius_m` around `(lat, lon)`.
///
/// The result is normalized for any sign of `radius_m`: a non-zero radius
/// gives `south < north` and `west < east`. A zero radius collapses the box
/// onto the center point.
pub fn bounding_box(lat: f64, lon: f64, radius_m: f64) -> BoundingBox {
    let lat_delta = lat_delta_from_meters(radius_m);
    let lon_delta = lon_delta_from_meters(radius_m, lat);

    BoundingBox::new(
        lat - lat_delta,
        lon - lon_delta,
        lat + lat_delta,
        lon + lon_delta,
    )
}

/// Project `(lat, lon)` onto the local plane centered at `(center_lat, center_lon)`.
///
/// # Examples
///
/// ```
/// use geosample::geomath::to_local_xy;
///
/// let p = to_local_xy(48.8566, 2.3522, 48.8566, 2.3522);
/// assert!(p.x.abs() < 1e-9 && p.y.abs() < 1e-9);
///
/// let north = to_local_xy(1.0, 0.0, 0.0, 0.0);
/// assert!((north.y - 110_540.0).abs() < 1e-6);
/// ```
pub fn to_local_xy(lat: f64, lon: f64, center_lat: f64, center_lon: f64) -> LocalPoint {
    let x = (lon - center_lon) * METERS_PER_DEGREE_LON * center_lat.to_radians().cos();
    let y = (lat - center_lat) * METERS_PER_DEGREE_LAT;
    LocalPoint::new(x, y)
}

/// Inverse of [`to_local_xy`].
///
/// Non-finite longitudes come back for centers at the poles.
pub fn from_local_xy(point: LocalPoint, center: GeoPoint) -> GeoPoint {
    LocalProjection::new(center).to_geo(point)
}

/// Great-circle distance in meters between two geographic points.
pub fn haversine_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_MEAN_RADIUS * h.sqrt().min(1.0).asin()
}

/// A local tangent-plane projection anchored at a center point.
///
/// Equivalent to calling [`to_local_xy`] with a fixed center, with
/// `cos(center_lat)` computed once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalProjection {
    center: GeoPoint,
    /// Meters per degree of longitude at the center latitude.
    lon_scale: f64,
}

impl LocalProjection {
    pub fn new(center: GeoPoint) -> Self {
        Self {
            center,
            lon_scale: METERS_PER_DEGREE_LON * center.lat.to_radians().cos(),
        }
    }

    /// The projection center.
    pub fn center(&self) -> GeoPoint {
        self.center
    }

    /// Project a geographic point to local meters.
    pub fn to_local(&self, point: GeoPoint) -> LocalPoint {
        LocalPoint::new(
            (point.lon - self.center.lon) * self.lon_scale,
            (point.lat - self.center.lat) * METERS_PER_DEGREE_LAT,
        )
    }

    /// Convert local meters back to a geographic point.
    pub fn to_geo(&self, point: LocalPoint) -> GeoPoint {
        GeoPoint::new(
            self.center.lat + point.y / METERS_PER_DEGREE_LAT,
            self.center.lon + point.x / self.lon_scale,
        )
    }
}
