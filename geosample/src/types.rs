//! Point value types shared by every module.

use serde::{Deserialize, Serialize};

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// A position in meters on the local tangent plane around a center [`GeoPoint`].
///
/// Only meaningful relative to the center it was projected with.
/// `x` grows east, `y` grows north.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LocalPoint {
    pub x: f64,
    pub y: f64,
}

impl LocalPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean planar distance to `(x, y)`.
    #[inline]
    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        let dx = self.x - x;
        let dy = self.y - y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A known elevation at a local-plane position.
///
/// Produced by whatever fetched the data (bulk elevation API, point lookups,
/// contour extraction); the interpolator only consumes it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ElevationSample {
    pub x: f64,
    pub y: f64,
    /// Elevation in meters.
    pub elevation: f64,
}

impl ElevationSample {
    pub fn new(x: f64, y: f64, elevation: f64) -> Self {
        Self { x, y, elevation }
    }

    /// Attach an elevation to a projected point.
    pub fn at(point: LocalPoint, elevation: f64) -> Self {
        Self::new(point.x, point.y, elevation)
    }

    /// The sample position without its elevation.
    pub fn location(&self) -> LocalPoint {
        LocalPoint::new(self.x, self.y)
    }

    /// Euclidean planar distance from this sample to `(x, y)`.
    #[inline]
    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        self.location().distance_to(x, y)
    }
}
