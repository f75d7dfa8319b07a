//! Sampling configuration with environment-variable overrides.
//!
//! # Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `GEOSAMPLE_RADIUS` | Search radius in meters | 500 |
//! | `GEOSAMPLE_RESOLUTION` | Grid points per axis | 25 |
//! | `GEOSAMPLE_IDW_K` | Neighbors per interpolation | 8 |
//! | `GEOSAMPLE_IDW_POWER` | IDW distance exponent | 2.0 |
//!
//! Unparsable values are logged and replaced by the default.

use std::str::FromStr;

use crate::error::{GeoError, Result};
use crate::grid::{GridSpec, MIN_RESOLUTION};
use crate::idw::{IdwInterpolator, DEFAULT_K, DEFAULT_POWER};

/// Default search radius in meters.
pub const DEFAULT_RADIUS_M: f64 = 500.0;

/// Default grid resolution.
pub const DEFAULT_RESOLUTION: usize = 25;

pub const ENV_RADIUS: &str = "GEOSAMPLE_RADIUS";
pub const ENV_RESOLUTION: &str = "GEOSAMPLE_RESOLUTION";
pub const ENV_IDW_K: &str = "GEOSAMPLE_IDW_K";
pub const ENV_IDW_POWER: &str = "GEOSAMPLE_IDW_POWER";

/// Validated sampling parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingConfig {
    /// Search radius in meters.
    pub radius_m: f64,
    /// Grid points per axis.
    pub resolution: usize,
    /// Interpolation parameters.
    pub idw: IdwInterpolator,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            radius_m: DEFAULT_RADIUS_M,
            resolution: DEFAULT_RESOLUTION,
            idw: IdwInterpolator::default(),
        }
    }
}

impl SamplingConfig {
    /// [`GridSpec`] for a search centered at `(lat, lon)`.
    pub fn grid_spec(&self, lat: f64, lon: f64) -> GridSpec {
        GridSpec::new(lat, lon, self.radius_m, self.resolution)
    }
}

/// Builder for [`SamplingConfig`].
///
/// # Example
///
/// ```
/// use geosample::SamplingConfigBuilder;
///
/// let config = SamplingConfigBuilder::new()
///     .radius(1_000.0)
///     .resolution(40)
///     .k(12)
///     .build()
///     .unwrap();
/// assert_eq!(config.idw.k, 12);
/// ```
#[derive(Debug, Clone)]
pub struct SamplingConfigBuilder {
    radius_m: f64,
    resolution: usize,
    k: usize,
    power: f64,
}

impl Default for SamplingConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SamplingConfigBuilder {
    /// Create a builder with default values.
    pub fn new() -> Self {
        Self {
            radius_m: DEFAULT_RADIUS_M,
            resolution: DEFAULT_RESOLUTION,
            k: DEFAULT_K,
            power: DEFAULT_POWER,
        }
    }

    /// Create a builder with values read from environment variables.
    ///
    /// Missing variables keep their defaults; malformed ones are logged at
    /// `warn` level and keep their defaults too.
    pub fn from_env() -> Self {
        Self {
            radius_m: env_or(ENV_RADIUS, DEFAULT_RADIUS_M),
            resolution: env_or(ENV_RESOLUTION, DEFAULT_RESOLUTION),
            k: env_or(ENV_IDW_K, DEFAULT_K),
            power: env_or(ENV_IDW_POWER, DEFAULT_POWER),
        }
    }

    /// Set the search radius in meters.
    pub fn radius(mut self, radius_m: f64) -> Self {
        self.radius_m = radius_m;
        self
    }

    /// Set the grid resolution.
    pub fn resolution(mut self, resolution: usize) -> Self {
        self.resolution = resolution;
        self
    }

    /// Set the number of interpolation neighbors.
    pub fn k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Set the IDW distance exponent.
    pub fn power(mut self, power: f64) -> Self {
        self.power = power;
        self
    }

    /// Validate and build the [`SamplingConfig`].
    ///
    /// # Errors
    ///
    /// - [`GeoError::InvalidRadius`] if the radius is not positive and finite
    /// - [`GeoError::InvalidResolution`] below [`MIN_RESOLUTION`]
    /// - [`GeoError::InvalidConfig`] if `k` is 0 or `power` is not finite
    pub fn build(self) -> Result<SamplingConfig> {
        if !self.radius_m.is_finite() || self.radius_m <= 0.0 {
            return Err(GeoError::InvalidRadius {
                radius: self.radius_m,
            });
        }
        if self.resolution < MIN_RESOLUTION {
            return Err(GeoError::InvalidResolution {
                resolution: self.resolution,
                minimum: MIN_RESOLUTION,
            });
        }
        if self.k == 0 {
            return Err(GeoError::InvalidConfig {
                message: "k must be at least 1".to_string(),
            });
        }
        if !self.power.is_finite() {
            return Err(GeoError::InvalidConfig {
                message: format!("power must be finite, got {}", self.power),
            });
        }

        Ok(SamplingConfig {
            radius_m: self.radius_m,
            resolution: self.resolution,
            idw: IdwInterpolator::new(self.k, self.power),
        })
    }
}

fn env_or<T: FromStr + Copy>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(variable = name, value = %raw, "Ignoring malformed value");
                default
            }
        },
        Err(_) => default,
    }
}
