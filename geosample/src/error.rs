//! Error types for the geosample library.
//!
//! The numeric core (projection, grid generation, interpolation, height
//! parsing) is total and never returns these. They are raised only at the
//! validating boundaries: configuration, strict grid specs and the GeoJSON
//! adapter.

use thiserror::Error;

/// Errors that can occur when validating sampling inputs.
#[derive(Error, Debug)]
pub enum GeoError {
    /// IO error when reading input files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Grid resolution below the supported minimum.
    #[error("Invalid grid resolution: {resolution} (minimum is {minimum})")]
    InvalidResolution { resolution: usize, minimum: usize },

    /// Search radius that is not a positive, finite number of meters.
    #[error("Invalid radius: {radius} m (must be positive and finite)")]
    InvalidRadius { radius: f64 },

    /// Coordinates that cannot be used as a projection center or input position.
    #[error("Invalid coordinate: {message}")]
    InvalidCoordinate { message: String },

    /// A configuration value that failed validation.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// Result type alias using [`GeoError`].
pub type Result<T> = std::result::Result<T, GeoError>;
