//! Error types for projection operations.

use thiserror::Error;

/// Result type alias for projection operations.
pub type ProjectionResult<T> = Result<T, ProjectionError>;

/// Errors produced by the geostationary transform.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    /// The configured orbit radius puts the satellite inside the Earth.
    #[error("orbit radius {radius} km must exceed the equatorial radius {minimum} km")]
    InvalidOrbitRadius { radius: f64, minimum: f64 },

    /// The view angle misses the Earth disk entirely.
    #[error("view angle ({x}, {y}) does not intersect the Earth disk")]
    OutOfDisk { x: f64, y: f64 },

    /// The geographic point lies on the far side of the Earth.
    #[error("point ({lat}, {lon}) is not visible from the satellite")]
    NotVisible { lat: f64, lon: f64 },
}
