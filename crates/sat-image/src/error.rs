//! Error types for image decoding and access.

use geos_projection::ProjectionError;
use thiserror::Error;

/// Result type alias for image operations.
pub type ImageResult<T> = Result<T, ImageError>;

/// Errors produced while building or reading a decoded image.
#[derive(Error, Debug)]
pub enum ImageError {
    /// Pixel coordinate outside the buffer dimensions.
    #[error("pixel ({x}, {y}) is outside the {columns}x{lines} image")]
    OutOfRange {
        x: usize,
        y: usize,
        columns: usize,
        lines: usize,
    },

    /// Sample array does not match the declared dimensions.
    #[error("image declares {expected} samples but has {actual}")]
    SampleCountMismatch { expected: usize, actual: usize },

    /// Acquisition timestamp does not form a valid UTC date.
    #[error("malformed acquisition timestamp: {0}")]
    MalformedTimestamp(String),

    /// Metadata fields are inconsistent or out of range.
    #[error("invalid image metadata: {0}")]
    InvalidMetadata(String),

    /// Projection failure while mapping pixels to coordinates.
    #[error("projection error: {0}")]
    Projection(#[from] ProjectionError),

    /// I/O failure while writing diagnostics.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
