//! Calibrated pixel buffers and metadata for geostationary satellite images.
//!
//! An importer (HDF5, HRIT, ...) fills an [`Image`] with raw samples,
//! calibration parameters and acquisition metadata; consumers read
//! calibrated values back out and map pixels to geographic coordinates
//! through the shared [`geos_projection::Geos`] projection.

pub mod buffer;
pub mod channels;
pub mod dump;
pub mod error;
pub mod image;

pub use buffer::{default_missing, CalibratedBuffer, Calibration, PixelBuffer};
pub use channels::{log_mismatches, CalibrationMismatch, ChannelRef, ChannelRegistry};
pub use dump::dump_image;
pub use error::{ImageError, ImageResult};
pub use image::{AcquisitionTime, Image};
