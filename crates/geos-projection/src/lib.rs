//! Normalized geostationary projection for full-disk satellite imagery.
//!
//! A geostationary satellite sees the Earth disk from a fixed point above
//! the equator. This crate maps between geographic latitude/longitude and
//! the view angles of that satellite, following the CGMS LRIT/HRIT Global
//! Specification full-disk geometry. View angles are expressed in degrees
//! from the sub-satellite point.

pub mod constants;
pub mod error;
pub mod geos;

pub use error::{ProjectionError, ProjectionResult};
pub use geos::{Geos, MapPoint, ProjectedPoint};
