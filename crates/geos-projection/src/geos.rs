//! Geostationary full-disk projection.
//!
//! One [`Geos`] instance represents one full-disk view: a satellite at a
//! given sub-satellite longitude and orbit radius. Both transforms are pure
//! functions of the immutable instance, so a single projection can be shared
//! read-only across every image from the same spacecraft.
//!
//! Reference: CGMS LRIT/HRIT Global Specification, normalized geostationary
//! projection geometry.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    ECCENTRICITY2, EQUATOR_RADIUS, INV_ONE_MINUS_ECC2, ONE_MINUS_ECC2, ORBIT_RADIUS, POLAR_RADIUS,
};
use crate::error::{ProjectionError, ProjectionResult};

/// A geographic point in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapPoint {
    /// Latitude in degrees, positive north.
    pub lat: f64,
    /// Longitude in degrees, positive east.
    pub lon: f64,
}

impl MapPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// A point in the satellite view plane, in degrees of view angle from the
/// sub-satellite point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedPoint {
    pub x: f64,
    pub y: f64,
}

impl ProjectedPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Geostationary projection for one full-disk view.
#[derive(Debug, Clone)]
pub struct Geos {
    /// Sub-satellite longitude, degrees.
    sublon: f64,
    /// Distance from the Earth centre to the satellite, km.
    orbit_radius: f64,
    /// `orbit_radius² - req²`, the fixed term of the line-of-sight quadratic.
    sat_distance2: f64,
}

impl Geos {
    /// Create a projection for a satellite at `sublon` degrees and
    /// `orbit_radius` km from the Earth centre.
    ///
    /// The orbit radius must exceed the equatorial radius; below that the
    /// line-of-sight geometry has no solution.
    pub fn new(sublon: f64, orbit_radius: f64) -> ProjectionResult<Self> {
        if orbit_radius <= EQUATOR_RADIUS {
            return Err(ProjectionError::InvalidOrbitRadius {
                radius: orbit_radius,
                minimum: EQUATOR_RADIUS,
            });
        }
        Ok(Self {
            sublon,
            orbit_radius,
            sat_distance2: orbit_radius * orbit_radius - EQUATOR_RADIUS * EQUATOR_RADIUS,
        })
    }

    /// Projection at the nominal geostationary orbit radius.
    pub fn nominal(sublon: f64) -> Self {
        Self {
            sublon,
            orbit_radius: ORBIT_RADIUS,
            sat_distance2: ORBIT_RADIUS * ORBIT_RADIUS - EQUATOR_RADIUS * EQUATOR_RADIUS,
        }
    }

    /// Sub-satellite longitude in degrees.
    pub fn sublon(&self) -> f64 {
        self.sublon
    }

    /// Orbit radius in km.
    pub fn orbit_radius(&self) -> f64 {
        self.orbit_radius
    }

    /// Convert a geographic point to view angles.
    ///
    /// Corrects the geodetic latitude to geocentric, finds the surface point
    /// on the ellipsoid, and normalizes the satellite-to-surface vector into
    /// view angles. A point on the far side of the Earth fails with
    /// [`ProjectionError::NotVisible`].
    pub fn map_to_projected(&self, point: &MapPoint) -> ProjectionResult<ProjectedPoint> {
        let lat = point.lat.to_radians();
        let lon = (point.lon - self.sublon).to_radians();

        // Geocentric latitude and distance to the ellipsoid surface.
        let c_lat = (ONE_MINUS_ECC2 * lat.tan()).atan();
        let rl = POLAR_RADIUS / (1.0 - ECCENTRICITY2 * c_lat.cos().powi(2)).sqrt();

        // Vector from the satellite to the surface point.
        let r1 = self.orbit_radius - rl * c_lat.cos() * lon.cos();
        let r2 = -rl * c_lat.cos() * lon.sin();
        let r3 = rl * c_lat.sin();

        if r1 <= 0.0 {
            return Err(ProjectionError::NotVisible {
                lat: point.lat,
                lon: point.lon,
            });
        }

        let rn = (r1 * r1 + r2 * r2 + r3 * r3).sqrt();

        Ok(ProjectedPoint {
            x: (-r2 / r1).atan().to_degrees(),
            y: (-r3 / rn).asin().to_degrees(),
        })
    }

    /// Convert view angles back to a geographic point.
    ///
    /// Solves the line-of-sight/ellipsoid intersection quadratic for the
    /// satellite-to-surface range, reconstructs the surface point, and
    /// derives geodetic latitude and longitude. A view angle that misses the
    /// disk (negative discriminant, or a ray pointing away from the Earth)
    /// fails with [`ProjectionError::OutOfDisk`].
    pub fn projected_to_map(&self, point: &ProjectedPoint) -> ProjectionResult<MapPoint> {
        let x = point.x.to_radians();
        let y = point.y.to_radians();

        let k = y.cos().powi(2) + INV_ONE_MINUS_ECC2 * y.sin().powi(2);
        let a = self.orbit_radius * x.cos() * y.cos();
        if a <= 0.0 {
            // The ray points away from the Earth.
            return Err(ProjectionError::OutOfDisk {
                x: point.x,
                y: point.y,
            });
        }

        let discriminant = a * a - k * self.sat_distance2;
        if discriminant < 0.0 {
            return Err(ProjectionError::OutOfDisk {
                x: point.x,
                y: point.y,
            });
        }

        // Near intersection of the ray with the ellipsoid.
        let sn = (a - discriminant.sqrt()) / k;

        let s1 = self.orbit_radius - sn * x.cos() * y.cos();
        let s2 = sn * x.sin() * y.cos();
        let s3 = -sn * y.sin();
        let sxy = (s1 * s1 + s2 * s2).sqrt();

        Ok(MapPoint {
            lat: (INV_ONE_MINUS_ECC2 * s3 / sxy).atan().to_degrees(),
            lon: (s2 / s1).atan().to_degrees() + self.sublon,
        })
    }
}

impl fmt::Display for Geos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GEOS(sublon: {}, orbit radius: {} km)",
            self.sublon, self.orbit_radius
        )
    }
}
