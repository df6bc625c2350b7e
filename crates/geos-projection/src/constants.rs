//! Geodetic constants for the geostationary Earth model.
//!
//! Values follow the CGMS LRIT/HRIT Global Specification Earth ellipsoid,
//! expressed in kilometres. Derived quantities are computed from the primary
//! radii so the whole model stays consistent if one of them changes.

/// Earth equatorial radius (semi-major axis), km.
pub const EQUATOR_RADIUS: f64 = 6378.169;

/// Earth polar radius (semi-minor axis), km.
pub const POLAR_RADIUS: f64 = 6356.5838;

/// Nominal geostationary orbit radius, measured from the Earth centre, km.
pub const ORBIT_RADIUS: f64 = 42164.0;

/// First eccentricity squared of the ellipsoid, `1 - rpol²/req²`.
pub const ECCENTRICITY2: f64 =
    1.0 - (POLAR_RADIUS * POLAR_RADIUS) / (EQUATOR_RADIUS * EQUATOR_RADIUS);

/// Complement of the eccentricity squared, `1 - e²` (= `rpol²/req²`).
pub const ONE_MINUS_ECC2: f64 = 1.0 - ECCENTRICITY2;

/// Inverse complement, `1 / (1 - e²)`.
pub const INV_ONE_MINUS_ECC2: f64 = 1.0 / ONE_MINUS_ECC2;
