//! Geographic locations on a spherical Earth.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0072;

/// A point given by latitude/longitude in degrees and depth in km (positive down).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub depth: f64,
}

impl Location {
    pub const fn new(lat: f64, lon: f64, depth: f64) -> Self {
        Self { lat, lon, depth }
    }

    /// Returns the same surface position at a different depth.
    pub fn with_depth(self, depth: f64) -> Self {
        Self { depth, ..self }
    }

    /// Converts to a unit vector with +Z through the north pole.
    pub fn to_unit_vector(self) -> DVec3 {
        let lat = self.lat.to_radians();
        let lon = self.lon.to_radians();
        DVec3::new(lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin())
    }

    /// Converts a (not necessarily normalized) vector back to a location.
    pub fn from_unit_vector(v: DVec3, depth: f64) -> Self {
        let v = v.normalize_or_zero();
        let lat = v.z.clamp(-1.0, 1.0).asin().to_degrees();
        let lon = v.y.atan2(v.x).to_degrees();
        Self { lat, lon, depth }
    }

    /// Great-circle surface distance in km, ignoring depth.
    pub fn horizontal_distance(&self, other: &Location) -> f64 {
        EARTH_RADIUS_KM * angular_distance(self.to_unit_vector(), other.to_unit_vector())
    }

    /// Initial azimuth from `self` toward `other`, degrees clockwise from north in [0, 360).
    pub fn azimuth_to(&self, other: &Location) -> f64 {
        let p = self.to_unit_vector();
        let q = other.to_unit_vector();
        let (east, north) = local_tangent_basis(p);
        let d = q - p;
        normalize_azimuth(d.dot(east).atan2(d.dot(north)).to_degrees())
    }

    /// Travels `distance_km` along the great circle leaving at `azimuth_deg`.
    ///
    /// Depth is preserved.
    pub fn destination(&self, azimuth_deg: f64, distance_km: f64) -> Location {
        let p = self.to_unit_vector();
        let (east, north) = local_tangent_basis(p);
        let az = azimuth_deg.to_radians();
        let tangent = north * az.cos() + east * az.sin();
        let angle = distance_km / EARTH_RADIUS_KM;
        Location::from_unit_vector(p * angle.cos() + tangent * angle.sin(), self.depth)
    }

    /// Point a `fraction` of the way from `self` to `other` along the great circle.
    ///
    /// Depth is interpolated linearly.
    pub fn interpolate(&self, other: &Location, fraction: f64) -> Location {
        let depth = self.depth + (other.depth - self.depth) * fraction;
        let a = self.to_unit_vector();
        let b = other.to_unit_vector();
        let theta = angular_distance(a, b);
        if theta < 1e-12 {
            return self.with_depth(depth);
        }
        let s = theta.sin();
        let v = a * (((1.0 - fraction) * theta).sin() / s) + b * ((fraction * theta).sin() / s);
        Location::from_unit_vector(v, depth)
    }
}

/// Angle between two unit vectors in radians.
///
/// Uses `atan2(|a×b|, a·b)`, which stays accurate for the short arcs between
/// neighbouring trace points where `acos` loses precision.
pub fn angular_distance(a: DVec3, b: DVec3) -> f64 {
    a.cross(b).length().atan2(a.dot(b))
}

/// Returns `(east, north)` tangent unit vectors at sphere point `p`.
///
/// Near the poles an arbitrary orthonormal basis is used.
pub fn local_tangent_basis(p: DVec3) -> (DVec3, DVec3) {
    let up = DVec3::Z;
    let mut north = up - p * up.dot(p);
    let nlen = north.length();
    if nlen < 1e-12 {
        let a = if p.x.abs() < 0.9 { DVec3::X } else { DVec3::Y };
        north = (a - p * a.dot(p)).normalize_or_zero();
    } else {
        north /= nlen;
    }
    let east = north.cross(p).normalize_or_zero();
    (east, north)
}

/// Wraps an angle in degrees into [0, 360).
pub fn normalize_azimuth(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}
