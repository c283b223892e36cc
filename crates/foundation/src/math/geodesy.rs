use std::f64::consts::{PI, TAU};

use super::Vec3;

/// Geographic position in degrees (spherical model).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoPoint {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl GeoPoint {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }

    pub fn lon_rad(self) -> f64 {
        self.lon_deg.to_radians()
    }

    pub fn lat_rad(self) -> f64 {
        self.lat_deg.to_radians()
    }

    pub fn from_radians(lon_rad: f64, lat_rad: f64) -> Self {
        Self::new(lon_rad.to_degrees(), lat_rad.to_degrees())
    }

    pub fn to_unit_vector(self) -> Vec3 {
        unit_vector(self.lon_rad(), self.lat_rad())
    }

    pub fn is_finite(self) -> bool {
        self.lon_deg.is_finite() && self.lat_deg.is_finite()
    }
}

/// Unit vector for a (lambda, phi) pair in radians.
///
/// Convention: `x` points at (0, 0), `y` at (90°E, 0), `z` at the north pole.
pub fn unit_vector(lambda: f64, phi: f64) -> Vec3 {
    let cos_phi = phi.cos();
    Vec3::new(lambda.cos() * cos_phi, lambda.sin() * cos_phi, phi.sin())
}

/// Inverse of [`unit_vector`]; returns `(lambda, phi)` in radians.
pub fn spherical(v: Vec3) -> (f64, f64) {
    (v.y.atan2(v.x), v.z.clamp(-1.0, 1.0).asin())
}

/// Great-circle angular distance in radians, in `[0, π]`.
///
/// Uses the atan2 form, which stays accurate for both tiny and near-antipodal
/// separations.
pub fn angular_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    let (lambda0, phi0) = (a.lon_rad(), a.lat_rad());
    let (lambda1, phi1) = (b.lon_rad(), b.lat_rad());
    let delta = lambda1 - lambda0;
    let (sin_delta, cos_delta) = delta.sin_cos();
    let (sin_phi0, cos_phi0) = phi0.sin_cos();
    let (sin_phi1, cos_phi1) = phi1.sin_cos();

    let u = cos_phi1 * sin_delta;
    let v = cos_phi0 * sin_phi1 - sin_phi0 * cos_phi1 * cos_delta;
    let z = (u * u + v * v).sqrt();
    z.atan2(sin_phi0 * sin_phi1 + cos_phi0 * cos_phi1 * cos_delta)
}

/// Wraps an angle in radians into `[-π, π]`.
pub fn wrap_pi(angle: f64) -> f64 {
    if angle > PI {
        angle - TAU
    } else if angle < -PI {
        angle + TAU
    } else {
        angle
    }
}
