//! Two-angle spherical rotation.
//!
//! The rotation first spins the sphere about its polar axis by `delta_lambda`
//! and then tilts it about the y-axis by `delta_phi`. Afterwards the point
//! `(-delta_lambda, -delta_phi)` sits at `(0, 0)`.

use std::f64::consts::TAU;

use super::geodesy::wrap_pi;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SphericalRotation {
    delta_lambda: f64,
    sin_phi: f64,
    cos_phi: f64,
}

impl SphericalRotation {
    /// Angles in radians. `delta_lambda` is reduced modulo 2π.
    pub fn new(delta_lambda: f64, delta_phi: f64) -> Self {
        let (sin_phi, cos_phi) = delta_phi.sin_cos();
        Self {
            delta_lambda: delta_lambda % TAU,
            sin_phi,
            cos_phi,
        }
    }

    pub fn from_degrees(lambda_deg: f64, phi_deg: f64) -> Self {
        Self::new(lambda_deg.to_radians(), phi_deg.to_radians())
    }

    /// Rotates `(lambda, phi)` (radians) into view space.
    pub fn forward(&self, lambda: f64, phi: f64) -> (f64, f64) {
        let lambda = wrap_pi(lambda + self.delta_lambda);
        let cos_p = phi.cos();
        let x = lambda.cos() * cos_p;
        let y = lambda.sin() * cos_p;
        let z = phi.sin();
        let k = z * self.cos_phi + x * self.sin_phi;
        (
            y.atan2(x * self.cos_phi - z * self.sin_phi),
            k.clamp(-1.0, 1.0).asin(),
        )
    }

    /// Exact inverse of [`SphericalRotation::forward`].
    pub fn invert(&self, lambda: f64, phi: f64) -> (f64, f64) {
        let cos_p = phi.cos();
        let x = lambda.cos() * cos_p;
        let y = lambda.sin() * cos_p;
        let z = phi.sin();
        let lambda = y.atan2(x * self.cos_phi + z * self.sin_phi);
        let phi = (z * self.cos_phi - x * self.sin_phi).clamp(-1.0, 1.0).asin();
        (wrap_pi(lambda - self.delta_lambda), phi)
    }
}

#[cfg(test)]
mod tests {
    use super::SphericalRotation;
    use crate::math::{GeoPoint, angular_distance};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn centers_negated_angles_at_origin() {
        let r = SphericalRotation::from_degrees(-55.2744, -25.1972);
        let (lambda, phi) = r.forward(55.2744f64.to_radians(), 25.1972f64.to_radians());
        assert_close(lambda, 0.0, 1e-12);
        assert_close(phi, 0.0, 1e-12);
    }

    #[test]
    fn invert_undoes_forward() {
        let r = SphericalRotation::from_degrees(123.0, -47.5);
        for &(lon, lat) in &[(0.0, 0.0), (-170.0, 60.0), (45.0, -89.0), (179.9, 12.0)] {
            let p = GeoPoint::new(lon, lat);
            let (l, f) = r.forward(p.lon_rad(), p.lat_rad());
            let (l2, f2) = r.invert(l, f);
            let back = GeoPoint::from_radians(l2, f2);
            assert!(angular_distance(p, back) < 1e-9, "{p:?} -> {back:?}");
        }
    }

    #[test]
    fn lambda_spin_is_periodic() {
        let a = SphericalRotation::from_degrees(30.0, 10.0);
        let b = SphericalRotation::from_degrees(30.0 + 720.0, 10.0);
        let pa = a.forward(0.3, 0.2);
        let pb = b.forward(0.3, 0.2);
        assert_close(pa.0, pb.0, 1e-9);
        assert_close(pa.1, pb.1, 1e-9);
    }
}
