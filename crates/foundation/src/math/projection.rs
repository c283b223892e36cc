//! Raw cartographic projections.
//!
//! All functions take and return radians / unit-scale plane coordinates with
//! `y` pointing north. Scaling, translation and screen-space y flipping are the
//! caller's concern.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use crate::bounds::Aabb2;

const NATURAL_EARTH_ITERATIONS: usize = 25;
const NATURAL_EARTH_EPSILON: f64 = 1e-6;

const EQUAL_EARTH_A1: f64 = 1.340264;
const EQUAL_EARTH_A2: f64 = -0.081106;
const EQUAL_EARTH_A3: f64 = 0.000893;
const EQUAL_EARTH_A4: f64 = 0.003796;
const EQUAL_EARTH_ITERATIONS: usize = 12;
const EQUAL_EARTH_EPSILON: f64 = 1e-12;

/// Default standard parallels (degrees) for the conic equal-area projection.
pub const CONIC_STANDARD_PARALLELS: [f64; 2] = [0.0, 60.0];

/// Step (degrees) used when tracing the sphere outline for bounds.
const OUTLINE_STEP_DEG: f64 = 1.0;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ConicEqualArea {
    n: f64,
    c: f64,
    r0: f64,
}

impl ConicEqualArea {
    /// Standard parallels in radians. Returns `None` when the parallels are
    /// symmetric about the equator (the projection degenerates to cylindrical).
    pub fn new(phi0: f64, phi1: f64) -> Option<Self> {
        let sy0 = phi0.sin();
        let n = (sy0 + phi1.sin()) / 2.0;
        if n.abs() < 1e-6 {
            return None;
        }
        let c = 1.0 + sy0 * (2.0 * n - sy0);
        Some(Self {
            n,
            c,
            r0: c.sqrt() / n,
        })
    }

    fn forward(&self, lambda: f64, phi: f64) -> (f64, f64) {
        let r = (self.c - 2.0 * self.n * phi.sin()).sqrt() / self.n;
        let x = lambda * self.n;
        (r * x.sin(), self.r0 - r * x.cos())
    }

    fn invert(&self, x: f64, y: f64) -> (f64, f64) {
        let r0y = self.r0 - y;
        let mut l = x.atan2(r0y.abs()) * sign(r0y);
        if r0y * self.n < 0.0 {
            l -= PI * sign(x) * sign(r0y);
        }
        let s = (self.c - (x * x + r0y * r0y) * self.n * self.n) / (2.0 * self.n);
        (l / self.n, s.clamp(-1.0, 1.0).asin())
    }
}

impl Default for ConicEqualArea {
    fn default() -> Self {
        let [a, b] = CONIC_STANDARD_PARALLELS;
        // The default parallels are not symmetric, so this never degenerates.
        Self::new(a.to_radians(), b.to_radians()).unwrap_or(Self {
            n: 0.5,
            c: 1.0,
            r0: 2.0,
        })
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum RawProjection {
    Orthographic,
    Mercator,
    NaturalEarth1,
    EqualEarth,
    AzimuthalEqualArea,
    ConicEqualArea(ConicEqualArea),
}

impl RawProjection {
    /// Forward projection. `None` for singular points (mercator poles, the
    /// azimuthal antipode) or non-finite results.
    pub fn forward(&self, lambda: f64, phi: f64) -> Option<(f64, f64)> {
        let (x, y) = match self {
            RawProjection::Orthographic => (phi.cos() * lambda.sin(), phi.sin()),
            RawProjection::Mercator => (lambda, (FRAC_PI_4 + phi / 2.0).tan().ln()),
            RawProjection::NaturalEarth1 => natural_earth1(lambda, phi),
            RawProjection::EqualEarth => equal_earth(lambda, phi),
            RawProjection::AzimuthalEqualArea => {
                let cx = lambda.cos();
                let cy = phi.cos();
                let denom = 1.0 + cx * cy;
                if denom <= 0.0 {
                    return None;
                }
                let k = (2.0 / denom).sqrt();
                (k * cy * lambda.sin(), k * phi.sin())
            }
            RawProjection::ConicEqualArea(conic) => conic.forward(lambda, phi),
        };
        finite_pair(x, y)
    }

    /// Inverse projection. `None` outside the projection's domain.
    pub fn invert(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let (lambda, phi) = match self {
            RawProjection::Orthographic => {
                if x * x + y * y > 1.0 {
                    return None;
                }
                azimuthal_invert(x, y, f64::asin)
            }
            RawProjection::Mercator => (x, 2.0 * y.exp().atan() - FRAC_PI_2),
            RawProjection::NaturalEarth1 => natural_earth1_invert(x, y),
            RawProjection::EqualEarth => equal_earth_invert(x, y),
            RawProjection::AzimuthalEqualArea => {
                if x * x + y * y > 4.0 {
                    return None;
                }
                azimuthal_invert(x, y, |z| 2.0 * (z / 2.0).asin())
            }
            RawProjection::ConicEqualArea(conic) => conic.invert(x, y),
        };
        finite_pair(lambda, phi)
    }

    /// Bounds of the sphere's silhouette in raw coordinates.
    pub fn outline_bounds(&self) -> Aabb2 {
        match self {
            RawProjection::Orthographic => Aabb2::new([-1.0, -1.0], [1.0, 1.0]),
            // Web-style square world, clipped at about ±85.05° latitude.
            RawProjection::Mercator => Aabb2::new([-PI, -PI], [PI, PI]),
            RawProjection::AzimuthalEqualArea => Aabb2::new([-2.0, -2.0], [2.0, 2.0]),
            _ => self.traced_outline_bounds(),
        }
    }

    fn traced_outline_bounds(&self) -> Aabb2 {
        let mut bounds = Aabb2::empty();
        let steps_lat = (180.0 / OUTLINE_STEP_DEG) as usize;
        let steps_lon = (360.0 / OUTLINE_STEP_DEG) as usize;
        for i in 0..=steps_lat {
            let phi = (-90.0 + i as f64 * OUTLINE_STEP_DEG).to_radians();
            for lambda in [-PI, PI] {
                if let Some((x, y)) = self.forward(lambda, phi) {
                    bounds.extend([x, y]);
                }
            }
        }
        for i in 0..=steps_lon {
            let lambda = (-180.0 + i as f64 * OUTLINE_STEP_DEG).to_radians();
            for phi in [-FRAC_PI_2, FRAC_PI_2] {
                if let Some((x, y)) = self.forward(lambda, phi) {
                    bounds.extend([x, y]);
                }
            }
        }
        bounds
    }
}

fn natural_earth1(lambda: f64, phi: f64) -> (f64, f64) {
    (lambda * natural_earth1_x_factor(phi), natural_earth1_y(phi).0)
}

fn natural_earth1_x_factor(phi: f64) -> f64 {
    let phi2 = phi * phi;
    let phi4 = phi2 * phi2;
    0.8707 - 0.131979 * phi2 + phi4 * (-0.013791 + phi4 * (0.003971 * phi2 - 0.001529 * phi4))
}

/// `y(phi)` and its derivative.
fn natural_earth1_y(phi: f64) -> (f64, f64) {
    let phi2 = phi * phi;
    let phi4 = phi2 * phi2;
    let tail = -0.044475 + 0.028874 * phi2 - 0.005916 * phi4;
    let dtail = -0.044475 * 7.0 + 0.028874 * 9.0 * phi2 - 0.005916 * 11.0 * phi4;
    (
        phi * (1.007226 + phi2 * (0.015085 + phi4 * tail)),
        1.007226 + phi2 * (0.015085 * 3.0 + phi4 * dtail),
    )
}

fn natural_earth1_invert(x: f64, y: f64) -> (f64, f64) {
    let mut phi = y;
    for _ in 0..NATURAL_EARTH_ITERATIONS {
        let (fy, fpy) = natural_earth1_y(phi);
        let delta = (fy - y) / fpy;
        phi -= delta;
        if delta.abs() <= NATURAL_EARTH_EPSILON {
            break;
        }
    }
    (x / natural_earth1_x_factor(phi), phi)
}

fn equal_earth_m() -> f64 {
    3f64.sqrt() / 2.0
}

/// `y(l)` over the parametric latitude `l`, and its derivative.
fn equal_earth_y(l: f64) -> (f64, f64) {
    let l2 = l * l;
    let l6 = l2 * l2 * l2;
    (
        l * (EQUAL_EARTH_A1 + EQUAL_EARTH_A2 * l2 + l6 * (EQUAL_EARTH_A3 + EQUAL_EARTH_A4 * l2)),
        EQUAL_EARTH_A1
            + 3.0 * EQUAL_EARTH_A2 * l2
            + l6 * (7.0 * EQUAL_EARTH_A3 + 9.0 * EQUAL_EARTH_A4 * l2),
    )
}

fn equal_earth(lambda: f64, phi: f64) -> (f64, f64) {
    let m = equal_earth_m();
    let l = (m * phi.sin()).asin();
    let (y, dy) = equal_earth_y(l);
    (lambda * l.cos() / (m * dy), y)
}

fn equal_earth_invert(x: f64, y: f64) -> (f64, f64) {
    let m = equal_earth_m();
    let mut l = y;
    for _ in 0..EQUAL_EARTH_ITERATIONS {
        let (fy, fpy) = equal_earth_y(l);
        let delta = (fy - y) / fpy;
        l -= delta;
        if delta.abs() < EQUAL_EARTH_EPSILON {
            break;
        }
    }
    let (_, dy) = equal_earth_y(l);
    (m * x * dy / l.cos(), (l.sin() / m).clamp(-1.0, 1.0).asin())
}

/// Shared inverse for azimuthal projections; `angle` maps the planar radius to
/// the angular distance from the projection center.
fn azimuthal_invert(x: f64, y: f64, angle: impl Fn(f64) -> f64) -> (f64, f64) {
    let z = (x * x + y * y).sqrt();
    let c = angle(z);
    let (sc, cc) = c.sin_cos();
    let phi = if z == 0.0 {
        0.0
    } else {
        (y * sc / z).clamp(-1.0, 1.0).asin()
    };
    ((x * sc).atan2(z * cc), phi)
}

fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

fn finite_pair(a: f64, b: f64) -> Option<(f64, f64)> {
    (a.is_finite() && b.is_finite()).then_some((a, b))
}
