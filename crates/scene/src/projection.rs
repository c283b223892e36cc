//! Projection engine: geographic degrees to screen pixels and back.
//!
//! One engine serves every projection kind. The globe (orthographic) kind owns
//! a rotation and a fixed radius; the flat kinds are fitted to the viewport and
//! ignore rotation entirely.

use std::f64::consts::TAU;
use std::fmt;
use std::str::FromStr;

use foundation::math::{
    ConicEqualArea, GeoPoint, RawProjection, SphericalRotation, Vec2, Vec3, unit_vector, wrap_pi,
};

/// Globe radius in pixels.
pub const GLOBE_RADIUS_PX: f64 = 250.0;

/// Inset applied on every side when fitting a flat projection.
pub const FIT_PADDING_PX: f64 = 20.0;

/// Highest latitude drawn by the mercator outline (the square world edge).
pub const MERCATOR_MAX_LAT_DEG: f64 = 85.05112877980659;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum ProjectionKind {
    #[default]
    Orthographic,
    Mercator,
    NaturalEarth,
    EqualEarth,
    AzimuthalEqualArea,
    ConicEqualArea,
}

impl ProjectionKind {
    pub const ALL: [ProjectionKind; 6] = [
        ProjectionKind::Orthographic,
        ProjectionKind::Mercator,
        ProjectionKind::NaturalEarth,
        ProjectionKind::EqualEarth,
        ProjectionKind::AzimuthalEqualArea,
        ProjectionKind::ConicEqualArea,
    ];

    pub fn is_globe(self) -> bool {
        matches!(self, ProjectionKind::Orthographic)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProjectionKind::Orthographic => "orthographic",
            ProjectionKind::Mercator => "mercator",
            ProjectionKind::NaturalEarth => "natural-earth",
            ProjectionKind::EqualEarth => "equal-earth",
            ProjectionKind::AzimuthalEqualArea => "azimuthal-equal-area",
            ProjectionKind::ConicEqualArea => "conic-equal-area",
        }
    }

    /// Latitude limit for drawn geometry; mercator cannot reach the poles.
    pub fn max_drawn_latitude(self) -> f64 {
        match self {
            ProjectionKind::Mercator => MERCATOR_MAX_LAT_DEG,
            _ => 90.0,
        }
    }

    fn raw(self) -> RawProjection {
        match self {
            ProjectionKind::Orthographic => RawProjection::Orthographic,
            ProjectionKind::Mercator => RawProjection::Mercator,
            ProjectionKind::NaturalEarth => RawProjection::NaturalEarth1,
            ProjectionKind::EqualEarth => RawProjection::EqualEarth,
            ProjectionKind::AzimuthalEqualArea => RawProjection::AzimuthalEqualArea,
            ProjectionKind::ConicEqualArea => {
                RawProjection::ConicEqualArea(ConicEqualArea::default())
            }
        }
    }
}

impl fmt::Display for ProjectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownProjectionKind(pub String);

impl fmt::Display for UnknownProjectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown projection kind `{}`", self.0)
    }
}

impl std::error::Error for UnknownProjectionKind {}

impl FromStr for ProjectionKind {
    type Err = UnknownProjectionKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ProjectionKind::ALL
            .into_iter()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| UnknownProjectionKind(s.to_string()))
    }
}

/// Drawing area in pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Non-positive or non-finite sizes collapse to 1 px.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: clamp_dimension(width),
            height: clamp_dimension(height),
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

fn clamp_dimension(v: f64) -> f64 {
    if v.is_finite() && v >= 1.0 { v } else { 1.0 }
}

/// Globe orientation in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Rotation {
    pub lambda: f64,
    pub phi: f64,
}

impl Rotation {
    pub fn new(lambda: f64, phi: f64) -> Self {
        Self { lambda, phi }
    }

    /// Rotation that brings `point` to the center of the globe.
    pub fn centered_on(point: GeoPoint) -> Self {
        Self::new(-point.lon_deg, -point.lat_deg)
    }

    fn spherical(self) -> SphericalRotation {
        SphericalRotation::from_degrees(self.lambda, self.phi)
    }
}

/// How a flat projection's scale and translate are chosen.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Fit {
    /// Fit the sphere outline into the padded viewport.
    #[default]
    Sphere,
    /// Geography not loaded yet: `width / 2π`, centered.
    Unfitted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionEngine {
    kind: ProjectionKind,
    viewport: Viewport,
    fit: Fit,
    raw: RawProjection,
    /// `Some` only for the globe.
    rotation: Option<(Rotation, SphericalRotation)>,
    scale: f64,
    translate: Vec2,
}

impl ProjectionEngine {
    /// `rotation` is honored only by the globe kind.
    pub fn new(kind: ProjectionKind, viewport: Viewport, rotation: Rotation, fit: Fit) -> Self {
        let raw = kind.raw();
        let (scale, translate) = if kind.is_globe() {
            (GLOBE_RADIUS_PX, viewport.center())
        } else {
            match fit {
                Fit::Sphere => fit_extent(&raw, viewport),
                Fit::Unfitted => (viewport.width / TAU, viewport.center()),
            }
        };
        Self {
            kind,
            viewport,
            fit,
            raw,
            rotation: kind.is_globe().then(|| (rotation, rotation.spherical())),
            scale,
            translate,
        }
    }

    pub fn kind(&self) -> ProjectionKind {
        self.kind
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn fit(&self) -> Fit {
        self.fit
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn translate(&self) -> Vec2 {
        self.translate
    }

    pub fn rotation(&self) -> Option<Rotation> {
        self.rotation.map(|(r, _)| r)
    }

    /// Updates the globe orientation. Returns `false` (and does nothing) for
    /// flat kinds.
    pub fn set_rotation(&mut self, rotation: Rotation) -> bool {
        match &mut self.rotation {
            Some(slot) => {
                *slot = (rotation, rotation.spherical());
                true
            }
            None => false,
        }
    }

    /// Forward projection. `None` when the point is behind the globe, singular
    /// for the projection, or not finite.
    pub fn project(&self, point: GeoPoint) -> Option<Vec2> {
        if !point.is_finite() {
            return None;
        }
        let (lambda, phi) = self.rotate(point);
        if self.kind.is_globe() && lambda.cos() * phi.cos() < 0.0 {
            return None;
        }
        let (x, y) = self.raw.forward(lambda, phi)?;
        let screen = self.raw_to_screen(x, y);
        screen.is_finite().then_some(screen)
    }

    /// Inverse projection. `None` outside the globe disc (or the flat
    /// projection's domain).
    pub fn unproject(&self, screen: Vec2) -> Option<GeoPoint> {
        if !screen.is_finite() {
            return None;
        }
        let x = (screen.x - self.translate.x) / self.scale;
        let y = (self.translate.y - screen.y) / self.scale;
        let (lambda, phi) = self.raw.invert(x, y)?;
        let (lambda, phi) = match &self.rotation {
            Some((_, spin)) => spin.invert(lambda, phi),
            None => (wrap_pi(lambda), phi),
        };
        let point = GeoPoint::from_radians(lambda, phi);
        point.is_finite().then_some(point)
    }

    /// The geographic point under the viewport center.
    pub fn center_of_view(&self) -> Option<GeoPoint> {
        self.unproject(self.viewport.center())
    }

    /// Unit vector of `point` after rotation. `x` is the depth toward the
    /// viewer, `y`/`z` are the globe's raw plane coordinates.
    pub fn view_vector(&self, point: GeoPoint) -> Vec3 {
        let (lambda, phi) = self.rotate(point);
        unit_vector(lambda, phi)
    }

    /// Maps raw projection coordinates (y up) to screen pixels (y down).
    pub fn raw_to_screen(&self, x: f64, y: f64) -> Vec2 {
        Vec2::new(
            self.translate.x + self.scale * x,
            self.translate.y - self.scale * y,
        )
    }

    fn rotate(&self, point: GeoPoint) -> (f64, f64) {
        let (lambda, phi) = (point.lon_rad(), point.lat_rad());
        match &self.rotation {
            Some((_, spin)) => spin.forward(lambda, phi),
            None => (lambda, phi),
        }
    }
}

/// Scale and translate that fit the raw outline into the padded viewport.
fn fit_extent(raw: &RawProjection, viewport: Viewport) -> (f64, Vec2) {
    let bounds = raw.outline_bounds();
    let w = (viewport.width - 2.0 * FIT_PADDING_PX).max(1.0);
    let h = (viewport.height - 2.0 * FIT_PADDING_PX).max(1.0);
    if bounds.is_empty() || bounds.width() <= 0.0 || bounds.height() <= 0.0 {
        return (viewport.width / TAU, viewport.center());
    }
    let k = (w / bounds.width()).min(h / bounds.height());
    let tx = FIT_PADDING_PX + (w - k * (bounds.min[0] + bounds.max[0])) / 2.0;
    let ty = FIT_PADDING_PX + (h + k * (bounds.min[1] + bounds.max[1])) / 2.0;
    (k, Vec2::new(tx, ty))
}
