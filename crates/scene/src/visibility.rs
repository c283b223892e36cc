use foundation::math::{GeoPoint, angular_distance};

use crate::projection::{Fit, ProjectionEngine, ProjectionKind, Rotation, Viewport};

/// Angular distance (radians) from the view center beyond which a globe
/// marker is hidden and no longer hit-testable. Sits just inside the
/// geometric horizon at π/2.
pub const VISIBILITY_CUTOFF_RAD: f64 = 1.5;

/// Front-facing test for the globe.
///
/// Built from a globe engine: the view center is the inverse projection of the
/// viewport center under the engine's rotation.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct VisibilityClassifier {
    center: GeoPoint,
}

impl VisibilityClassifier {
    /// `None` for flat kinds, which have no hidden hemisphere.
    pub fn for_engine(engine: &ProjectionEngine) -> Option<Self> {
        if !engine.kind().is_globe() {
            return None;
        }
        engine.center_of_view().map(|center| Self { center })
    }

    /// Classifier for a bare rotation; the viewport size does not move the
    /// view center.
    pub fn for_rotation(rotation: Rotation) -> Option<Self> {
        let engine = ProjectionEngine::new(
            ProjectionKind::Orthographic,
            Viewport::default(),
            rotation,
            Fit::Sphere,
        );
        Self::for_engine(&engine)
    }

    pub fn center(&self) -> GeoPoint {
        self.center
    }

    pub fn distance(&self, point: GeoPoint) -> f64 {
        angular_distance(point, self.center)
    }

    pub fn is_visible(&self, point: GeoPoint) -> bool {
        point.is_finite() && self.distance(point) <= VISIBILITY_CUTOFF_RAD
    }
}

/// One-shot form of [`VisibilityClassifier::is_visible`].
pub fn is_visible(point: GeoPoint, rotation: Rotation) -> bool {
    VisibilityClassifier::for_rotation(rotation).is_some_and(|c| c.is_visible(point))
}
