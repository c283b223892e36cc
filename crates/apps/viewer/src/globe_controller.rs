//! Drag-to-rotate controller for the globe.
//!
//! This module turns pointer drags into globe rotation:
//! - Linear mapping of 0.5° per pixel (x spins longitude, y tilts latitude)
//! - No clamping: rotation is unbounded and wraps through the trig functions
//! - No inertia: the globe stops when the drag stream stops

use foundation::math::{GeoPoint, Vec2};
use scene::Rotation;

/// Degrees of rotation per pixel of drag.
pub const DRAG_DEGREES_PER_PIXEL: f64 = 0.5;

/// Globe controller state.
///
/// The controller is the single owner of the rotation. Scenes are rebuilt from
/// it, so switching to a flat map and back restores the last orientation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobeController {
    rotation: Rotation,
    /// Last pointer position while a drag gesture is active.
    drag_from: Option<Vec2>,
}

impl GlobeController {
    pub fn new(rotation: Rotation) -> Self {
        Self {
            rotation,
            drag_from: None,
        }
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_from.is_some()
    }

    /// Applies one incremental drag delta (pixels since the previous event).
    pub fn apply_drag(&mut self, dx: f64, dy: f64) -> Rotation {
        self.rotation.lambda += dx * DRAG_DEGREES_PER_PIXEL;
        self.rotation.phi -= dy * DRAG_DEGREES_PER_PIXEL;
        self.rotation
    }

    /// Turns the globe so `point` faces the viewer.
    pub fn center_on(&mut self, point: GeoPoint) -> Rotation {
        self.rotation = Rotation::centered_on(point);
        self.rotation
    }

    /// Handle pointer down event: starts a drag gesture.
    pub fn on_pointer_down(&mut self, pos_px: Vec2) {
        self.drag_from = Some(pos_px);
    }

    /// Handle pointer move event.
    ///
    /// Returns the new rotation when a drag is active, `None` otherwise.
    pub fn on_pointer_move(&mut self, pos_px: Vec2) -> Option<Rotation> {
        let from = self.drag_from?;
        self.drag_from = Some(pos_px);
        let delta = pos_px - from;
        Some(self.apply_drag(delta.x, delta.y))
    }

    /// Handle pointer up event: ends the gesture.
    pub fn on_pointer_up(&mut self) {
        self.drag_from = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn drag_is_linear_and_additive() {
        let deltas = [(12.0, -4.0), (-3.5, 8.0), (100.0, 0.25), (0.0, -17.0)];
        let mut c = GlobeController::new(Rotation::new(10.0, -5.0));
        for (dx, dy) in deltas {
            c.apply_drag(dx, dy);
        }
        let sum_dx: f64 = deltas.iter().map(|d| d.0).sum();
        let sum_dy: f64 = deltas.iter().map(|d| d.1).sum();
        assert_close(c.rotation().lambda, 10.0 + sum_dx * 0.5, 1e-12);
        assert_close(c.rotation().phi, -5.0 - sum_dy * 0.5, 1e-12);
    }

    #[test]
    fn drag_is_not_clamped() {
        let mut c = GlobeController::default();
        for _ in 0..10 {
            c.apply_drag(200.0, -200.0);
        }
        assert_eq!(c.rotation(), Rotation::new(1000.0, 1000.0));
    }

    #[test]
    fn pointer_gesture_derives_deltas() {
        let mut c = GlobeController::default();
        assert_eq!(c.on_pointer_move(Vec2::new(5.0, 5.0)), None);

        c.on_pointer_down(Vec2::new(100.0, 100.0));
        assert!(c.is_dragging());
        c.on_pointer_move(Vec2::new(140.0, 90.0));
        let r = c.on_pointer_move(Vec2::new(160.0, 80.0)).expect("dragging");
        assert_eq!(r, Rotation::new(30.0, 10.0));

        c.on_pointer_up();
        assert!(!c.is_dragging());
        assert_eq!(c.on_pointer_move(Vec2::new(0.0, 0.0)), None);
        assert_eq!(c.rotation(), Rotation::new(30.0, 10.0));
    }

    #[test]
    fn center_on_negates_coordinates() {
        let mut c = GlobeController::default();
        let r = c.center_on(GeoPoint::new(55.2744, 25.1972));
        assert_eq!(r, Rotation::new(-55.2744, -25.1972));
    }
}
