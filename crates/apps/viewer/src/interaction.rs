use catalog::Building;
use foundation::math::Vec2;
use scene::{HoverChange, HoverState, Rotation, Tooltip, pick_marker};
use tracing::debug;

use crate::globe_controller::GlobeController;
use crate::surface::{RenderSurface, ViewMode};

/// Pointer, drag and selection handling on top of a [`RenderSurface`].
///
/// Owns the rotation (through [`GlobeController`]) and the hover state; the
/// surface only mirrors them.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    globe: GlobeController,
    hover: HoverState,
}

impl InteractionController {
    pub fn new(rotation: Rotation) -> Self {
        Self {
            globe: GlobeController::new(rotation),
            hover: HoverState::new(),
        }
    }

    pub fn rotation(&self) -> Rotation {
        self.globe.rotation()
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hover.hovered()
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.hover.tooltip()
    }

    /// One drag tick. Ignored (returns `false`) outside globe mode.
    pub fn drag(&mut self, surface: &mut RenderSurface, dx: f64, dy: f64) -> bool {
        if surface.mode() != ViewMode::Globe {
            debug!(dx, dy, "drag ignored in map mode");
            return false;
        }
        let rotation = self.globe.apply_drag(dx, dy);
        self.rotate(surface, rotation);
        true
    }

    pub fn pointer_down(&mut self, surface: &RenderSurface, pos: Vec2) {
        if surface.mode() == ViewMode::Globe {
            self.globe.on_pointer_down(pos);
        }
    }

    /// While dragging, rotates. Otherwise hit-tests the markers and performs
    /// the enter/leave transition.
    pub fn pointer_move(&mut self, surface: &mut RenderSurface, pos: Vec2) -> HoverChange {
        if let Some(rotation) = self.globe.on_pointer_move(pos) {
            self.rotate(surface, rotation);
            return HoverChange::Unchanged;
        }
        match pick_marker(surface.markers(), pos).map(|m| m.key().to_string()) {
            Some(key) if self.hover.hovered() == Some(key.as_str()) => HoverChange::Unchanged,
            Some(key) => self.pointer_enter(surface, &key),
            None => self.pointer_leave(surface),
        }
    }

    pub fn pointer_up(&mut self) {
        self.globe.on_pointer_up();
    }

    /// Pointer entered the marker `key`. Only honored when the marker is
    /// currently interactive (on the globe: passes the visibility test).
    pub fn pointer_enter(&mut self, surface: &mut RenderSurface, key: &str) -> HoverChange {
        let Some(marker) = surface.markers().get(key) else {
            return HoverChange::Unchanged;
        };
        let change = self.hover.enter(marker);
        surface.set_hovered(self.hover.hovered());
        change
    }

    pub fn pointer_leave(&mut self, surface: &mut RenderSurface) -> HoverChange {
        let change = self.hover.leave();
        surface.set_hovered(None);
        change
    }

    /// Sidebar selection. On the globe the building is turned to face the
    /// viewer first; on a flat map only the tooltip opens. Returns `false`
    /// when the building cannot be projected.
    pub fn select(&mut self, surface: &mut RenderSurface, building: &Building) -> bool {
        if surface.mode() == ViewMode::Globe {
            let rotation = self.globe.center_on(building.position());
            surface.on_rotate(rotation);
        }
        let Some(position) = surface.engine().project(building.position()) else {
            debug!(name = %building.name, "selected building does not project");
            return false;
        };
        self.hover.force(&building.name, position);
        surface.set_hovered(Some(&building.name));
        true
    }

    /// Re-anchors or clears the hover after the surface changed.
    pub fn refresh_hover(&mut self, surface: &mut RenderSurface) -> HoverChange {
        let change = self.hover.refresh(surface.markers());
        if change == HoverChange::Cleared {
            debug!("hover cleared");
        }
        surface.set_hovered(self.hover.hovered());
        change
    }

    /// Ends any drag gesture in progress.
    pub fn cancel_drag(&mut self) {
        self.globe.on_pointer_up();
    }

    fn rotate(&mut self, surface: &mut RenderSurface, rotation: Rotation) {
        surface.on_rotate(rotation);
        self.refresh_hover(surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::sample_buildings;
    use layers::Theme;
    use scene::{ProjectionKind, Viewport};

    fn surface(kind: ProjectionKind, rotation: Rotation) -> RenderSurface {
        RenderSurface::new(kind, Viewport::default(), rotation, Theme::Light, sample_buildings())
    }

    fn building(name: &str) -> Building {
        sample_buildings()
            .into_iter()
            .find(|b| b.name == name)
            .unwrap_or_else(|| panic!("missing {name}"))
    }

    #[test]
    fn select_centers_and_hovers_on_globe() {
        let mut s = surface(ProjectionKind::Orthographic, Rotation::default());
        let mut c = InteractionController::default();
        assert!(c.select(&mut s, &building("Taipei 101")));
        assert_eq!(c.rotation(), Rotation::new(-121.5645, -25.034));
        assert_eq!(c.hovered(), Some("Taipei 101"));
        let marker = s.markers().get("Taipei 101").expect("marker");
        assert!(marker.visible && marker.hovered);
        let anchor = c.tooltip().expect("tooltip").anchor;
        assert!((anchor.x - 410.0).abs() < 1e-6 && (anchor.y - 290.0).abs() < 1e-6);
    }

    #[test]
    fn select_on_map_leaves_rotation_alone() {
        let mut s = surface(ProjectionKind::EqualEarth, Rotation::default());
        let mut c = InteractionController::new(Rotation::new(12.0, 34.0));
        assert!(c.select(&mut s, &building("Lakhta Center")));
        assert_eq!(c.rotation(), Rotation::new(12.0, 34.0));
        let at = s
            .engine()
            .project(building("Lakhta Center").position())
            .expect("projects");
        assert_eq!(c.tooltip().map(|t| t.anchor), Some(at + Vec2::new(10.0, -10.0)));
    }

    #[test]
    fn drag_rotates_only_on_globe() {
        let mut globe = surface(ProjectionKind::Orthographic, Rotation::default());
        let mut c = InteractionController::default();
        assert!(c.drag(&mut globe, 10.0, -20.0));
        assert_eq!(c.rotation(), Rotation::new(5.0, 10.0));
        assert_eq!(globe.engine().rotation(), Some(Rotation::new(5.0, 10.0)));

        let mut map = surface(ProjectionKind::Mercator, Rotation::default());
        assert!(!c.drag(&mut map, 10.0, -20.0));
        assert_eq!(c.rotation(), Rotation::new(5.0, 10.0));
    }

    #[test]
    fn pointer_move_hit_tests_markers() {
        let taipei = building("Taipei 101");
        let rotation = Rotation::centered_on(taipei.position());
        let mut s = surface(ProjectionKind::Orthographic, rotation);
        let mut c = InteractionController::new(rotation);

        let center = Viewport::default().center();
        assert_eq!(c.pointer_move(&mut s, center + Vec2::new(2.0, 0.0)), HoverChange::Entered);
        assert_eq!(c.hovered(), Some("Taipei 101"));
        assert_eq!(c.pointer_move(&mut s, center + Vec2::new(1.0, 1.0)), HoverChange::Unchanged);
        assert_eq!(c.pointer_move(&mut s, center + Vec2::new(60.0, 60.0)), HoverChange::Cleared);
        assert_eq!(c.hovered(), None);
    }

    #[test]
    fn pointer_drag_gesture_rotates() {
        let mut s = surface(ProjectionKind::Orthographic, Rotation::default());
        let mut c = InteractionController::default();
        c.pointer_down(&s, Vec2::new(100.0, 100.0));
        c.pointer_move(&mut s, Vec2::new(200.0, 100.0));
        c.pointer_move(&mut s, Vec2::new(100.0, 100.0));
        c.pointer_up();
        assert_eq!(c.rotation(), Rotation::default());
    }

    #[test]
    fn hover_clears_when_rotated_away() {
        let taipei = building("Taipei 101");
        let mut s = surface(ProjectionKind::Orthographic, Rotation::default());
        let mut c = InteractionController::default();
        c.select(&mut s, &taipei);
        assert_eq!(c.hovered(), Some("Taipei 101"));

        // Half a turn puts Taipei on the far side.
        assert!(c.drag(&mut s, 360.0, 0.0));
        assert_eq!(c.hovered(), None);
        assert!(s.markers().get("Taipei 101").is_some_and(|m| !m.hovered && !m.visible));
    }

    #[test]
    fn enter_on_hidden_marker_is_ignored() {
        let mut s = surface(ProjectionKind::Orthographic, Rotation::default());
        let mut c = InteractionController::default();
        // Rotation (0, 0) faces the Gulf of Guinea; Taipei is out of view.
        assert_eq!(c.pointer_enter(&mut s, "Taipei 101"), HoverChange::Unchanged);
        assert_eq!(c.hovered(), None);
    }
}
