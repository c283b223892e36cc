use foundation::math::Vec2;

use crate::markers::{Marker, MarkerLayer};

/// Tooltip offset from the marker center, in screen pixels.
pub const TOOLTIP_OFFSET_PX: Vec2 = Vec2 { x: 10.0, y: -10.0 };

#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub key: String,
    pub anchor: Vec2,
}

impl Tooltip {
    pub fn at(key: &str, marker_position: Vec2) -> Self {
        Self {
            key: key.to_string(),
            anchor: marker_position + TOOLTIP_OFFSET_PX,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HoverChange {
    Unchanged,
    Entered,
    Moved,
    Cleared,
}

/// At most one hovered building, with its tooltip anchor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HoverState {
    tooltip: Option<Tooltip>,
}

impl HoverState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hovered(&self) -> Option<&str> {
        self.tooltip.as_ref().map(|t| t.key.as_str())
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    /// Pointer entered `marker`. Ignored unless the marker is interactive, so
    /// stale hit targets left behind by a fast drag cannot open a tooltip.
    pub fn enter(&mut self, marker: &Marker) -> HoverChange {
        let Some(at) = marker.position.filter(|_| marker.interactive()) else {
            return HoverChange::Unchanged;
        };
        let next = Tooltip::at(marker.key(), at);
        if self.tooltip.as_ref() == Some(&next) {
            return HoverChange::Unchanged;
        }
        self.tooltip = Some(next);
        HoverChange::Entered
    }

    pub fn leave(&mut self) -> HoverChange {
        match self.tooltip.take() {
            Some(_) => HoverChange::Cleared,
            None => HoverChange::Unchanged,
        }
    }

    /// Opens the tooltip for `key` at `position` regardless of pointer state.
    pub fn force(&mut self, key: &str, position: Vec2) -> HoverChange {
        self.tooltip = Some(Tooltip::at(key, position));
        HoverChange::Entered
    }

    /// Follows the hovered marker after the layer moved. Clears the hover when
    /// the marker is gone or no longer interactive.
    pub fn refresh(&mut self, layer: &MarkerLayer) -> HoverChange {
        let Some(key) = self.hovered() else {
            return HoverChange::Unchanged;
        };
        let anchor = layer
            .get(key)
            .filter(|m| m.interactive())
            .and_then(|m| m.position)
            .map(|p| p + TOOLTIP_OFFSET_PX);
        match (anchor, self.tooltip.as_mut()) {
            (Some(anchor), Some(tooltip)) => {
                if tooltip.anchor == anchor {
                    HoverChange::Unchanged
                } else {
                    tooltip.anchor = anchor;
                    HoverChange::Moved
                }
            }
            _ => {
                self.tooltip = None;
                HoverChange::Cleared
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::{Fit, ProjectionEngine, ProjectionKind, Rotation, Viewport};
    use catalog::sample_buildings;
    use foundation::math::GeoPoint;
    use pretty_assertions::assert_eq;

    fn layer_at(rotation: Rotation) -> MarkerLayer {
        let mut layer = MarkerLayer::new();
        layer.sync(&sample_buildings());
        layer.reposition(&ProjectionEngine::new(
            ProjectionKind::Orthographic,
            Viewport::default(),
            rotation,
            Fit::Sphere,
        ));
        layer
    }

    fn taipei_rotation() -> Rotation {
        Rotation::centered_on(GeoPoint::new(121.5645, 25.0340))
    }

    #[test]
    fn enter_anchors_tooltip_up_and_right() {
        let layer = layer_at(taipei_rotation());
        let marker = layer.get("Taipei 101").expect("marker");
        let at = marker.position.expect("projected");

        let mut hover = HoverState::new();
        assert_eq!(hover.enter(marker), HoverChange::Entered);
        assert_eq!(hover.hovered(), Some("Taipei 101"));
        let tooltip = hover.tooltip().expect("tooltip");
        assert_eq!(tooltip.anchor, Vec2::new(at.x + 10.0, at.y - 10.0));

        assert_eq!(hover.enter(marker), HoverChange::Unchanged);
        assert_eq!(hover.leave(), HoverChange::Cleared);
        assert_eq!(hover.leave(), HoverChange::Unchanged);
        assert_eq!(hover.hovered(), None);
    }

    #[test]
    fn enter_ignores_hidden_marker() {
        let layer = layer_at(taipei_rotation());
        let far = layer.get("One World Trade Center").expect("marker");
        assert!(!far.interactive());

        let mut hover = HoverState::new();
        assert_eq!(hover.enter(far), HoverChange::Unchanged);
        assert_eq!(hover.tooltip(), None);
    }

    #[test]
    fn refresh_follows_then_clears() {
        let mut hover = HoverState::new();
        let layer = layer_at(taipei_rotation());
        hover.enter(layer.get("Taipei 101").expect("marker"));

        let nudged = layer_at(Rotation::new(
            taipei_rotation().lambda + 5.0,
            taipei_rotation().phi,
        ));
        assert_eq!(hover.refresh(&nudged), HoverChange::Moved);
        let expected = nudged
            .get("Taipei 101")
            .and_then(|m| m.position)
            .expect("projected");
        assert_eq!(
            hover.tooltip().map(|t| t.anchor),
            Some(expected + TOOLTIP_OFFSET_PX)
        );
        assert_eq!(hover.refresh(&nudged), HoverChange::Unchanged);

        let away = layer_at(Rotation::centered_on(GeoPoint::new(-60.0, -25.0)));
        assert_eq!(hover.refresh(&away), HoverChange::Cleared);
        assert_eq!(hover.hovered(), None);
    }

    #[test]
    fn refresh_clears_when_marker_is_filtered_out() {
        let mut layer = layer_at(taipei_rotation());
        let mut hover = HoverState::new();
        hover.enter(layer.get("Taipei 101").expect("marker"));

        let rest: Vec<_> = sample_buildings()
            .into_iter()
            .filter(|b| b.name != "Taipei 101")
            .collect();
        layer.sync(&rest);
        assert_eq!(hover.refresh(&layer), HoverChange::Cleared);
    }

    #[test]
    fn force_opens_without_pointer() {
        let mut hover = HoverState::new();
        hover.force("Burj Khalifa", Vec2::new(400.0, 300.0));
        assert_eq!(
            hover.tooltip(),
            Some(&Tooltip {
                key: "Burj Khalifa".to_string(),
                anchor: Vec2::new(410.0, 290.0),
            })
        );
    }
}
