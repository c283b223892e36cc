use std::collections::{HashMap, HashSet};

use catalog::Building;
use foundation::math::Vec2;

use crate::projection::ProjectionEngine;
use crate::visibility::VisibilityClassifier;

pub const MARKER_RADIUS_PX: f64 = 4.0;
pub const HOVERED_MARKER_RADIUS_PX: f64 = 6.0;

/// Visual state of one building's marker. Derived from the building and the
/// current projection; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub building: Building,
    pub position: Option<Vec2>,
    pub visible: bool,
    pub hovered: bool,
}

impl Marker {
    fn entering(building: Building) -> Self {
        Self {
            building,
            position: None,
            visible: false,
            hovered: false,
        }
    }

    pub fn key(&self) -> &str {
        &self.building.name
    }

    /// Whether pointer events reach this marker.
    pub fn interactive(&self) -> bool {
        self.visible && self.position.is_some()
    }

    pub fn opacity(&self) -> f64 {
        if self.visible { 1.0 } else { 0.0 }
    }

    pub fn radius(&self) -> f64 {
        if self.hovered {
            HOVERED_MARKER_RADIUS_PX
        } else {
            MARKER_RADIUS_PX
        }
    }
}

/// Keys touched by a [`MarkerLayer::sync`], in draw order (exits in their old
/// order).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkerDiff {
    pub entered: Vec<String>,
    pub updated: Vec<String>,
    pub exited: Vec<String>,
}

/// Markers keyed by building name, kept in dataset order.
#[derive(Debug, Clone, Default)]
pub struct MarkerLayer {
    markers: Vec<Marker>,
}

impl MarkerLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diffs the layer against a new building list.
    ///
    /// Continuing markers keep their visual state until the next
    /// [`MarkerLayer::reposition`]. Entering markers start hidden and
    /// non-interactive. When a name repeats, the first record wins.
    pub fn sync(&mut self, buildings: &[Building]) -> MarkerDiff {
        let mut old: Vec<Option<Marker>> = std::mem::take(&mut self.markers)
            .into_iter()
            .map(Some)
            .collect();
        let index: HashMap<String, usize> = old
            .iter()
            .enumerate()
            .filter_map(|(i, m)| m.as_ref().map(|m| (m.key().to_string(), i)))
            .collect();

        let mut diff = MarkerDiff::default();
        let mut seen: HashSet<&str> = HashSet::new();
        for building in buildings {
            if !seen.insert(building.name.as_str()) {
                continue;
            }
            let previous = index.get(&building.name).and_then(|&i| old[i].take());
            match previous {
                Some(mut marker) => {
                    marker.building = building.clone();
                    diff.updated.push(building.name.clone());
                    self.markers.push(marker);
                }
                None => {
                    diff.entered.push(building.name.clone());
                    self.markers.push(Marker::entering(building.clone()));
                }
            }
        }
        diff.exited = old
            .into_iter()
            .flatten()
            .map(|m| m.building.name)
            .collect();
        diff
    }

    /// Recomputes positions and visibility under `engine`. On the globe a
    /// marker is visible only when it projects and passes the visibility
    /// classifier; on flat maps projecting is enough.
    pub fn reposition(&mut self, engine: &ProjectionEngine) {
        let classifier = VisibilityClassifier::for_engine(engine);
        for marker in &mut self.markers {
            let point = marker.building.position();
            marker.position = engine.project(point);
            marker.visible = marker.position.is_some()
                && classifier.is_none_or(|c| c.is_visible(point));
        }
    }

    pub fn set_hovered(&mut self, key: Option<&str>) {
        for marker in &mut self.markers {
            marker.hovered = key == Some(marker.key());
        }
    }

    pub fn get(&self, key: &str) -> Option<&Marker> {
        self.markers.iter().find(|m| m.key() == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter()
    }

    pub fn as_slice(&self) -> &[Marker] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::{Fit, ProjectionKind, Rotation, Viewport};
    use catalog::sample_buildings;
    use pretty_assertions::assert_eq;

    fn named(names: &[&str]) -> Vec<Building> {
        let all = sample_buildings();
        names
            .iter()
            .map(|n| {
                all.iter()
                    .find(|b| b.name == *n)
                    .cloned()
                    .unwrap_or_else(|| panic!("missing {n}"))
            })
            .collect()
    }

    fn globe(rotation: Rotation) -> ProjectionEngine {
        ProjectionEngine::new(
            ProjectionKind::Orthographic,
            Viewport::default(),
            rotation,
            Fit::Sphere,
        )
    }

    #[test]
    fn sync_diffs_by_name() {
        let mut layer = MarkerLayer::new();
        let first = layer.sync(&named(&["Burj Khalifa", "Shanghai Tower", "Taipei 101"]));
        assert_eq!(
            first.entered,
            vec!["Burj Khalifa", "Shanghai Tower", "Taipei 101"]
        );
        assert!(first.updated.is_empty() && first.exited.is_empty());

        let second = layer.sync(&named(&["Burj Khalifa", "Lotte World Tower", "Taipei 101"]));
        assert_eq!(
            second,
            MarkerDiff {
                entered: vec!["Lotte World Tower".to_string()],
                updated: vec!["Burj Khalifa".to_string(), "Taipei 101".to_string()],
                exited: vec!["Shanghai Tower".to_string()],
            }
        );
        let keys: Vec<&str> = layer.iter().map(Marker::key).collect();
        assert_eq!(keys, vec!["Burj Khalifa", "Lotte World Tower", "Taipei 101"]);
    }

    #[test]
    fn entering_markers_start_hidden() {
        let mut layer = MarkerLayer::new();
        layer.sync(&named(&["Burj Khalifa"]));
        let m = layer.get("Burj Khalifa").expect("marker");
        assert!(!m.visible);
        assert!(!m.interactive());
        assert_eq!(m.opacity(), 0.0);
    }

    #[test]
    fn continuing_markers_keep_state_across_sync() {
        let mut layer = MarkerLayer::new();
        layer.sync(&named(&["Burj Khalifa", "Taipei 101"]));
        let burj = named(&["Burj Khalifa"]).remove(0);
        layer.reposition(&globe(Rotation::centered_on(burj.position())));
        let before = layer.get("Burj Khalifa").cloned().expect("marker");
        assert!(before.visible);

        layer.sync(&named(&["Burj Khalifa"]));
        assert_eq!(layer.get("Burj Khalifa"), Some(&before));
    }

    #[test]
    fn duplicate_names_keep_the_first_record() {
        let mut buildings = named(&["Taipei 101"]);
        let mut twin = buildings[0].clone();
        twin.city = "Elsewhere".to_string();
        buildings.push(twin);

        let mut layer = MarkerLayer::new();
        let diff = layer.sync(&buildings);
        assert_eq!(diff.entered, vec!["Taipei 101"]);
        assert_eq!(layer.len(), 1);
        assert_eq!(layer.get("Taipei 101").map(|m| m.building.city.as_str()), Some("Taipei"));
    }

    #[test]
    fn globe_reposition_hides_far_side() {
        let mut layer = MarkerLayer::new();
        layer.sync(&named(&["Burj Khalifa", "One World Trade Center"]));
        let burj = named(&["Burj Khalifa"]).remove(0);
        layer.reposition(&globe(Rotation::centered_on(burj.position())));

        let front = layer.get("Burj Khalifa").expect("marker");
        assert!(front.interactive());
        let at = front.position.expect("projected");
        let center = Viewport::default().center();
        assert!(at.distance(center) < 1e-9, "{at:?}");

        let back = layer.get("One World Trade Center").expect("marker");
        assert!(!back.visible);
        assert!(!back.interactive());
    }

    #[test]
    fn flat_reposition_shows_everything_projectable() {
        let mut layer = MarkerLayer::new();
        layer.sync(&sample_buildings());
        let engine = ProjectionEngine::new(
            ProjectionKind::NaturalEarth,
            Viewport::default(),
            Rotation::default(),
            Fit::Sphere,
        );
        layer.reposition(&engine);
        assert!(layer.iter().all(Marker::interactive));
    }

    #[test]
    fn hovered_marker_grows() {
        let mut layer = MarkerLayer::new();
        layer.sync(&named(&["Burj Khalifa", "Taipei 101"]));
        layer.set_hovered(Some("Taipei 101"));
        assert_eq!(layer.get("Taipei 101").map(Marker::radius), Some(HOVERED_MARKER_RADIUS_PX));
        assert_eq!(layer.get("Burj Khalifa").map(Marker::radius), Some(MARKER_RADIUS_PX));
        layer.set_hovered(None);
        assert!(layer.iter().all(|m| !m.hovered));
    }
}
