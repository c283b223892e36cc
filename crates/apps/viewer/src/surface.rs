//! The render surface: owns the live scene and keeps it in step with the
//! projection, the filtered buildings and the theme.
//!
//! Every mutation goes through one named entry point, and each entry point
//! recomputes only what it has to:
//!
//! | event                 | engine | boundaries | markers        | colors |
//! |-----------------------|--------|------------|----------------|--------|
//! | geography loaded      | new    | rebuilt    | rebuilt        | -      |
//! | rotate (globe only)   | rotate | rebuilt    | repositioned   | -      |
//! | filter change         | -      | -          | diffed + moved | -      |
//! | projection kind       | new    | rebuilt    | rebuilt        | -      |
//! | resize                | new    | rebuilt    | rebuilt        | -      |
//! | theme                 | -      | -          | -              | yes    |

use std::sync::Arc;

use catalog::Building;
use foundation::math::Vec2;
use geography::{GeographyOrigin, LoadedGeography};
use layers::{BoundaryLayer, BoundaryShape, Palette, SubPath, Theme, sphere_outline};
use scene::{
    Fit, Marker, MarkerDiff, MarkerLayer, ProjectionEngine, ProjectionKind, Rotation, Viewport,
};
use tracing::debug;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ViewMode {
    Globe,
    Map,
}

impl ViewMode {
    pub fn of(kind: ProjectionKind) -> Self {
        if kind.is_globe() {
            ViewMode::Globe
        } else {
            ViewMode::Map
        }
    }
}

/// One live scene graph: a projection and everything drawn through it.
#[derive(Debug, Clone)]
struct SceneGraph {
    engine: ProjectionEngine,
    background: SubPath,
    boundaries: BoundaryLayer,
    markers: MarkerLayer,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSnapshot {
    pub key: String,
    pub position: Option<Vec2>,
    pub visible: bool,
    pub interactive: bool,
    pub hovered: bool,
    pub radius: f64,
    pub opacity: f64,
}

impl From<&Marker> for MarkerSnapshot {
    fn from(m: &Marker) -> Self {
        Self {
            key: m.key().to_string(),
            position: m.position,
            visible: m.visible,
            interactive: m.interactive(),
            hovered: m.hovered,
            radius: m.radius(),
            opacity: m.opacity(),
        }
    }
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneSnapshot {
    pub mode: ViewMode,
    pub kind: ProjectionKind,
    pub viewport: Viewport,
    pub palette: Palette,
    pub background: SubPath,
    pub boundaries: Vec<BoundaryShape>,
    pub markers: Vec<MarkerSnapshot>,
    pub geometry_revision: u64,
}

pub struct RenderSurface {
    viewport: Viewport,
    theme: Theme,
    geography: Option<Arc<LoadedGeography>>,
    buildings: Vec<Building>,
    hovered: Option<String>,
    scene: SceneGraph,
    geometry_revision: u64,
}

impl RenderSurface {
    pub fn new(
        kind: ProjectionKind,
        viewport: Viewport,
        rotation: Rotation,
        theme: Theme,
        buildings: Vec<Building>,
    ) -> Self {
        let engine = ProjectionEngine::new(kind, viewport, rotation, Fit::Unfitted);
        let mut surface = Self {
            viewport,
            theme,
            geography: None,
            buildings,
            hovered: None,
            scene: SceneGraph {
                background: sphere_outline(&engine),
                engine,
                boundaries: BoundaryLayer::default(),
                markers: MarkerLayer::new(),
            },
            geometry_revision: 0,
        };
        surface.rebuild(kind, rotation);
        surface
    }

    pub fn mode(&self) -> ViewMode {
        ViewMode::of(self.kind())
    }

    pub fn kind(&self) -> ProjectionKind {
        self.scene.engine.kind()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn palette(&self) -> Palette {
        self.theme.palette()
    }

    pub fn engine(&self) -> &ProjectionEngine {
        &self.scene.engine
    }

    pub fn background(&self) -> &SubPath {
        &self.scene.background
    }

    pub fn boundaries(&self) -> &BoundaryLayer {
        &self.scene.boundaries
    }

    pub fn markers(&self) -> &MarkerLayer {
        &self.scene.markers
    }

    /// The filtered buildings currently drawn, in dataset order.
    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    pub fn building(&self, name: &str) -> Option<&Building> {
        self.buildings.iter().find(|b| b.name == name)
    }

    pub fn geography_origin(&self) -> Option<&GeographyOrigin> {
        self.geography.as_ref().map(|g| &g.origin)
    }

    /// Bumped on every boundary rebuild.
    pub fn geometry_revision(&self) -> u64 {
        self.geometry_revision
    }

    pub fn on_geography_loaded(&mut self, geography: Arc<LoadedGeography>, rotation: Rotation) {
        debug!(
            features = geography.collection.len(),
            placeholder = geography.is_placeholder(),
            "surface: geography arrived"
        );
        self.geography = Some(geography);
        self.rebuild(self.kind(), rotation);
    }

    /// Rotates the globe. Returns `false` in map mode, where rotation has no
    /// meaning and nothing changes.
    pub fn on_rotate(&mut self, rotation: Rotation) -> bool {
        if !self.scene.engine.set_rotation(rotation) {
            return false;
        }
        self.rebuild_boundaries();
        self.scene.markers.reposition(&self.scene.engine);
        true
    }

    /// Diffs markers against a new filtered list and positions them.
    pub fn on_filter_change(&mut self, buildings: Vec<Building>) -> MarkerDiff {
        let diff = self.scene.markers.sync(&buildings);
        self.buildings = buildings;
        self.scene.markers.reposition(&self.scene.engine);
        self.apply_hover();
        debug!(
            entered = diff.entered.len(),
            updated = diff.updated.len(),
            exited = diff.exited.len(),
            "surface: markers diffed"
        );
        diff
    }

    /// Drops the live scene and builds one for `kind`. A no-op when the kind
    /// is unchanged.
    pub fn on_projection_kind_change(&mut self, kind: ProjectionKind, rotation: Rotation) -> bool {
        if kind == self.kind() {
            return false;
        }
        self.rebuild(kind, rotation);
        true
    }

    pub fn on_resize(&mut self, viewport: Viewport, rotation: Rotation) {
        self.viewport = viewport;
        self.rebuild(self.kind(), rotation);
    }

    /// Recolors only; geometry is untouched.
    pub fn on_theme_change(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn set_hovered(&mut self, key: Option<&str>) {
        self.hovered = key.map(str::to_string);
        self.apply_hover();
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            mode: self.mode(),
            kind: self.kind(),
            viewport: self.viewport,
            palette: self.palette(),
            background: self.scene.background.clone(),
            boundaries: self.scene.boundaries.shapes().to_vec(),
            markers: self.scene.markers.iter().map(MarkerSnapshot::from).collect(),
            geometry_revision: self.geometry_revision,
        }
    }

    fn fit(&self) -> Fit {
        if self.geography.is_some() {
            Fit::Sphere
        } else {
            Fit::Unfitted
        }
    }

    fn rebuild(&mut self, kind: ProjectionKind, rotation: Rotation) {
        let engine = ProjectionEngine::new(kind, self.viewport, rotation, self.fit());
        let mut markers = MarkerLayer::new();
        markers.sync(&self.buildings);
        markers.reposition(&engine);
        self.scene = SceneGraph {
            background: sphere_outline(&engine),
            engine,
            boundaries: BoundaryLayer::default(),
            markers,
        };
        self.rebuild_boundaries();
        self.apply_hover();
        debug!(
            kind = %kind,
            revision = self.geometry_revision,
            "surface: scene rebuilt"
        );
    }

    fn rebuild_boundaries(&mut self) {
        self.scene.boundaries = match &self.geography {
            Some(geo) => BoundaryLayer::build(&geo.collection, &self.scene.engine),
            None => BoundaryLayer::default(),
        };
        self.geometry_revision += 1;
    }

    fn apply_hover(&mut self) {
        self.scene.markers.set_hovered(self.hovered.as_deref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::sample_buildings;
    use geography::graticule::placeholder_collection;
    use pretty_assertions::assert_eq;

    fn placeholder() -> Arc<LoadedGeography> {
        Arc::new(LoadedGeography {
            collection: placeholder_collection(),
            origin: GeographyOrigin::Placeholder,
        })
    }

    fn globe_surface() -> RenderSurface {
        RenderSurface::new(
            ProjectionKind::Orthographic,
            Viewport::default(),
            Rotation::default(),
            Theme::Light,
            sample_buildings(),
        )
    }

    #[test]
    fn draws_markers_before_geography_arrives() {
        let surface = globe_surface();
        assert!(surface.boundaries().is_empty());
        assert_eq!(surface.markers().len(), 25);
        assert!(surface.geography_origin().is_none());
    }

    #[test]
    fn geography_arrival_builds_boundaries() {
        let mut surface = globe_surface();
        let before = surface.geometry_revision();
        surface.on_geography_loaded(placeholder(), Rotation::default());
        assert_eq!(surface.boundaries().len(), 2);
        assert!(surface.geometry_revision() > before);
        assert_eq!(surface.geography_origin(), Some(&GeographyOrigin::Placeholder));
    }

    #[test]
    fn theme_change_leaves_geometry_alone() {
        let mut surface = globe_surface();
        surface.on_geography_loaded(placeholder(), Rotation::default());
        let before = surface.snapshot();

        surface.on_theme_change(Theme::Dark);
        let after = surface.snapshot();
        assert_eq!(after.geometry_revision, before.geometry_revision);
        assert_eq!(after.boundaries, before.boundaries);
        assert_eq!(after.markers, before.markers);
        assert_ne!(after.palette, before.palette);
    }

    #[test]
    fn rotate_is_ignored_in_map_mode() {
        let mut surface = globe_surface();
        assert!(surface.on_projection_kind_change(ProjectionKind::Mercator, Rotation::default()));
        let revision = surface.geometry_revision();
        assert!(!surface.on_rotate(Rotation::new(30.0, 10.0)));
        assert_eq!(surface.geometry_revision(), revision);
        assert_eq!(surface.engine().rotation(), None);
    }

    #[test]
    fn kind_change_to_same_kind_is_noop() {
        let mut surface = globe_surface();
        let revision = surface.geometry_revision();
        let changed =
            surface.on_projection_kind_change(ProjectionKind::Orthographic, Rotation::default());
        assert!(!changed);
        assert_eq!(surface.geometry_revision(), revision);
    }

    #[test]
    fn filter_change_diffs_and_positions() {
        let mut surface = globe_surface();
        let few: Vec<Building> = sample_buildings().into_iter().take(3).collect();
        let diff = surface.on_filter_change(few);
        assert_eq!(diff.entered, Vec::<String>::new());
        assert_eq!(diff.updated.len(), 3);
        assert_eq!(diff.exited.len(), 22);

        let empty = surface.on_filter_change(Vec::new());
        assert_eq!(empty.exited.len(), 3);
        assert!(surface.markers().is_empty());

        let back = surface.on_filter_change(sample_buildings());
        assert_eq!(back.entered.len(), 25);
        // Entered markers are positioned right away.
        let burj = surface.markers().get("Burj Khalifa").expect("marker");
        assert!(burj.position.is_some());
    }

    #[test]
    fn hover_survives_rebuilds() {
        let mut surface = globe_surface();
        surface.set_hovered(Some("Taipei 101"));
        surface.on_geography_loaded(placeholder(), Rotation::default());
        assert!(surface.markers().get("Taipei 101").is_some_and(|m| m.hovered));
    }

    #[test]
    fn resize_recenters_the_globe() {
        let mut surface = globe_surface();
        surface.on_resize(Viewport::new(1000.0, 700.0), Rotation::default());
        assert_eq!(surface.engine().translate(), Vec2::new(500.0, 350.0));
        assert_eq!(surface.viewport(), Viewport::new(1000.0, 700.0));
    }
}
