use std::sync::Arc;

use catalog::{Building, FilterRanges, range_labels, tooltip_lines};
use foundation::math::Vec2;
use geography::LoadedGeography;
use layers::Theme;
use runtime::{DispatchRecord, EventBus, NamedEvent};
use scene::{HoverChange, ProjectionKind, Rotation, Viewport};
use tracing::debug;

use crate::interaction::InteractionController;
use crate::surface::{RenderSurface, SceneSnapshot, ViewMode};

/// Discrete inputs to the viewer, processed strictly in arrival order.
#[derive(Debug, Clone)]
pub enum ViewEvent {
    GeographyLoaded(Arc<LoadedGeography>),
    /// One drag tick: pixels moved since the previous tick.
    Drag { dx: f64, dy: f64 },
    PointerDown(Vec2),
    PointerMove(Vec2),
    PointerUp,
    PointerEnter(String),
    PointerLeave,
    /// Sidebar selection, by building name.
    Select(String),
    FilterChanged(FilterRanges),
    ProjectionKindChanged(ProjectionKind),
    Resized(Viewport),
    ThemeChanged(Theme),
}

impl NamedEvent for ViewEvent {
    fn name(&self) -> &'static str {
        match self {
            ViewEvent::GeographyLoaded(_) => "geography_loaded",
            ViewEvent::Drag { .. } => "drag",
            ViewEvent::PointerDown(_) => "pointer_down",
            ViewEvent::PointerMove(_) => "pointer_move",
            ViewEvent::PointerUp => "pointer_up",
            ViewEvent::PointerEnter(_) => "pointer_enter",
            ViewEvent::PointerLeave => "pointer_leave",
            ViewEvent::Select(_) => "select",
            ViewEvent::FilterChanged(_) => "filter_changed",
            ViewEvent::ProjectionKindChanged(_) => "projection_kind_changed",
            ViewEvent::Resized(_) => "resized",
            ViewEvent::ThemeChanged(_) => "theme_changed",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct ViewerOptions {
    pub kind: ProjectionKind,
    pub viewport: Viewport,
    pub rotation: Rotation,
    pub theme: Theme,
}

/// Tooltip card contents at its screen anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipView {
    pub anchor: Vec2,
    pub lines: Vec<String>,
}

/// The page shell: dataset, filter, surface and interaction wired to one event
/// queue.
pub struct Viewer {
    dataset: Vec<Building>,
    ranges: Option<FilterRanges>,
    surface: RenderSurface,
    interaction: InteractionController,
    bus: EventBus<ViewEvent>,
}

impl Viewer {
    /// Starts with the filter spanning the whole dataset.
    pub fn new(dataset: Vec<Building>, options: ViewerOptions) -> Self {
        let ranges = FilterRanges::full_extent(&dataset);
        let filtered = filter(&dataset, ranges.as_ref());
        Self {
            surface: RenderSurface::new(
                options.kind,
                options.viewport,
                options.rotation,
                options.theme,
                filtered,
            ),
            interaction: InteractionController::new(options.rotation),
            dataset,
            ranges,
            bus: EventBus::new(),
        }
    }

    pub fn dataset(&self) -> &[Building] {
        &self.dataset
    }

    pub fn ranges(&self) -> Option<&FilterRanges> {
        self.ranges.as_ref()
    }

    /// Sidebar labels for the current filter; `None` for an empty dataset.
    pub fn range_labels(&self) -> Option<[String; 3]> {
        self.ranges.as_ref().map(range_labels)
    }

    pub fn filtered(&self) -> &[Building] {
        self.surface.buildings()
    }

    pub fn surface(&self) -> &RenderSurface {
        &self.surface
    }

    pub fn interaction(&self) -> &InteractionController {
        &self.interaction
    }

    pub fn rotation(&self) -> Rotation {
        self.interaction.rotation()
    }

    pub fn mode(&self) -> ViewMode {
        self.surface.mode()
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        self.surface.snapshot()
    }

    pub fn history(&self) -> &[DispatchRecord] {
        self.bus.history()
    }

    pub fn tooltip(&self) -> Option<TooltipView> {
        let tooltip = self.interaction.tooltip()?;
        let building = self.surface.building(&tooltip.key)?;
        Some(TooltipView {
            anchor: tooltip.anchor,
            lines: tooltip_lines(building),
        })
    }

    /// Queues an event without processing it.
    pub fn emit(&mut self, event: ViewEvent) -> u64 {
        self.bus.emit(event)
    }

    /// Processes every queued event in order; returns how many ran.
    pub fn run_pending(&mut self) -> usize {
        let mut n = 0;
        while let Some(event) = self.bus.next_event() {
            self.handle(event);
            n += 1;
        }
        n
    }

    /// Queues `event` and drains the queue.
    pub fn dispatch(&mut self, event: ViewEvent) -> usize {
        self.emit(event);
        self.run_pending()
    }

    fn handle(&mut self, event: ViewEvent) {
        debug!(event = event.name(), "dispatch");
        let surface = &mut self.surface;
        let interaction = &mut self.interaction;
        match event {
            ViewEvent::GeographyLoaded(geography) => {
                surface.on_geography_loaded(geography, interaction.rotation());
                interaction.refresh_hover(surface);
            }
            ViewEvent::Drag { dx, dy } => {
                interaction.drag(surface, dx, dy);
            }
            ViewEvent::PointerDown(pos) => interaction.pointer_down(surface, pos),
            ViewEvent::PointerMove(pos) => {
                interaction.pointer_move(surface, pos);
            }
            ViewEvent::PointerUp => interaction.pointer_up(),
            ViewEvent::PointerEnter(key) => {
                interaction.pointer_enter(surface, &key);
            }
            ViewEvent::PointerLeave => {
                interaction.pointer_leave(surface);
            }
            ViewEvent::Select(name) => {
                let Some(building) = surface.building(&name).cloned() else {
                    debug!(%name, "select: not in the filtered list");
                    return;
                };
                interaction.select(surface, &building);
            }
            ViewEvent::FilterChanged(ranges) => {
                let filtered = filter(&self.dataset, Some(&ranges));
                self.ranges = Some(ranges);
                surface.on_filter_change(filtered);
                if interaction.refresh_hover(surface) == HoverChange::Cleared {
                    debug!("hovered building filtered out");
                }
            }
            ViewEvent::ProjectionKindChanged(kind) => {
                interaction.cancel_drag();
                if surface.on_projection_kind_change(kind, interaction.rotation()) {
                    interaction.refresh_hover(surface);
                }
            }
            ViewEvent::Resized(viewport) => {
                surface.on_resize(viewport, interaction.rotation());
                interaction.refresh_hover(surface);
            }
            ViewEvent::ThemeChanged(theme) => surface.on_theme_change(theme),
        }
    }
}

fn filter(dataset: &[Building], ranges: Option<&FilterRanges>) -> Vec<Building> {
    match ranges {
        Some(r) => r.apply(dataset),
        None => dataset.to_vec(),
    }
}
