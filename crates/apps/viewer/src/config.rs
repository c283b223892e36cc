use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use catalog::{FilterRanges, NumericRange};
use clap::Parser;
use foundation::math::Vec2;
use geography::{FileSource, GeographySource, HttpSource, PRIMARY_WORLD_URL, SECONDARY_WORLD_URL};
use layers::Theme;
use scene::{ProjectionKind, Viewport};

use crate::viewer::{ViewEvent, ViewerOptions};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Render the tallest-buildings globe or map to SVG")]
pub struct Args {
    /// Primary world-boundary GeoJSON URL
    #[arg(long, env = "SKYLINE_GEO_PRIMARY", default_value = PRIMARY_WORLD_URL)]
    pub primary_url: String,

    /// Fallback world-boundary GeoJSON URL
    #[arg(long, env = "SKYLINE_GEO_SECONDARY", default_value = SECONDARY_WORLD_URL)]
    pub secondary_url: String,

    /// Local GeoJSON file tried before the remote sources
    #[arg(long)]
    pub geojson: Option<PathBuf>,

    /// Skip the remote sources
    #[arg(long)]
    pub offline: bool,

    /// Building dataset (JSON array); defaults to the bundled sample
    #[arg(long)]
    pub buildings: Option<PathBuf>,

    /// orthographic | mercator | natural-earth | equal-earth | azimuthal-equal-area | conic-equal-area
    #[arg(long, default_value = "orthographic")]
    pub projection: ProjectionKind,

    #[arg(long, default_value_t = 800.0)]
    pub width: f64,

    #[arg(long, default_value_t = 600.0)]
    pub height: f64,

    /// Dark theme
    #[arg(long)]
    pub dark: bool,

    /// Year range, MIN..MAX
    #[arg(long)]
    pub year: Option<NumericRange<i32>>,

    /// Floor-count range, MIN..MAX
    #[arg(long)]
    pub floors: Option<NumericRange<u32>>,

    /// Cost range in currency units, MIN..MAX
    #[arg(long)]
    pub cost: Option<NumericRange<f64>>,

    /// Select a building by name (centers the globe on it)
    #[arg(long)]
    pub select: Option<String>,

    /// Drag tick "DX,DY" in pixels; repeatable, applied in order
    #[arg(long = "drag", value_parser = parse_pair, allow_hyphen_values = true)]
    pub drags: Vec<(f64, f64)>,

    /// Final pointer position "X,Y" for hover hit-testing
    #[arg(long, value_parser = parse_pair)]
    pub pointer: Option<(f64, f64)>,

    /// SVG output path; stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl Args {
    pub fn viewer_options(&self) -> ViewerOptions {
        ViewerOptions {
            kind: self.projection,
            viewport: Viewport::new(self.width, self.height),
            theme: Theme::from_dark_flag(self.dark),
            ..ViewerOptions::default()
        }
    }

    /// Geography sources in the order they are tried.
    pub fn sources(&self) -> Vec<Arc<dyn GeographySource>> {
        let mut sources: Vec<Arc<dyn GeographySource>> = Vec::new();
        if let Some(path) = &self.geojson {
            sources.push(Arc::new(FileSource::new(path)));
        }
        if !self.offline {
            sources.push(Arc::new(HttpSource::new(self.primary_url.clone())));
            sources.push(Arc::new(HttpSource::new(self.secondary_url.clone())));
        }
        sources
    }

    /// Ranges from the flags, with unset ones kept at `base`. `None` when no
    /// range flag was given.
    pub fn filter_ranges(&self, base: &FilterRanges) -> Option<FilterRanges> {
        if self.year.is_none() && self.floors.is_none() && self.cost.is_none() {
            return None;
        }
        Some(FilterRanges {
            year: self.year.unwrap_or(base.year),
            floors: self.floors.unwrap_or(base.floors),
            cost: self.cost.unwrap_or(base.cost),
        })
    }

    /// The scripted interaction: drags in order, then the selection, then the
    /// pointer position.
    pub fn script(&self) -> Vec<ViewEvent> {
        let mut events: Vec<ViewEvent> = self
            .drags
            .iter()
            .map(|&(dx, dy)| ViewEvent::Drag { dx, dy })
            .collect();
        if let Some(name) = &self.select {
            events.push(ViewEvent::Select(name.clone()));
        }
        if let Some((x, y)) = self.pointer {
            events.push(ViewEvent::PointerMove(Vec2::new(x, y)));
        }
        events
    }
}

fn parse_pair(s: &str) -> Result<(f64, f64), String> {
    let (a, b) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `A,B`, got `{s}`"))?;
    let a = f64::from_str(a.trim()).map_err(|e| format!("`{a}`: {e}"))?;
    let b = f64::from_str(b.trim()).map_err(|e| format!("`{b}`: {e}"))?;
    Ok((a, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::sample_buildings;

    fn parse(args: &[&str]) -> Args {
        let mut argv = vec!["skyline"];
        argv.extend_from_slice(args);
        Args::try_parse_from(argv).expect("valid args")
    }

    #[test]
    fn defaults() {
        let args = parse(&[]);
        assert_eq!(args.projection, ProjectionKind::Orthographic);
        assert_eq!(args.viewer_options().viewport, Viewport::new(800.0, 600.0));
        let names: Vec<String> = args.sources().iter().map(|s| s.name().to_string()).collect();
        assert_eq!(names, vec![PRIMARY_WORLD_URL, SECONDARY_WORLD_URL]);
        assert!(args.script().is_empty());
    }

    #[test]
    fn offline_with_file_uses_only_the_file() {
        let args = parse(&["--offline", "--geojson", "world.geojson"]);
        let sources = args.sources();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].name(), "world.geojson");
    }

    #[test]
    fn scripted_events_keep_drag_order() {
        let args = parse(&[
            "--drag", "100,0", "--drag", "-100,0", "--select", "Taipei 101", "--pointer", "400,300",
        ]);
        let names: Vec<&str> = args.script().iter().map(runtime::NamedEvent::name).collect();
        assert_eq!(names, vec!["drag", "drag", "select", "pointer_move"]);
        assert_eq!(args.drags, vec![(100.0, 0.0), (-100.0, 0.0)]);
    }

    #[test]
    fn range_flags_override_the_extent() {
        let base = FilterRanges::full_extent(&sample_buildings()).expect("extent");
        let args = parse(&["--year", "2015..2020", "--projection", "equal-earth"]);
        let ranges = args.filter_ranges(&base).expect("ranges");
        assert_eq!(ranges.year, NumericRange::new(2015, 2020));
        assert_eq!(ranges.floors, base.floors);
        assert_eq!(args.projection, ProjectionKind::EqualEarth);
        assert!(parse(&[]).filter_ranges(&base).is_none());
    }

    #[test]
    fn bad_pairs_are_rejected() {
        assert!(parse_pair("1;2").is_err());
        assert!(parse_pair("x,2").is_err());
        assert_eq!(parse_pair(" 3.5 , -2 "), Ok((3.5, -2.0)));
    }
}
