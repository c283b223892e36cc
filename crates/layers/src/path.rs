//! Geographic geometry to screen-space sub-paths.
//!
//! On the globe, lines and rings are clipped at the horizon (depth `x = 0` of
//! the rotated unit vector); rings that cross it are closed along the rim.
//! Flat projections cut segments that jump across the antimeridian.

use std::f64::consts::TAU;
use std::fmt::Write as _;

use foundation::math::{GeoPoint, Vec2, Vec3, wrap_pi};
use geography::GeoGeometry;
use scene::{ProjectionEngine, ProjectionKind};

/// Angular step (degrees) used to sample outlines and rim arcs.
const ARC_STEP_DEG: f64 = 2.5;

/// A polyline in screen pixels; `closed` rings end with a close-path.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubPath {
    pub points: Vec<Vec2>,
    pub closed: bool,
}

impl SubPath {
    pub fn open(points: Vec<Vec2>) -> Self {
        Self {
            points,
            closed: false,
        }
    }

    pub fn closed(points: Vec<Vec2>) -> Self {
        Self {
            points,
            closed: true,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.points.len() < if self.closed { 3 } else { 2 }
    }
}

/// SVG path data (`d` attribute) for a set of sub-paths.
pub fn svg_path_data(paths: &[SubPath]) -> String {
    let mut d = String::new();
    for path in paths {
        for (i, p) in path.points.iter().enumerate() {
            let cmd = if i == 0 { 'M' } else { 'L' };
            let _ = write!(d, "{cmd}{:.2},{:.2}", p.x, p.y);
        }
        if path.closed && !path.points.is_empty() {
            d.push('Z');
        }
    }
    d
}

/// Projects one geometry. Points have no outline and yield nothing.
pub fn project_geometry(engine: &ProjectionEngine, geometry: &GeoGeometry) -> Vec<SubPath> {
    let paths = match geometry {
        GeoGeometry::Sphere => vec![sphere_outline(engine)],
        GeoGeometry::Point(_) | GeoGeometry::MultiPoint(_) => Vec::new(),
        GeoGeometry::LineString(line) => project_line(engine, line),
        GeoGeometry::MultiLineString(lines) => lines
            .iter()
            .flat_map(|line| project_line(engine, line))
            .collect(),
        GeoGeometry::Polygon(rings) => rings
            .iter()
            .flat_map(|ring| project_ring(engine, ring))
            .collect(),
        GeoGeometry::MultiPolygon(polygons) => polygons
            .iter()
            .flatten()
            .flat_map(|ring| project_ring(engine, ring))
            .collect(),
    };
    paths.into_iter().filter(|p| !p.is_degenerate()).collect()
}

pub fn project_line(engine: &ProjectionEngine, line: &[GeoPoint]) -> Vec<SubPath> {
    if engine.kind().is_globe() {
        globe_line(engine, line)
    } else {
        flat_pieces(engine, line, false)
    }
}

pub fn project_ring(engine: &ProjectionEngine, ring: &[GeoPoint]) -> Vec<SubPath> {
    if engine.kind().is_globe() {
        globe_ring(engine, ring)
    } else {
        flat_pieces(engine, ring, true)
    }
}

/// The sphere's silhouette: a disc for the azimuthal kinds, the traced world
/// rectangle otherwise.
pub fn sphere_outline(engine: &ProjectionEngine) -> SubPath {
    match engine.kind() {
        ProjectionKind::Orthographic => circle(engine, 1.0),
        ProjectionKind::AzimuthalEqualArea => circle(engine, 2.0),
        kind => {
            let m = kind.max_drawn_latitude();
            let edge = sample(-180.0, 180.0)
                .map(|lon| GeoPoint::new(lon, m))
                .chain(sample(m, -m).map(|lat| GeoPoint::new(180.0, lat)))
                .chain(sample(180.0, -180.0).map(|lon| GeoPoint::new(lon, -m)))
                .chain(sample(-m, m).map(|lat| GeoPoint::new(-180.0, lat)));
            SubPath::closed(edge.filter_map(|p| engine.project(p)).collect())
        }
    }
}

fn circle(engine: &ProjectionEngine, raw_radius: f64) -> SubPath {
    let n = (360.0 / ARC_STEP_DEG) as usize;
    SubPath::closed(
        (0..n)
            .map(|i| {
                let theta = TAU * i as f64 / n as f64;
                engine.raw_to_screen(raw_radius * theta.cos(), raw_radius * theta.sin())
            })
            .collect(),
    )
}

/// Evenly spaced values from `from` to `to` inclusive, about `ARC_STEP_DEG`
/// apart.
fn sample(from: f64, to: f64) -> impl Iterator<Item = f64> {
    let steps = ((to - from).abs() / ARC_STEP_DEG).ceil().max(1.0) as usize;
    (0..=steps).map(move |i| from + (to - from) * i as f64 / steps as f64)
}

fn is_front(v: Vec3) -> bool {
    v.x >= 0.0
}

fn globe_screen(engine: &ProjectionEngine, v: Vec3) -> Vec2 {
    engine.raw_to_screen(v.y, v.z)
}

/// Point where the chord from `front` to `back` meets the horizon plane.
fn horizon_crossing(front: Vec3, back: Vec3) -> Vec3 {
    let t = front.x / (front.x - back.x);
    front.lerp(back, t)
}

fn rim_angle(v: Vec3) -> f64 {
    v.z.atan2(v.y)
}

fn rim_screen(engine: &ProjectionEngine, angle: f64) -> Vec2 {
    engine.raw_to_screen(angle.cos(), angle.sin())
}

/// Rim points strictly between `from` and `to`, the short way round.
fn push_rim_arc(engine: &ProjectionEngine, out: &mut Vec<Vec2>, from: f64, to: f64) {
    let delta = wrap_pi(to - from);
    let steps = (delta.abs().to_degrees() / ARC_STEP_DEG).ceil() as usize;
    for i in 1..steps {
        out.push(rim_screen(engine, from + delta * i as f64 / steps as f64));
    }
}

fn globe_line(engine: &ProjectionEngine, line: &[GeoPoint]) -> Vec<SubPath> {
    let mut out = Vec::new();
    let mut current: Vec<Vec2> = Vec::new();
    let mut prev: Option<Vec3> = None;
    for p in line.iter().filter(|p| p.is_finite()) {
        let v = engine.view_vector(*p);
        if let Some(u) = prev {
            match (is_front(u), is_front(v)) {
                (true, false) => {
                    current.push(rim_screen(engine, rim_angle(horizon_crossing(u, v))));
                    out.push(SubPath::open(std::mem::take(&mut current)));
                }
                (false, true) => {
                    current.push(rim_screen(engine, rim_angle(horizon_crossing(v, u))));
                }
                _ => {}
            }
        }
        if is_front(v) {
            current.push(globe_screen(engine, v));
        }
        prev = Some(v);
    }
    if !current.is_empty() {
        out.push(SubPath::open(current));
    }
    out
}

struct FrontRun {
    entry: f64,
    points: Vec<Vec2>,
    exit: f64,
}

fn globe_ring(engine: &ProjectionEngine, ring: &[GeoPoint]) -> Vec<SubPath> {
    let views: Vec<Vec3> = ring
        .iter()
        .filter(|p| p.is_finite())
        .map(|p| engine.view_vector(*p))
        .collect();
    let n = views.len();
    if n < 3 {
        return Vec::new();
    }
    let at = |i: usize| views[i % n];

    let Some(start) = (0..n).find(|&i| is_front(at(i)) && !is_front(at(i + n - 1))) else {
        // No horizon crossing: wholly in front or wholly behind.
        if is_front(views[0]) {
            return vec![SubPath::closed(
                views.iter().map(|v| globe_screen(engine, *v)).collect(),
            )];
        }
        return Vec::new();
    };

    let mut runs: Vec<FrontRun> = Vec::new();
    let mut i = start;
    let mut visited = 0;
    while visited < n {
        let entry = rim_angle(horizon_crossing(at(i), at(i + n - 1)));
        let mut points = Vec::new();
        while visited < n && is_front(at(i)) {
            points.push(globe_screen(engine, at(i)));
            i += 1;
            visited += 1;
        }
        let exit = rim_angle(horizon_crossing(at(i + n - 1), at(i)));
        runs.push(FrontRun {
            entry,
            points,
            exit,
        });
        while visited < n && !is_front(at(i)) {
            i += 1;
            visited += 1;
        }
    }

    let mut points = Vec::new();
    for (k, run) in runs.iter().enumerate() {
        points.push(rim_screen(engine, run.entry));
        points.extend_from_slice(&run.points);
        points.push(rim_screen(engine, run.exit));
        let next = &runs[(k + 1) % runs.len()];
        push_rim_arc(engine, &mut points, run.exit, next.entry);
    }
    vec![SubPath::closed(points)]
}

/// Flat projection of a line or ring, cut where consecutive vertices are more
/// than 180° of longitude apart. A cut ring's first and last pieces are the
/// same piece and get joined.
fn flat_pieces(engine: &ProjectionEngine, points: &[GeoPoint], closed: bool) -> Vec<SubPath> {
    let max_lat = engine.kind().max_drawn_latitude();
    let mut pieces: Vec<Vec<Vec2>> = vec![Vec::new()];
    let mut prev: Option<GeoPoint> = None;
    let mut cut = false;

    let closing = match (points.first(), points.last()) {
        (Some(first), Some(last)) if closed && first != last => Some(*first),
        _ => None,
    };

    for raw in points.iter().copied().chain(closing) {
        if !raw.is_finite() {
            continue;
        }
        let p = GeoPoint::new(normalize_lon(raw.lon_deg), raw.lat_deg.clamp(-max_lat, max_lat));
        if let Some(q) = prev {
            if (p.lon_deg - q.lon_deg).abs() > 180.0 {
                let edge = if q.lon_deg >= 0.0 { 180.0 } else { -180.0 };
                let lat = crossing_latitude(q, p, edge);
                push_flat(engine, &mut pieces, GeoPoint::new(edge, lat), closed);
                pieces.push(Vec::new());
                cut = true;
                push_flat(engine, &mut pieces, GeoPoint::new(-edge, lat), closed);
            }
        }
        push_flat(engine, &mut pieces, p, closed);
        prev = Some(p);
    }

    if closed && cut && pieces.len() > 1 {
        let head = pieces.remove(0);
        if let Some(tail) = pieces.last_mut() {
            tail.extend(head);
        }
    }

    pieces
        .into_iter()
        .filter(|points| !points.is_empty())
        .map(|points| SubPath { points, closed })
        .collect()
}

/// Unprojectable vertices are dropped from rings and break lines.
fn push_flat(engine: &ProjectionEngine, pieces: &mut Vec<Vec<Vec2>>, p: GeoPoint, closed: bool) {
    match engine.project(p) {
        Some(s) => {
            if let Some(piece) = pieces.last_mut() {
                piece.push(s);
            }
        }
        None if !closed && pieces.last().is_some_and(|piece| !piece.is_empty()) => {
            pieces.push(Vec::new());
        }
        None => {}
    }
}

fn crossing_latitude(a: GeoPoint, b: GeoPoint, edge: f64) -> f64 {
    let da = (edge - a.lon_deg).abs();
    let db = (-edge - b.lon_deg).abs();
    let total = da + db;
    if total <= 0.0 {
        a.lat_deg
    } else {
        a.lat_deg + (b.lat_deg - a.lat_deg) * da / total
    }
}

/// Brings longitudes outside `[-180, 180]` back into range; the edges stay put.
fn normalize_lon(lon: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon) {
        lon
    } else {
        (lon + 180.0).rem_euclid(360.0) - 180.0
    }
}
