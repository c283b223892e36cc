use foundation::math::Vec2;

use crate::markers::{Marker, MarkerLayer};

/// Deterministic screen-space marker picking.
///
/// Only interactive markers take part, and a marker is hit when the pointer
/// lies within its current radius.
///
/// Ordering contract:
/// - The nearest marker center wins.
/// - At equal distance the later-drawn marker (higher layer index) wins, since
///   it is painted on top.
pub fn pick_marker(layer: &MarkerLayer, pointer: Vec2) -> Option<&Marker> {
    if !pointer.is_finite() {
        return None;
    }

    let mut best: Option<(f64, usize)> = None;
    for (i, marker) in layer.iter().enumerate() {
        if !marker.interactive() {
            continue;
        }
        let Some(at) = marker.position else {
            continue;
        };
        let d = at.distance(pointer);
        if d > marker.radius() {
            continue;
        }

        best = match best {
            None => Some((d, i)),
            Some((bd, bi)) => {
                let ord = d.total_cmp(&bd).then_with(|| bi.cmp(&i));
                if ord.is_lt() { Some((d, i)) } else { Some((bd, bi)) }
            }
        };
    }

    let (_, i) = best?;
    layer.as_slice().get(i)
}
