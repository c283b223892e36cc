//! Display strings for the tooltip card and the sidebar range labels.

use crate::building::Building;
use crate::filter::FilterRanges;

/// `$1.5B`-style cost, one decimal, in billions.
pub fn format_cost_billions(cost: f64) -> String {
    format!("${:.1}B", cost / 1_000_000_000.0)
}

fn format_number(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

/// Text lines of a building's tooltip card, top to bottom.
pub fn tooltip_lines(b: &Building) -> Vec<String> {
    vec![
        b.name.clone(),
        format!("{}, {}", b.city, b.country),
        format!("Height: {}m", format_number(b.height)),
        format!("Floors: {}", b.floors),
        format!("Year: {}", b.year),
        format!("Cost: {}", format_cost_billions(b.cost)),
    ]
}

/// Sidebar labels for the three sliders.
pub fn range_labels(ranges: &FilterRanges) -> [String; 3] {
    [
        format!("Year Built: {} - {}", ranges.year.min, ranges.year.max),
        format!("Floors: {} - {}", ranges.floors.min, ranges.floors.max),
        format!(
            "Cost: {} - {}",
            format_cost_billions(ranges.cost.min),
            format_cost_billions(ranges.cost.max)
        ),
    ]
}
