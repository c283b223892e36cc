//! SVG export of a scene snapshot.

use std::fmt::Write as _;

use layers::{LayerStyle, svg_path_data};

use crate::surface::SceneSnapshot;
use crate::viewer::TooltipView;

const TEXT_LINE_HEIGHT_PX: f64 = 16.0;
const LEGEND_ORIGIN_PX: (f64, f64) = (10.0, 20.0);

/// Renders one frame. `legend` lines (the filter range labels) are stacked in
/// the top-left corner.
pub fn render_svg(
    snapshot: &SceneSnapshot,
    tooltip: Option<&TooltipView>,
    legend: &[String],
) -> String {
    let vp = snapshot.viewport;
    let palette = &snapshot.palette;
    let mut out = String::new();

    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" data-projection="{kind}">"#,
        w = vp.width,
        h = vp.height,
        kind = snapshot.kind,
    );

    if !snapshot.background.is_degenerate() {
        let _ = writeln!(
            out,
            r#"  <path class="ocean" d="{}"{}/>"#,
            svg_path_data(std::slice::from_ref(&snapshot.background)),
            style_attrs(&palette.ocean),
        );
    }

    out.push_str("  <g class=\"boundaries\">\n");
    for shape in &snapshot.boundaries {
        let style = if shape.areal {
            &palette.land
        } else {
            &palette.lines
        };
        let _ = writeln!(
            out,
            r#"    <path d="{}"{}/>"#,
            svg_path_data(&shape.paths),
            style_attrs(style),
        );
    }
    out.push_str("  </g>\n");

    out.push_str("  <g class=\"markers\">\n");
    for marker in &snapshot.markers {
        let Some(at) = marker.position else {
            continue;
        };
        let _ = writeln!(
            out,
            r#"    <circle class="building" data-name="{}" cx="{:.2}" cy="{:.2}" r="{}" opacity="{}"{}{}/>"#,
            escape(&marker.key),
            at.x,
            at.y,
            marker.radius,
            marker.opacity,
            if marker.interactive { "" } else { r#" pointer-events="none""# },
            style_attrs(&palette.markers),
        );
    }
    out.push_str("  </g>\n");

    if !legend.is_empty() {
        let _ = writeln!(
            out,
            r#"  <g class="legend" transform="translate({},{})">"#,
            LEGEND_ORIGIN_PX.0, LEGEND_ORIGIN_PX.1
        );
        write_lines(&mut out, legend);
        out.push_str("  </g>\n");
    }

    if let Some(tooltip) = tooltip {
        let _ = writeln!(
            out,
            r#"  <g class="tooltip" transform="translate({:.2},{:.2})">"#,
            tooltip.anchor.x, tooltip.anchor.y
        );
        write_lines(&mut out, &tooltip.lines);
        out.push_str("  </g>\n");
    }

    out.push_str("</svg>\n");
    out
}

fn write_lines(out: &mut String, lines: &[String]) {
    out.push_str("    <text>\n");
    for (i, line) in lines.iter().enumerate() {
        let dy = if i == 0 { 0.0 } else { TEXT_LINE_HEIGHT_PX };
        let _ = writeln!(
            out,
            r#"      <tspan x="0" dy="{dy}">{}</tspan>"#,
            escape(line)
        );
    }
    out.push_str("    </text>\n");
}

fn style_attrs(style: &LayerStyle) -> String {
    if !style.visible {
        return r#" visibility="hidden""#.to_string();
    }
    let mut s = String::new();
    match style.fill {
        Some(c) => {
            let _ = write!(s, r#" fill="{c}""#);
        }
        None => s.push_str(r#" fill="none""#),
    }
    if let Some(c) = style.stroke {
        let _ = write!(s, r#" stroke="{c}" stroke-width="{}""#, style.stroke_width);
    }
    s
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}
