use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(0xff, 0xff, 0xff);
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LayerStyle {
    pub visible: bool,
    pub fill: Option<Rgb>,
    pub stroke: Option<Rgb>,
    pub stroke_width: f32,
}

impl LayerStyle {
    pub const fn new(fill: Option<Rgb>, stroke: Option<Rgb>, stroke_width: f32) -> Self {
        Self {
            visible: true,
            fill,
            stroke,
            stroke_width,
        }
    }
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self::new(Some(Rgb::WHITE), None, 0.0)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn from_dark_flag(dark: bool) -> Self {
        if dark { Theme::Dark } else { Theme::Light }
    }

    pub fn is_dark(self) -> bool {
        matches!(self, Theme::Dark)
    }

    pub fn palette(self) -> Palette {
        Palette::for_theme(self)
    }
}

pub const LAND_STROKE_WIDTH: f32 = 0.5;
pub const MARKER_STROKE_WIDTH: f32 = 1.0;
pub const MARKER_FILL: Rgb = Rgb(0xef, 0x44, 0x44);

/// Colors for every drawn layer under one theme.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Palette {
    pub ocean: LayerStyle,
    pub land: LayerStyle,
    /// Open line work (graticule, borders given as lines).
    pub lines: LayerStyle,
    pub markers: LayerStyle,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        let (ocean, land, stroke) = match theme {
            Theme::Light => (Rgb(0xff, 0xff, 0xff), Rgb(0xe0, 0xe0, 0xe0), Rgb(0x99, 0x99, 0x99)),
            Theme::Dark => (Rgb(0x2a, 0x2a, 0x2a), Rgb(0x40, 0x40, 0x40), Rgb(0x66, 0x66, 0x66)),
        };
        Self {
            ocean: LayerStyle::new(Some(ocean), None, 0.0),
            land: LayerStyle::new(Some(land), Some(stroke), LAND_STROKE_WIDTH),
            lines: LayerStyle::new(None, Some(stroke), LAND_STROKE_WIDTH),
            markers: LayerStyle::new(Some(MARKER_FILL), Some(Rgb::WHITE), MARKER_STROKE_WIDTH),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_formatting() {
        assert_eq!(MARKER_FILL.to_string(), "#ef4444");
        assert_eq!(Rgb(0x2a, 0x2a, 0x2a).to_string(), "#2a2a2a");
    }

    #[test]
    fn theme_palettes() {
        let light = Theme::Light.palette();
        assert_eq!(light.ocean.fill, Some(Rgb::WHITE));
        assert_eq!(light.land.fill.map(|c| c.to_string()).as_deref(), Some("#e0e0e0"));
        assert_eq!(light.land.stroke.map(|c| c.to_string()).as_deref(), Some("#999999"));

        let dark = Theme::from_dark_flag(true).palette();
        assert_eq!(dark.ocean.fill.map(|c| c.to_string()).as_deref(), Some("#2a2a2a"));
        assert_eq!(dark.land.fill.map(|c| c.to_string()).as_deref(), Some("#404040"));
        assert_eq!(dark.lines.stroke.map(|c| c.to_string()).as_deref(), Some("#666666"));

        // Markers look the same in both themes.
        assert_eq!(light.markers, dark.markers);
        assert_eq!(dark.markers.stroke, Some(Rgb::WHITE));
    }
}
