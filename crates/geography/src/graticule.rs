//! Synthetic placeholder geography: the sphere plus a 10° graticule.

use foundation::math::GeoPoint;

use crate::feature::{GeoCollection, GeoFeature, GeoGeometry};

/// Spacing of graticule lines (degrees).
pub const GRATICULE_STEP_DEG: f64 = 10.0;
/// Sampling interval along each graticule line (degrees).
pub const GRATICULE_PRECISION_DEG: f64 = 2.5;
/// Minor meridians stop short of the poles; every 90° one runs pole to pole.
const MINOR_LAT_EXTENT: f64 = 80.0;
const MAJOR_MERIDIAN_STEP_DEG: f64 = 90.0;

/// Graticule lines as a multi-line geometry.
pub fn graticule() -> GeoGeometry {
    let mut lines = Vec::new();

    let meridians = (360.0 / GRATICULE_STEP_DEG) as i32;
    for i in 0..meridians {
        let lon = -180.0 + i as f64 * GRATICULE_STEP_DEG;
        let extent = if lon % MAJOR_MERIDIAN_STEP_DEG == 0.0 {
            90.0
        } else {
            MINOR_LAT_EXTENT
        };
        lines.push(sample(-extent, extent, |lat| GeoPoint::new(lon, lat)));
    }

    let parallels = (2.0 * MINOR_LAT_EXTENT / GRATICULE_STEP_DEG) as i32;
    for i in 0..=parallels {
        let lat = -MINOR_LAT_EXTENT + i as f64 * GRATICULE_STEP_DEG;
        lines.push(sample(-180.0, 180.0, |lon| GeoPoint::new(lon, lat)));
    }

    GeoGeometry::MultiLineString(lines)
}

fn sample(from: f64, to: f64, at: impl Fn(f64) -> GeoPoint) -> Vec<GeoPoint> {
    let steps = ((to - from) / GRATICULE_PRECISION_DEG).ceil() as usize;
    (0..=steps)
        .map(|i| at((from + i as f64 * GRATICULE_PRECISION_DEG).min(to)))
        .collect()
}

/// The last-resort geography: a sphere outline and a graticule.
pub fn placeholder_collection() -> GeoCollection {
    GeoCollection::new(vec![
        GeoFeature::new(GeoGeometry::Sphere),
        GeoFeature::new(graticule()),
    ])
}

#[cfg(test)]
mod tests {
    use super::{graticule, placeholder_collection};
    use crate::feature::GeoGeometry;

    #[test]
    fn graticule_has_meridians_and_parallels() {
        let GeoGeometry::MultiLineString(lines) = graticule() else {
            panic!("graticule must be a multi-line");
        };
        // 36 meridians + 17 parallels (-80..=80).
        assert_eq!(lines.len(), 36 + 17);

        let prime = lines
            .iter()
            .find(|l| l[0].lon_deg == 0.0)
            .expect("prime meridian");
        assert_eq!(prime.first().map(|p| p.lat_deg), Some(-90.0));
        assert_eq!(prime.last().map(|p| p.lat_deg), Some(90.0));

        let minor = lines
            .iter()
            .find(|l| l[0].lon_deg == 10.0)
            .expect("10E meridian");
        assert_eq!(minor.last().map(|p| p.lat_deg), Some(80.0));
    }

    #[test]
    fn placeholder_is_sphere_plus_graticule() {
        let c = placeholder_collection();
        assert_eq!(c.len(), 2);
        assert_eq!(c.features[0].geometry, GeoGeometry::Sphere);
        assert!(c.features[0].geometry.is_areal());
        assert!(!c.features[1].geometry.is_areal());
    }
}
