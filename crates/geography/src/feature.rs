use foundation::math::GeoPoint;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::GeographyError;

#[derive(Debug, Clone, PartialEq)]
pub enum GeoGeometry {
    /// The whole sphere; its outline is the projection's silhouette.
    Sphere,
    Point(GeoPoint),
    MultiPoint(Vec<GeoPoint>),
    LineString(Vec<GeoPoint>),
    MultiLineString(Vec<Vec<GeoPoint>>),
    Polygon(Vec<Vec<GeoPoint>>),
    MultiPolygon(Vec<Vec<Vec<GeoPoint>>>),
}

impl GeoGeometry {
    /// Whether the geometry encloses area (and should be filled).
    pub fn is_areal(&self) -> bool {
        matches!(
            self,
            GeoGeometry::Sphere | GeoGeometry::Polygon(_) | GeoGeometry::MultiPolygon(_)
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeoFeature {
    pub id: Option<String>,
    pub properties: Map<String, Value>,
    pub geometry: GeoGeometry,
}

impl GeoFeature {
    pub fn new(geometry: GeoGeometry) -> Self {
        Self {
            id: None,
            properties: Map::new(),
            geometry,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.properties.get("name").and_then(|v| v.as_str())
    }
}

/// Landmass / boundary features, loaded once and never mutated.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeoCollection {
    pub features: Vec<GeoFeature>,
}

impl GeoCollection {
    pub fn new(features: Vec<GeoFeature>) -> Self {
        Self { features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn from_geojson_str(payload: &str) -> Result<Self, GeographyError> {
        let value: Value = serde_json::from_str(payload)
            .map_err(|e| GeographyError::Parse(format!("JSON parse error: {e}")))?;
        Self::from_geojson_value(&value)
    }

    /// Accepts any object with a non-empty `features` array.
    ///
    /// Individual features that cannot be read (missing or unsupported
    /// geometry) are skipped; the payload is rejected only when nothing usable
    /// remains.
    pub fn from_geojson_value(value: &Value) -> Result<Self, GeographyError> {
        let features_val = value
            .as_object()
            .and_then(|obj| obj.get("features"))
            .and_then(|v| v.as_array())
            .ok_or_else(|| {
                GeographyError::Parse("expected an object with a features array".into())
            })?;

        let mut features = Vec::with_capacity(features_val.len());
        let mut skipped = 0usize;
        for (index, feat_val) in features_val.iter().enumerate() {
            match parse_feature(feat_val) {
                Ok(feature) => features.push(feature),
                Err(reason) => {
                    skipped += 1;
                    debug!(index, %reason, "skipping unreadable feature");
                }
            }
        }

        if features.is_empty() {
            return Err(GeographyError::NoUsableFeatures);
        }
        if skipped > 0 {
            debug!(skipped, kept = features.len(), "geography payload partially usable");
        }
        Ok(Self { features })
    }
}

fn parse_feature(value: &Value) -> Result<GeoFeature, String> {
    let obj = value
        .as_object()
        .ok_or("feature must be an object".to_string())?;

    let id = match obj.get("id") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };

    let properties = obj
        .get("properties")
        .and_then(|v| v.as_object())
        .cloned()
        .unwrap_or_default();

    let geometry_val = match obj.get("geometry") {
        Some(Value::Null) | None => return Err("feature missing geometry".to_string()),
        Some(v) => v,
    };

    Ok(GeoFeature {
        id,
        properties,
        geometry: parse_geometry(geometry_val)?,
    })
}

fn parse_geometry(value: &Value) -> Result<GeoGeometry, String> {
    let obj = value
        .as_object()
        .ok_or("geometry must be an object".to_string())?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("geometry missing type".to_string())?;

    if ty == "Sphere" {
        return Ok(GeoGeometry::Sphere);
    }

    let coords = obj
        .get("coordinates")
        .ok_or("geometry missing coordinates".to_string())?;

    match ty {
        "Point" => Ok(GeoGeometry::Point(parse_point(coords)?)),
        "MultiPoint" => Ok(GeoGeometry::MultiPoint(parse_points(coords)?)),
        "LineString" => Ok(GeoGeometry::LineString(parse_points(coords)?)),
        "MultiLineString" => Ok(GeoGeometry::MultiLineString(parse_rings(coords)?)),
        "Polygon" => Ok(GeoGeometry::Polygon(parse_rings(coords)?)),
        "MultiPolygon" => {
            let polys = coords
                .as_array()
                .ok_or("MultiPolygon coordinates must be an array of polygons".to_string())?;
            let mut out = Vec::with_capacity(polys.len());
            for poly in polys {
                out.push(parse_rings(poly)?);
            }
            Ok(GeoGeometry::MultiPolygon(out))
        }
        other => Err(format!("unsupported geometry type: {other}")),
    }
}

fn parse_point(coords: &Value) -> Result<GeoPoint, String> {
    let arr = coords
        .as_array()
        .ok_or("position must be an array".to_string())?;
    if arr.len() < 2 {
        return Err("position must have [lon, lat]".to_string());
    }
    let lon = arr[0].as_f64().ok_or("lon must be a number".to_string())?;
    let lat = arr[1].as_f64().ok_or("lat must be a number".to_string())?;
    Ok(GeoPoint::new(lon, lat))
}

fn parse_points(coords: &Value) -> Result<Vec<GeoPoint>, String> {
    let arr = coords
        .as_array()
        .ok_or("coordinates must be an array".to_string())?;
    arr.iter().map(parse_point).collect()
}

fn parse_rings(coords: &Value) -> Result<Vec<Vec<GeoPoint>>, String> {
    let arr = coords
        .as_array()
        .ok_or("coordinates must be an array of rings".to_string())?;
    arr.iter().map(parse_points).collect()
}
