use std::path::Path;

use foundation::math::GeoPoint;
use serde::{Deserialize, Serialize};

/// A building record. Immutable once loaded; `name` is the identity key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub name: String,
    pub city: String,
    pub country: String,
    /// Meters.
    pub height: f64,
    pub floors: u32,
    pub year: i32,
    /// Currency units (USD).
    pub cost: f64,
    pub lat: f64,
    pub lon: f64,
}

impl Building {
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lon, self.lat)
    }
}

#[derive(Debug)]
pub enum CatalogError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Io(e) => write!(f, "failed to read building dataset: {e}"),
            CatalogError::Parse(e) => write!(f, "invalid building dataset: {e}"),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Io(e) => Some(e),
            CatalogError::Parse(e) => Some(e),
        }
    }
}

/// Parses a JSON array of building records, preserving order.
pub fn buildings_from_json_str(payload: &str) -> Result<Vec<Building>, CatalogError> {
    serde_json::from_str(payload).map_err(CatalogError::Parse)
}

pub fn load_buildings(path: impl AsRef<Path>) -> Result<Vec<Building>, CatalogError> {
    let payload = std::fs::read_to_string(path).map_err(CatalogError::Io)?;
    buildings_from_json_str(&payload)
}

#[allow(clippy::too_many_arguments)]
fn b(
    name: &str,
    city: &str,
    country: &str,
    height: f64,
    floors: u32,
    year: i32,
    cost: f64,
    lat: f64,
    lon: f64,
) -> Building {
    Building {
        name: name.to_string(),
        city: city.to_string(),
        country: country.to_string(),
        height,
        floors,
        year,
        cost,
        lat,
        lon,
    }
}

/// The bundled dataset of the world's tallest buildings, in display order.
#[rustfmt::skip]
pub fn sample_buildings() -> Vec<Building> {
    vec![
        b("Burj Khalifa", "Dubai", "UAE", 828.0, 163, 2010, 1.5e9, 25.1972, 55.2744),
        b("Merdeka 118", "Kuala Lumpur", "Malaysia", 679.0, 118, 2023, 1.2e9, 3.1412, 101.6865),
        b("Shanghai Tower", "Shanghai", "China", 632.0, 128, 2015, 2.4e9, 31.2304, 121.4737),
        b("Abraj Al-Bait Clock Tower", "Mecca", "Saudi Arabia", 601.0, 120, 2012, 15.0e9, 21.4225, 39.8262),
        b("Ping An Finance Centre", "Shenzhen", "China", 599.0, 115, 2017, 1.5e9, 22.5350, 114.0540),
        b("Lotte World Tower", "Seoul", "South Korea", 555.0, 123, 2017, 3.2e9, 37.5125, 127.1028),
        b("One World Trade Center", "New York", "USA", 541.0, 104, 2014, 3.9e9, 40.7128, -74.0135),
        b("Guangzhou CTF Finance Centre", "Guangzhou", "China", 530.0, 111, 2016, 1.5e9, 23.1291, 113.2644),
        b("Tianjin CTF Finance Centre", "Tianjin", "China", 530.0, 97, 2019, 1.2e9, 39.0402, 117.2000),
        b("China Zun", "Beijing", "China", 528.0, 108, 2018, 3.2e9, 39.9042, 116.4074),
        b("Taipei 101", "Taipei", "Taiwan", 508.0, 101, 2004, 1.8e9, 25.0340, 121.5645),
        b("Shanghai World Financial Center", "Shanghai", "China", 492.0, 101, 2008, 1.2e9, 31.2397, 121.4998),
        b("International Commerce Centre", "Hong Kong", "China", 484.0, 118, 2010, 2.0e9, 22.3039, 114.1594),
        b("Lakhta Center", "Saint Petersburg", "Russia", 462.0, 87, 2019, 1.8e9, 59.9864, 30.1772),
        b("Landmark 81", "Ho Chi Minh City", "Vietnam", 461.0, 81, 2018, 1.2e9, 10.7944, 106.7219),
        b("Changsha IFS Tower T1", "Changsha", "China", 452.0, 94, 2018, 1.5e9, 28.1944, 112.9711),
        b("Petronas Tower 1", "Kuala Lumpur", "Malaysia", 452.0, 88, 1998, 1.6e9, 3.1578, 101.7117),
        b("Petronas Tower 2", "Kuala Lumpur", "Malaysia", 452.0, 88, 1998, 1.6e9, 3.1583, 101.7118),
        b("Zifeng Tower", "Nanjing", "China", 450.0, 89, 2010, 1.2e9, 32.0603, 118.7781),
        b("Suyong Bay Tower", "Busan", "South Korea", 411.0, 101, 2019, 1.0e9, 35.1581, 129.1604),
        b("Empire State Building", "New York", "USA", 381.0, 102, 1931, 40_948_900.0, 40.7484, -73.9857),
        b("Bank of China Tower", "Hong Kong", "China", 367.0, 72, 1990, 1.0e9, 22.2794, 114.1589),
        b("Almas Tower", "Dubai", "UAE", 363.0, 68, 2009, 2.0e8, 25.0658, 55.1414),
        b("JW Marriott Marquis Dubai Tower 1", "Dubai", "UAE", 355.0, 82, 2012, 3.0e8, 25.1972, 55.2744),
        b("Emirates Tower One", "Dubai", "UAE", 355.0, 54, 2000, 2.5e8, 25.2188, 55.2794),
    ]
}

#[cfg(test)]
mod tests {
    use super::{buildings_from_json_str, sample_buildings};
    use pretty_assertions::assert_eq;

    #[test]
    fn sample_dataset_shape() {
        let all = sample_buildings();
        assert_eq!(all.len(), 25);
        assert_eq!(all[0].name, "Burj Khalifa");
        assert_eq!(all[0].position().lon_deg, 55.2744);

        let mut names: Vec<_> = all.iter().map(|b| b.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 25, "names are unique");
    }

    #[test]
    fn parses_json_records_in_order() {
        let payload = r#"[
            {"name":"A","city":"X","country":"Y","height":100,"floors":30,"year":2001,"cost":5e8,"lat":1.5,"lon":-2.5},
            {"name":"B","city":"X","country":"Y","height":90.5,"floors":25,"year":1999,"cost":1e8,"lat":0,"lon":0}
        ]"#;
        let parsed = buildings_from_json_str(payload).expect("parse");
        let names: Vec<_> = parsed.iter().map(|b| b.name.clone()).collect();
        assert_eq!(names, vec!["A".to_string(), "B".to_string()]);
        assert_eq!(parsed[1].height, 90.5);
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(buildings_from_json_str("{\"name\": 1}").is_err());
    }
}
