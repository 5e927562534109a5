//! Static lookup tables used for validation and feature engineering.
//!
//! All tables are loaded once at startup and are read-only afterwards, so a
//! single [`ReferenceData`] can be shared across requests behind an `Arc`.

mod loader;

use geo::Point;
use hashbrown::HashMap;
use std::path::PathBuf;

pub use loader::ReferencePaths;

/// Centre of a known city and the region it belongs to
#[derive(Debug, Clone, PartialEq)]
pub struct CityCenter {
    pub region: String,
    /// x = longitude, y = latitude
    pub location: Point<f64>,
}

/// Precomputed target encodings for a neighbourhood within a city
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighborhoodEncoding {
    pub hood: f64,
    pub city: f64,
}

/// Immutable reference tables
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    cities: HashMap<String, CityCenter>,
    region_capitals: HashMap<String, String>,
    encodings: HashMap<(String, String), NeighborhoodEncoding>,
    city_encodings: HashMap<String, f64>,
}

impl ReferenceData {
    /// Start an in-memory table set
    pub fn builder() -> ReferenceDataBuilder {
        ReferenceDataBuilder::default()
    }

    /// Whether the city appears in the city centre table
    pub fn is_valid_city(&self, city: &str) -> bool {
        self.cities.contains_key(city)
    }

    /// Region a known city belongs to
    pub fn region_of(&self, city: &str) -> Option<&str> {
        self.cities.get(city).map(|c| c.region.as_str())
    }

    /// Designated capital city of a region
    pub fn capital_of(&self, region: &str) -> Option<&str> {
        self.region_capitals.get(region).map(String::as_str)
    }

    /// Centre coordinates of a known city
    pub fn city_center(&self, city: &str) -> Option<Point<f64>> {
        self.cities.get(city).map(|c| c.location)
    }

    /// Encodings for an exact (neighbourhood, city) pair
    pub fn neighborhood_encoding(&self, neighborhood: &str, city: &str) -> Option<NeighborhoodEncoding> {
        self.encodings
            .get(&(neighborhood.to_string(), city.to_string()))
            .copied()
    }

    /// City-level encoding, taken from the first row recorded for the city
    pub fn city_encoding(&self, city: &str) -> Option<f64> {
        self.city_encodings.get(city).copied()
    }

    /// Number of known cities
    pub fn city_count(&self) -> usize {
        self.cities.len()
    }

    /// Number of (neighbourhood, city) encodings
    pub fn encoding_count(&self) -> usize {
        self.encodings.len()
    }
}

/// Incremental construction of [`ReferenceData`].
///
/// When a key is inserted twice the first value is kept, matching how the
/// file loader treats duplicate rows.
#[derive(Debug, Default)]
pub struct ReferenceDataBuilder {
    data: ReferenceData,
}

impl ReferenceDataBuilder {
    pub fn city(mut self, city: &str, region: &str, lat: f64, lon: f64) -> Self {
        self.add_city(city, region, lat, lon);
        self
    }

    pub fn capital(mut self, region: &str, capital: &str) -> Self {
        self.add_capital(region, capital);
        self
    }

    pub fn encoding(mut self, neighborhood: &str, city: &str, hood: f64, city_code: f64) -> Self {
        self.add_encoding(neighborhood, city, hood, city_code);
        self
    }

    pub(crate) fn add_city(&mut self, city: &str, region: &str, lat: f64, lon: f64) {
        self.data
            .cities
            .entry(city.to_string())
            .or_insert_with(|| CityCenter {
                region: region.to_string(),
                location: Point::new(lon, lat),
            });
    }

    pub(crate) fn add_capital(&mut self, region: &str, capital: &str) {
        self.data
            .region_capitals
            .entry(region.to_string())
            .or_insert_with(|| capital.to_string());
    }

    pub(crate) fn add_encoding(&mut self, neighborhood: &str, city: &str, hood: f64, city_code: f64) {
        self.data
            .encodings
            .entry((neighborhood.to_string(), city.to_string()))
            .or_insert(NeighborhoodEncoding {
                hood,
                city: city_code,
            });
        self.data
            .city_encodings
            .entry(city.to_string())
            .or_insert(city_code);
    }

    pub fn build(self) -> ReferenceData {
        self.data
    }
}

/// Resolve a file name against a base directory unless it is already absolute
pub(crate) fn resolve(base: &std::path::Path, file: &std::path::Path) -> PathBuf {
    if file.is_absolute() {
        file.to_path_buf()
    } else {
        base.join(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_entry_wins() {
        let data = ReferenceData::builder()
            .city("Riyadh", "Riyadh", 24.7136, 46.6753)
            .city("Riyadh", "Makkah", 0.0, 0.0)
            .encoding("Olaya", "Riyadh", 10.0, 20.0)
            .encoding("Malaz", "Riyadh", 11.0, 21.0)
            .build();

        assert_eq!(data.region_of("Riyadh"), Some("Riyadh"));
        assert_eq!(data.city_encoding("Riyadh"), Some(20.0));
        assert_eq!(
            data.neighborhood_encoding("Malaz", "Riyadh"),
            Some(NeighborhoodEncoding {
                hood: 11.0,
                city: 21.0
            })
        );
    }

    #[test]
    fn test_city_center_is_lon_lat() {
        let data = ReferenceData::builder()
            .city("Jeddah", "Makkah", 21.5433, 39.1728)
            .build();
        let center = data.city_center("Jeddah").unwrap();
        assert_eq!(center.x(), 39.1728);
        assert_eq!(center.y(), 21.5433);
        assert!(data.city_center("Unknown").is_none());
    }
}
