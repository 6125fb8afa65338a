use serde::Deserialize;
use std::fmt;

/// One row of the region table.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub cloud_provider: String,
    pub cloud_region: String,
    pub location: String,
    pub location_override: String,
    pub location_source: String,
    pub location_type: String,
    pub coordinates: Coordinates,
    pub electricity_maps_zone: String,
    pub watt_time_region: String,
}

impl Region {
    pub fn needs_zone(&self) -> bool {
        self.electricity_maps_zone.is_empty()
    }

    pub fn needs_watt_time_region(&self) -> bool {
        self.watt_time_region.is_empty()
    }
}

/// Decimal-degree coordinates. (0, 0) doubles as the "unresolved" marker.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const UNRESOLVED: Coordinates = Coordinates { latitude: 0.0, longitude: 0.0 };

    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    pub fn is_unresolved(&self) -> bool {
        *self == Self::UNRESOLVED
    }

    /// Six-decimal fixed-point rendering used in the table and in query strings.
    pub fn latitude_text(&self) -> String {
        format!("{:.6}", self.latitude)
    }

    pub fn longitude_text(&self) -> String {
        format!("{:.6}", self.longitude)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// A geocoder search candidate. The service returns coordinates as strings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Place {
    pub lat: String,
    pub lon: String,
}

/// Outcome of a carbon-data lookup that reached the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found(String),
    /// The provider has no data for the coordinates.
    NoCoverage,
}

impl Lookup {
    pub fn is_no_coverage(&self) -> bool {
        matches!(self, Lookup::NoCoverage)
    }

    /// The code to store in the table; no coverage is stored as an empty field.
    pub fn into_code(self) -> String {
        match self {
            Lookup::Found(code) => code,
            Lookup::NoCoverage => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_empty_fields_need_lookup() {
        let mut region = Region {
            cloud_provider: "Google Cloud".to_string(),
            cloud_region: "europe-west9".to_string(),
            location: "Paris".to_string(),
            location_override: String::new(),
            location_source: "manual".to_string(),
            location_type: "city".to_string(),
            coordinates: Coordinates::UNRESOLVED,
            electricity_maps_zone: String::new(),
            watt_time_region: "FR".to_string(),
        };
        assert!(region.needs_zone());
        assert!(!region.needs_watt_time_region());

        region.electricity_maps_zone = "FR".to_string();
        assert!(!region.needs_zone());
    }

    #[test]
    fn test_coordinate_text_is_fixed_point() {
        let coords = Coordinates::new(37.5, -78.6);
        assert_eq!(coords.latitude_text(), "37.500000");
        assert_eq!(coords.longitude_text(), "-78.600000");
        assert!(!coords.is_unresolved());
        assert!(Coordinates::default().is_unresolved());
    }

    #[test]
    fn test_no_coverage_is_stored_empty() {
        assert_eq!(Lookup::NoCoverage.into_code(), "");
        assert_eq!(Lookup::Found("US-VA".to_string()).into_code(), "US-VA");
    }
}
