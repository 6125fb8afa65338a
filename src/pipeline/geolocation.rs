use tracing::{debug, instrument, warn};

use crate::app::ports::GeocoderPort;
use crate::constants::AWS_CLOUD_PROVIDER;
use crate::error::{EnrichError, Result};
use crate::pipeline::records::RegionRow;
use crate::types::{Coordinates, Place};

/// How a row's coordinates were obtained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    /// Taken from the row itself.
    Stored(Coordinates),
    /// The geocoder returned exactly one candidate.
    Geocoded(Coordinates),
    /// No usable candidate; the row keeps (0, 0).
    Unresolved,
}

impl Resolution {
    pub fn coordinates(&self) -> Coordinates {
        match self {
            Resolution::Stored(c) | Resolution::Geocoded(c) => *c,
            Resolution::Unresolved => Coordinates::UNRESOLVED,
        }
    }
}

/// Extracts the human-readable name from an AWS location string,
/// e.g. `"US East (N. Virginia)"` becomes `"N. Virginia"`.
/// Returns `None` when there is no opening parenthesis.
pub fn parse_aws_location(input: &str) -> Option<String> {
    let (_, rest) = input.split_once('(')?;
    let inner = rest.split('(').next().unwrap_or(rest);
    Some(inner.strip_suffix(')').unwrap_or(inner).to_string())
}

fn parse_coordinate(field: &'static str, value: &str) -> Result<f64> {
    value.trim().parse::<f64>().map_err(|_| EnrichError::InvalidCoordinate {
        field,
        value: value.to_string(),
    })
}

/// Coordinates already present in the row. Both fields must be non-empty.
pub fn stored_coordinates(row: &RegionRow) -> Result<Option<Coordinates>> {
    if row.latitude.is_empty() || row.longitude.is_empty() {
        return Ok(None);
    }
    Ok(Some(Coordinates::new(
        parse_coordinate("latitude", &row.latitude)?,
        parse_coordinate("longitude", &row.longitude)?,
    )))
}

/// The text to geocode for a row: the override if present, otherwise the
/// location, normalized for AWS.
pub fn geocoding_query(row: &RegionRow) -> Option<String> {
    if !row.location_override.is_empty() {
        return Some(row.location_override.clone());
    }
    if row.cloud_provider == AWS_CLOUD_PROVIDER {
        return parse_aws_location(&row.location);
    }
    Some(row.location.clone())
}

/// Picks the coordinates of a single candidate. Zero or several candidates are
/// treated as unresolved.
pub fn coordinates_from_places(places: &[Place]) -> Result<Option<Coordinates>> {
    match places {
        [place] => Ok(Some(Coordinates::new(
            parse_coordinate("lat", &place.lat)?,
            parse_coordinate("lon", &place.lon)?,
        ))),
        _ => Ok(None),
    }
}

pub struct GeolocationResolver {
    geocoder: Box<dyn GeocoderPort>,
}

impl GeolocationResolver {
    pub fn new(geocoder: Box<dyn GeocoderPort>) -> Self {
        Self { geocoder }
    }

    /// Resolves a row, reusing stored coordinates when both are present.
    #[instrument(skip(self, row), fields(cloud_region = %row.cloud_region))]
    pub async fn resolve_row(&self, row: &RegionRow) -> Result<Resolution> {
        if let Some(coordinates) = stored_coordinates(row)? {
            return Ok(Resolution::Stored(coordinates));
        }

        let Some(query) = geocoding_query(row) else {
            warn!(location = %row.location, "AWS location has no parenthesized name");
            return Ok(Resolution::Unresolved);
        };

        self.resolve(&row.location_type, &query).await
    }

    /// Geocodes `query` with `location_type` as the search field.
    pub async fn resolve(&self, location_type: &str, query: &str) -> Result<Resolution> {
        let places = self.geocoder.search(location_type, query).await?;
        match coordinates_from_places(&places)? {
            Some(coordinates) => {
                debug!(%query, %coordinates, "Geocoded location");
                Ok(Resolution::Geocoded(coordinates))
            }
            None => {
                warn!(%query, candidates = places.len(), "Location did not resolve to a single place");
                Ok(Resolution::Unresolved)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    struct MockGeocoder {
        places: Vec<Place>,
        calls: Arc<Mutex<Vec<(String, String)>>>,
    }

    impl MockGeocoder {
        fn new(places: Vec<Place>) -> Self {
            Self {
                places,
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl GeocoderPort for MockGeocoder {
        async fn search(&self, location_type: &str, query: &str) -> Result<Vec<Place>> {
            self.calls
                .lock()
                .await
                .push((location_type.to_string(), query.to_string()));
            Ok(self.places.clone())
        }
    }

    fn place(lat: &str, lon: &str) -> Place {
        Place {
            lat: lat.to_string(),
            lon: lon.to_string(),
        }
    }

    fn row(provider: &str, location: &str, location_override: &str, lat: &str, lon: &str) -> RegionRow {
        RegionRow {
            cloud_provider: provider.to_string(),
            cloud_region: "region-1".to_string(),
            location: location.to_string(),
            location_override: location_override.to_string(),
            location_source: "manual".to_string(),
            location_type: "city".to_string(),
            latitude: lat.to_string(),
            longitude: lon.to_string(),
            electricity_maps_zone: String::new(),
            watt_time_region: String::new(),
        }
    }

    #[test]
    fn test_parse_aws_location() {
        assert_eq!(parse_aws_location("US East (N. Virginia)").as_deref(), Some("N. Virginia"));
        assert_eq!(parse_aws_location("Europe (Frankfurt)").as_deref(), Some("Frankfurt"));
        assert_eq!(parse_aws_location("Asia Pacific (Osaka").as_deref(), Some("Osaka"));
        assert_eq!(parse_aws_location("Frankfurt"), None);
        assert_eq!(parse_aws_location(""), None);
    }

    #[test]
    fn test_geocoding_query_precedence() {
        let aws = row(AWS_CLOUD_PROVIDER, "US West (Oregon)", "", "", "");
        assert_eq!(geocoding_query(&aws).as_deref(), Some("Oregon"));

        let aws_override = row(AWS_CLOUD_PROVIDER, "US West (Oregon)", "Boardman", "", "");
        assert_eq!(geocoding_query(&aws_override).as_deref(), Some("Boardman"));

        let other = row("Google Cloud", "Council Bluffs, Iowa", "", "", "");
        assert_eq!(geocoding_query(&other).as_deref(), Some("Council Bluffs, Iowa"));

        let aws_plain = row(AWS_CLOUD_PROVIDER, "Oregon", "", "", "");
        assert_eq!(geocoding_query(&aws_plain), None);
    }

    #[test]
    fn test_stored_coordinates() {
        let both = row("Google Cloud", "x", "", "48.8566", "2.3522");
        assert_eq!(stored_coordinates(&both).unwrap(), Some(Coordinates::new(48.8566, 2.3522)));

        let one = row("Google Cloud", "x", "", "48.8566", "");
        assert_eq!(stored_coordinates(&one).unwrap(), None);

        let bad = row("Google Cloud", "x", "", "north", "2.3522");
        assert!(matches!(
            stored_coordinates(&bad),
            Err(EnrichError::InvalidCoordinate { field: "latitude", .. })
        ));
    }

    #[tokio::test]
    async fn test_stored_coordinates_skip_geocoder() {
        let geocoder = MockGeocoder::new(vec![place("1.0", "1.0")]);
        let calls = geocoder.calls.clone();
        let resolver = GeolocationResolver::new(Box::new(geocoder));

        let resolution = resolver
            .resolve_row(&row("Google Cloud", "Paris", "", "0.000000", "0.000000"))
            .await
            .unwrap();

        assert_eq!(resolution, Resolution::Stored(Coordinates::UNRESOLVED));
        assert!(calls.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_single_candidate_resolves() {
        let geocoder = MockGeocoder::new(vec![place("37.5", "-78.6")]);
        let calls = geocoder.calls.clone();
        let resolver = GeolocationResolver::new(Box::new(geocoder));

        let resolution = resolver
            .resolve_row(&row(AWS_CLOUD_PROVIDER, "US East (N. Virginia)", "", "", ""))
            .await
            .unwrap();

        assert_eq!(resolution, Resolution::Geocoded(Coordinates::new(37.5, -78.6)));
        assert_eq!(
            *calls.lock().await,
            vec![("city".to_string(), "N. Virginia".to_string())]
        );
    }

    #[tokio::test]
    async fn test_zero_or_many_candidates_are_unresolved() {
        for places in [vec![], vec![place("1.0", "2.0"), place("3.0", "4.0")]] {
            let resolver = GeolocationResolver::new(Box::new(MockGeocoder::new(places)));
            let resolution = resolver.resolve("city", "Springfield").await.unwrap();
            assert_eq!(resolution, Resolution::Unresolved);
            assert_eq!(resolution.coordinates(), Coordinates::new(0.0, 0.0));
        }
    }

    #[tokio::test]
    async fn test_malformed_candidate_is_an_error() {
        let resolver = GeolocationResolver::new(Box::new(MockGeocoder::new(vec![place("", "2.0")])));
        let result = resolver.resolve("city", "Nowhere").await;
        assert!(matches!(result, Err(EnrichError::InvalidCoordinate { field: "lat", .. })));
    }

    #[tokio::test]
    async fn test_blank_location_is_still_geocoded() {
        let geocoder = MockGeocoder::new(vec![]);
        let calls = geocoder.calls.clone();
        let resolver = GeolocationResolver::new(Box::new(geocoder));

        let resolution = resolver
            .resolve_row(&row("Google Cloud", "", "", "", ""))
            .await
            .unwrap();

        assert_eq!(resolution, Resolution::Unresolved);
        assert_eq!(*calls.lock().await, vec![("city".to_string(), String::new())]);
    }

    #[tokio::test]
    async fn test_aws_location_without_parentheses_skips_geocoder() {
        let geocoder = MockGeocoder::new(vec![place("1.0", "1.0")]);
        let calls = geocoder.calls.clone();
        let resolver = GeolocationResolver::new(Box::new(geocoder));

        let resolution = resolver
            .resolve_row(&row(AWS_CLOUD_PROVIDER, "Oregon", "", "", ""))
            .await
            .unwrap();

        assert_eq!(resolution, Resolution::Unresolved);
        assert!(calls.lock().await.is_empty());
    }
}
