use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::app::ports::GeocoderPort;
use crate::constants::GEOCODER_SERVICE;
use crate::error::Result;
use crate::infra::http_client::{read_json, require_ok};
use crate::types::Place;

/// OpenStreetMap Nominatim structured search.
pub struct NominatimGeocoder {
    client: reqwest::Client,
    search_url: String,
}

impl NominatimGeocoder {
    pub fn new(client: reqwest::Client, search_url: impl Into<String>) -> Self {
        Self {
            client,
            search_url: search_url.into(),
        }
    }
}

/// Query parameters for a search: the location type names the field.
pub fn search_params<'a>(location_type: &'a str, query: &'a str) -> [(&'a str, &'a str); 3] {
    [(location_type, query), ("format", "json"), ("limit", "1")]
}

#[async_trait]
impl GeocoderPort for NominatimGeocoder {
    #[instrument(skip(self))]
    async fn search(&self, location_type: &str, query: &str) -> Result<Vec<Place>> {
        let response = self
            .client
            .get(&self.search_url)
            .query(&search_params(location_type, query))
            .send()
            .await?;

        require_ok(GEOCODER_SERVICE, response.status())?;
        let places: Vec<Place> = read_json(response).await?;
        debug!(candidates = places.len(), "Geocoder response");
        Ok(places)
    }
}
