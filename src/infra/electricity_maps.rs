use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::app::ports::CarbonLookupPort;
use crate::constants::ELECTRICITY_MAPS_SERVICE;
use crate::error::Result;
use crate::infra::http_client::has_coverage;
use crate::types::{Coordinates, Lookup};

const AUTH_HEADER: &str = "auth-token";

#[derive(Debug, Deserialize)]
struct ZoneResponse {
    zone: Option<String>,
}

/// Resolves coordinates to an Electricity Maps zone.
pub struct ElectricityMapsClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl ElectricityMapsClient {
    pub fn new(client: reqwest::Client, url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            api_key: api_key.into(),
        }
    }
}

fn zone_params(at: Coordinates) -> [(&'static str, String); 2] {
    [("lat", at.latitude_text()), ("lon", at.longitude_text())]
}

fn decode_zone(body: &[u8]) -> Result<Lookup> {
    let response: ZoneResponse = serde_json::from_slice(body)?;
    Ok(Lookup::Found(response.zone.unwrap_or_default()))
}

#[async_trait]
impl CarbonLookupPort for ElectricityMapsClient {
    fn service(&self) -> &'static str {
        ELECTRICITY_MAPS_SERVICE
    }

    #[instrument(skip(self, at), fields(%at))]
    async fn lookup(&self, at: Coordinates) -> Result<Lookup> {
        let response = self
            .client
            .get(&self.url)
            .query(&zone_params(at))
            .header(AUTH_HEADER, &self.api_key)
            .send()
            .await?;

        if !has_coverage(ELECTRICITY_MAPS_SERVICE, response.status())? {
            debug!("No Electricity Maps coverage");
            return Ok(Lookup::NoCoverage);
        }

        let body = response.bytes().await?;
        decode_zone(&body)
    }
}
