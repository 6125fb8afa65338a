use tracing::info;

use crate::app::enrich_use_case::EnrichUseCase;
use crate::app::ports::PacerPort;
use crate::config::Config;
use crate::error::Result;
use crate::infra::electricity_maps::ElectricityMapsClient;
use crate::infra::http_client::build_client;
use crate::infra::nominatim::NominatimGeocoder;
use crate::infra::watt_time::{self, WattTimeClient};
use crate::pipeline::pacing::{FixedDelay, RateLimiter};

/// Picks the row pacer: token bucket when a rate is configured, fixed delay otherwise.
pub fn pacer_for(config: &Config) -> Box<dyn PacerPort> {
    match config.rows_per_minute {
        Some(per_minute) => Box::new(RateLimiter::new(per_minute)),
        None => Box::new(FixedDelay::new(config.inter_row_delay)),
    }
}

/// Logs in to WattTime and wires the HTTP adapters into an [`EnrichUseCase`].
pub async fn build_use_case(config: &Config) -> Result<EnrichUseCase> {
    let client = build_client(config.timeout)?;
    let credentials = &config.credentials;
    let endpoints = &config.endpoints;

    let session = watt_time::login(
        &client,
        &endpoints.watt_time_login,
        &credentials.watt_time_user,
        &credentials.watt_time_password,
    )
    .await?;

    info!(
        delay_ms = config.inter_row_delay.as_millis() as u64,
        rows_per_minute = ?config.rows_per_minute,
        signal_type = %config.signal_type,
        "Pipeline configured"
    );

    Ok(EnrichUseCase::new(
        Box::new(NominatimGeocoder::new(client.clone(), &endpoints.geocoder)),
        Box::new(ElectricityMapsClient::new(
            client.clone(),
            &endpoints.electricity_maps,
            &credentials.electricity_maps_api_key,
        )),
        Box::new(WattTimeClient::new(
            client,
            &endpoints.watt_time_region,
            session,
            &config.signal_type,
        )),
        pacer_for(config),
    ))
}
