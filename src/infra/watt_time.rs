use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::app::ports::CarbonLookupPort;
use crate::constants::{WATT_TIME_LOGIN_SERVICE, WATT_TIME_SERVICE};
use crate::error::{EnrichError, Result};
use crate::infra::http_client::{has_coverage, read_json, require_ok};
use crate::types::{Coordinates, Lookup};

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RegionResponse {
    region: Option<String>,
}

/// Bearer token for the WattTime API. Valid for the length of one run.
#[derive(Clone)]
pub struct WattTimeSession {
    token: String,
}

impl WattTimeSession {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl std::fmt::Debug for WattTimeSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("WattTimeSession(<redacted>)")
    }
}

fn decode_token(body: &[u8]) -> Result<WattTimeSession> {
    let response: LoginResponse = serde_json::from_slice(body)?;
    match response.token {
        Some(token) if !token.is_empty() => Ok(WattTimeSession::new(token)),
        _ => Err(EnrichError::Api {
            message: "WattTime login response did not contain a token".to_string(),
        }),
    }
}

/// Exchanges a username and password for a bearer token using basic auth.
#[instrument(skip(client, password))]
pub async fn login(
    client: &reqwest::Client,
    login_url: &str,
    username: &str,
    password: &str,
) -> Result<WattTimeSession> {
    let response = client
        .get(login_url)
        .basic_auth(username, Some(password))
        .send()
        .await?;

    require_ok(WATT_TIME_LOGIN_SERVICE, response.status())?;
    let body = response.bytes().await?;
    let session = decode_token(&body)?;
    info!("Logged in to WattTime");
    Ok(session)
}

/// Resolves coordinates to a WattTime balancing-authority region.
pub struct WattTimeClient {
    client: reqwest::Client,
    url: String,
    session: WattTimeSession,
    signal_type: String,
}

impl WattTimeClient {
    pub fn new(
        client: reqwest::Client,
        url: impl Into<String>,
        session: WattTimeSession,
        signal_type: impl Into<String>,
    ) -> Self {
        Self {
            client,
            url: url.into(),
            session,
            signal_type: signal_type.into(),
        }
    }

    fn params(&self, at: Coordinates) -> [(&'static str, String); 3] {
        [
            ("latitude", at.latitude_text()),
            ("longitude", at.longitude_text()),
            ("signal_type", self.signal_type.clone()),
        ]
    }
}

#[async_trait]
impl CarbonLookupPort for WattTimeClient {
    fn service(&self) -> &'static str {
        WATT_TIME_SERVICE
    }

    #[instrument(skip(self, at), fields(%at))]
    async fn lookup(&self, at: Coordinates) -> Result<Lookup> {
        let response = self
            .client
            .get(&self.url)
            .query(&self.params(at))
            .bearer_auth(self.session.token())
            .send()
            .await?;

        if !has_coverage(WATT_TIME_SERVICE, response.status())? {
            debug!("No WattTime coverage");
            return Ok(Lookup::NoCoverage);
        }

        let region: RegionResponse = read_json(response).await?;
        Ok(Lookup::Found(region.region.unwrap_or_default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_token() {
        let session = decode_token(br#"{"token":"abc.def.ghi"}"#).unwrap();
        assert_eq!(session.token(), "abc.def.ghi");
        assert_eq!(format!("{:?}", session), "WattTimeSession(<redacted>)");
    }

    #[test]
    fn test_login_without_token_is_an_error() {
        assert!(matches!(decode_token(b"{}"), Err(EnrichError::Api { .. })));
        assert!(matches!(decode_token(b"not json"), Err(EnrichError::Json(_))));
    }

    #[test]
    fn test_region_params_include_signal_type() {
        let client = WattTimeClient::new(
            reqwest::Client::new(),
            "http://localhost/v3/region-from-loc",
            WattTimeSession::new("token"),
            "co2_moer",
        );
        let params = client.params(Coordinates::new(45.6, -121.1));
        assert_eq!(params[0], ("latitude", "45.600000".to_string()));
        assert_eq!(params[1], ("longitude", "-121.100000".to_string()));
        assert_eq!(params[2], ("signal_type", "co2_moer".to_string()));
    }
}
