use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::constants::USER_AGENT;
use crate::error::{EnrichError, Result};

/// Builds the client shared by every adapter in a run.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()?;
    Ok(client)
}

/// Fails unless the status is 200.
pub fn require_ok(service: &'static str, status: StatusCode) -> Result<()> {
    if status == StatusCode::OK {
        Ok(())
    } else {
        Err(EnrichError::UnexpectedStatus {
            service,
            status: status.as_u16(),
        })
    }
}

/// Like [`require_ok`], but a 404 means the provider has no data and yields `false`.
pub fn has_coverage(service: &'static str, status: StatusCode) -> Result<bool> {
    if status == StatusCode::NOT_FOUND {
        return Ok(false);
    }
    require_ok(service, status)?;
    Ok(true)
}

/// Reads the whole body and decodes it as JSON.
pub async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}
