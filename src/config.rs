use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::constants::{
    DEFAULT_DELAY_MS, DEFAULT_SIGNAL_TYPE, DEFAULT_TIMEOUT_SECONDS, ELECTRICITY_MAPS_API_KEY_ENV,
    ELECTRICITY_MAPS_URL, OPEN_STREET_MAP_SEARCH_URL, WATT_TIME_LOGIN_URL,
    WATT_TIME_PASSWORD_ENV, WATT_TIME_REGION_URL, WATT_TIME_USER_ENV,
};
use crate::error::{EnrichError, Result};

/// Everything a run needs, resolved from the environment, the optional
/// settings file and command-line overrides.
#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub endpoints: Endpoints,
    pub inter_row_delay: Duration,
    pub rows_per_minute: Option<u64>,
    pub signal_type: String,
    pub timeout: Duration,
}

#[derive(Clone)]
pub struct Credentials {
    pub electricity_maps_api_key: String,
    pub watt_time_user: String,
    pub watt_time_password: String,
}

// Keep secrets out of debug logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("electricity_maps_api_key", &"<redacted>")
            .field("watt_time_user", &self.watt_time_user)
            .field("watt_time_password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads each credential through `lookup`, failing on the first one that is
    /// missing or blank.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &'static str| -> Result<String> {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or(EnrichError::MissingCredential(name))
        };

        Ok(Self {
            electricity_maps_api_key: require(ELECTRICITY_MAPS_API_KEY_ENV)?,
            watt_time_user: require(WATT_TIME_USER_ENV)?,
            watt_time_password: require(WATT_TIME_PASSWORD_ENV)?,
        })
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Endpoints {
    pub geocoder: String,
    pub electricity_maps: String,
    pub watt_time_login: String,
    pub watt_time_region: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            geocoder: OPEN_STREET_MAP_SEARCH_URL.to_string(),
            electricity_maps: ELECTRICITY_MAPS_URL.to_string(),
            watt_time_login: WATT_TIME_LOGIN_URL.to_string(),
            watt_time_region: WATT_TIME_REGION_URL.to_string(),
        }
    }
}

/// Optional TOML settings file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub delay_ms: u64,
    pub rows_per_minute: Option<u64>,
    pub timeout_seconds: u64,
    pub signal_type: String,
    pub endpoints: Endpoints,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_DELAY_MS,
            rows_per_minute: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            signal_type: DEFAULT_SIGNAL_TYPE.to_string(),
            endpoints: Endpoints::default(),
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            EnrichError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(content)?;
        if settings.rows_per_minute == Some(0) {
            return Err(EnrichError::Config("rows_per_minute must be greater than zero".to_string()));
        }
        if settings.signal_type.trim().is_empty() {
            return Err(EnrichError::Config("signal_type must not be empty".to_string()));
        }
        Ok(settings)
    }
}

impl Config {
    pub fn new(credentials: Credentials, settings: Settings) -> Self {
        Self {
            credentials,
            endpoints: settings.endpoints,
            inter_row_delay: Duration::from_millis(settings.delay_ms),
            rows_per_minute: settings.rows_per_minute,
            signal_type: settings.signal_type,
            timeout: Duration::from_secs(settings.timeout_seconds),
        }
    }

    /// Credentials from the environment plus the settings file, when given.
    pub fn load(settings_path: Option<&Path>) -> Result<Self> {
        let credentials = Credentials::from_env()?;
        let settings = match settings_path {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        Ok(Self::new(credentials, settings))
    }
}
