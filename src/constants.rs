/// Provider endpoints, environment variable names and the table layout shared
/// across the crate.

// Default endpoints (overridable through the settings file)
pub const OPEN_STREET_MAP_SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";
pub const ELECTRICITY_MAPS_URL: &str =
    "https://api-access.electricitymaps.com/free-tier/carbon-intensity/latest";
pub const WATT_TIME_LOGIN_URL: &str = "https://api.watttime.org/login";
pub const WATT_TIME_REGION_URL: &str = "https://api.watttime.org/v3/region-from-loc";

// Credentials read from the environment
pub const ELECTRICITY_MAPS_API_KEY_ENV: &str = "ELECTRICITY_MAPS_API_KEY";
pub const WATT_TIME_USER_ENV: &str = "WATT_TIME_USER";
pub const WATT_TIME_PASSWORD_ENV: &str = "WATT_TIME_PASSWORD";

pub const AWS_CLOUD_PROVIDER: &str = "Amazon Web Services";

pub const DEFAULT_SIGNAL_TYPE: &str = "co2_moer";
pub const DEFAULT_DELAY_MS: u64 = 1000;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Column order of the region table, input and output alike.
pub const HEADER: [&str; 10] = [
    "cloud_provider",
    "cloud_region",
    "location",
    "location_override",
    "location_source",
    "location_type",
    "latitude",
    "longitude",
    "electricity_maps_zone",
    "watt_time_region",
];

pub const FIELD_COUNT: usize = HEADER.len();

// Service names used in errors and log fields
pub const GEOCODER_SERVICE: &str = "nominatim";
pub const ELECTRICITY_MAPS_SERVICE: &str = "electricity_maps";
pub const WATT_TIME_LOGIN_SERVICE: &str = "watt_time_login";
pub const WATT_TIME_SERVICE: &str = "watt_time";
