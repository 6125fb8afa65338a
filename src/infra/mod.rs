// HTTP adapters for the geocoder and the carbon-data providers

pub mod electricity_maps;
pub mod http_client;
pub mod nominatim;
pub mod watt_time;
