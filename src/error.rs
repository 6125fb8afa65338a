use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnrichError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0} env var must be set")]
    MissingCredential(&'static str),

    #[error("Invalid {field} value: {value:?}")]
    InvalidCoordinate { field: &'static str, value: String },

    #[error("API error: {message}")]
    Api { message: String },

    #[error("{service}: expected 200 response got {status}")]
    UnexpectedStatus { service: &'static str, status: u16 },
}

pub type Result<T> = std::result::Result<T, EnrichError>;
