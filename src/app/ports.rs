use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Coordinates, Lookup, Place};

/// Free-text place search.
#[async_trait]
pub trait GeocoderPort: Send + Sync {
    /// Searches for `query` using `location_type` as the query field (e.g. `city`).
    async fn search(&self, location_type: &str, query: &str) -> Result<Vec<Place>>;
}

/// Maps coordinates to a provider-specific grid identifier.
#[async_trait]
pub trait CarbonLookupPort: Send + Sync {
    /// Short provider name for logs and errors.
    fn service(&self) -> &'static str;

    async fn lookup(&self, at: Coordinates) -> Result<Lookup>;
}

/// Throttles the driver between rows.
#[async_trait]
pub trait PacerPort: Send + Sync {
    async fn pause(&self);
}
