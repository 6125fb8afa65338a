//! Enriches a table of cloud-provider regions with the Electricity Maps zone
//! and WattTime region covering each region's location.

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod types;

pub mod pipeline;

// Layered boundaries for application and infrastructure
pub mod app;
pub mod infra;

pub use app::enrich_use_case::{EnrichStats, EnrichUseCase};
pub use error::{EnrichError, Result};
