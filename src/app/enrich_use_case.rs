use std::io;
use std::path::Path;
use tracing::{debug, info, instrument};

use crate::app::ports::{CarbonLookupPort, GeocoderPort, PacerPort};
use crate::error::Result;
use crate::pipeline::geolocation::{GeolocationResolver, Resolution};
use crate::pipeline::records::{read_rows, write_regions};
use crate::types::Region;

/// Use case for enriching a region table with carbon-data identifiers
pub struct EnrichUseCase {
    resolver: GeolocationResolver,
    zones: Box<dyn CarbonLookupPort>,
    regions: Box<dyn CarbonLookupPort>,
    pacer: Box<dyn PacerPort>,
}

impl EnrichUseCase {
    pub fn new(
        geocoder: Box<dyn GeocoderPort>,
        zones: Box<dyn CarbonLookupPort>,
        regions: Box<dyn CarbonLookupPort>,
        pacer: Box<dyn PacerPort>,
    ) -> Self {
        Self {
            resolver: GeolocationResolver::new(geocoder),
            zones,
            regions,
            pacer,
        }
    }

    /// Reads every row, resolving coordinates for rows that have none.
    #[instrument(skip_all)]
    pub async fn load<R: io::Read>(&self, input: R, stats: &mut EnrichStats) -> Result<Vec<Region>> {
        let batch = read_rows(input)?;
        stats.rows_skipped = batch.skipped;

        let mut regions = Vec::with_capacity(batch.rows.len());
        for row in batch.rows {
            let resolution = self.resolver.resolve_row(&row).await?;
            match resolution {
                Resolution::Stored(_) => {}
                Resolution::Geocoded(_) => stats.rows_geocoded += 1,
                Resolution::Unresolved => stats.rows_unresolved += 1,
            }
            regions.push(row.into_region(resolution.coordinates()));
        }

        stats.rows_loaded = regions.len();
        info!(rows = regions.len(), skipped = stats.rows_skipped, "Loaded regions");
        Ok(regions)
    }

    /// Fills empty zone and region fields in place, pausing after every row.
    /// Populated fields are never looked up again.
    #[instrument(skip_all)]
    pub async fn enrich(&self, regions: &mut [Region], stats: &mut EnrichStats) -> Result<()> {
        for region in regions.iter_mut() {
            debug!(
                cloud_region = %region.cloud_region,
                unresolved = region.coordinates.is_unresolved(),
                "Enriching region"
            );

            if region.needs_zone() {
                let lookup = self.zones.lookup(region.coordinates).await?;
                debug!(service = self.zones.service(), ?lookup, "Lookup finished");
                stats.zone_lookups += 1;
                stats.zone_no_coverage += lookup.is_no_coverage() as usize;
                region.electricity_maps_zone = lookup.into_code();
            }

            if region.needs_watt_time_region() {
                let lookup = self.regions.lookup(region.coordinates).await?;
                debug!(service = self.regions.service(), ?lookup, "Lookup finished");
                stats.region_lookups += 1;
                stats.region_no_coverage += lookup.is_no_coverage() as usize;
                region.watt_time_region = lookup.into_code();
            }

            self.pacer.pause().await;
        }
        Ok(())
    }

    /// Loads, enriches and then writes the whole table. Nothing is written
    /// unless every row was enriched.
    pub async fn run<R: io::Read, W: io::Write>(&self, input: R, output: W) -> Result<EnrichStats> {
        let mut stats = EnrichStats::default();

        let mut regions = self.load(input, &mut stats).await?;
        self.enrich(&mut regions, &mut stats).await?;
        write_regions(output, &regions)?;

        info!(
            rows = stats.rows_loaded,
            skipped = stats.rows_skipped,
            geocoded = stats.rows_geocoded,
            unresolved = stats.rows_unresolved,
            zone_lookups = stats.zone_lookups,
            zone_no_coverage = stats.zone_no_coverage,
            region_lookups = stats.region_lookups,
            region_no_coverage = stats.region_no_coverage,
            "Enrichment complete"
        );
        Ok(stats)
    }

    /// Like [`run`](Self::run), but the table goes to `path`. The file is
    /// created only after the run succeeded.
    pub async fn run_to_file<R: io::Read>(&self, input: R, path: &Path) -> Result<EnrichStats> {
        let mut buffer = Vec::new();
        let stats = self.run(input, &mut buffer).await?;
        std::fs::write(path, buffer)?;
        Ok(stats)
    }
}

/// Counters for one enrichment run
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EnrichStats {
    pub rows_loaded: usize,
    pub rows_skipped: usize,
    pub rows_geocoded: usize,
    pub rows_unresolved: usize,
    pub zone_lookups: usize,
    pub zone_no_coverage: usize,
    pub region_lookups: usize,
    pub region_no_coverage: usize,
}

impl EnrichStats {
    /// Total remote carbon-data lookups issued
    pub fn lookups(&self) -> usize {
        self.zone_lookups + self.region_lookups
    }
}
