use serde::Deserialize;
use std::io;
use tracing::{debug, warn};

use crate::constants::{FIELD_COUNT, HEADER};
use crate::error::Result;
use crate::types::{Coordinates, Region};

/// A region row as read from the table, before coordinates are resolved.
/// Fields map positionally onto the ten columns.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RegionRow {
    pub cloud_provider: String,
    pub cloud_region: String,
    pub location: String,
    pub location_override: String,
    pub location_source: String,
    pub location_type: String,
    pub latitude: String,
    pub longitude: String,
    pub electricity_maps_zone: String,
    pub watt_time_region: String,
}

impl RegionRow {
    pub fn into_region(self, coordinates: Coordinates) -> Region {
        Region {
            cloud_provider: self.cloud_provider,
            cloud_region: self.cloud_region,
            location: self.location,
            location_override: self.location_override,
            location_source: self.location_source,
            location_type: self.location_type,
            coordinates,
            electricity_maps_zone: self.electricity_maps_zone,
            watt_time_region: self.watt_time_region,
        }
    }
}

/// Rows read from an input table, in input order.
#[derive(Debug, Default)]
pub struct RowBatch {
    pub rows: Vec<RegionRow>,
    /// Rows dropped because they did not have exactly ten fields.
    pub skipped: usize,
}

/// Reads a region table. The first line is a header and is ignored.
pub fn read_rows<R: io::Read>(input: R) -> Result<RowBatch> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let mut batch = RowBatch::default();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        if record.len() != FIELD_COUNT {
            // index 0 is the first data row, on line 2
            debug!(line = index + 2, fields = record.len(), "Skipping malformed row");
            batch.skipped += 1;
            continue;
        }
        batch.rows.push(record.deserialize(None)?);
    }

    if batch.skipped > 0 {
        warn!(skipped = batch.skipped, "Dropped rows without exactly {} fields", FIELD_COUNT);
    }
    Ok(batch)
}

fn region_fields(region: &Region) -> [String; FIELD_COUNT] {
    [
        region.cloud_provider.clone(),
        region.cloud_region.clone(),
        region.location.clone(),
        region.location_override.clone(),
        region.location_source.clone(),
        region.location_type.clone(),
        region.coordinates.latitude_text(),
        region.coordinates.longitude_text(),
        region.electricity_maps_zone.clone(),
        region.watt_time_region.clone(),
    ]
}

/// Writes the header followed by every region, then flushes.
pub fn write_regions<W: io::Write>(output: W, regions: &[Region]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(output);

    writer.write_record(HEADER)?;
    for region in regions {
        writer.write_record(region_fields(region))?;
    }
    writer.flush()?;
    Ok(())
}
