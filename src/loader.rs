//! Dataset loading: look up a city's trip log, derive calendar fields,
//! apply the month/day filter and drop incomplete rows.

use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::SourceConfig;
use crate::error::{BikeshareError, BikeshareResult};
use crate::filter::FilterSpec;
use crate::record::{Columns, FilteredDataset, RawTrip, TripRecord};

/// Per-load row accounting.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    pub rows_read: usize,
    pub kept: usize,
    pub filtered_out: usize,
    pub dropped_malformed: usize,
    pub dropped_incomplete: usize,
}

pub struct DatasetLoader {
    config: SourceConfig,
}

impl DatasetLoader {
    pub fn new(config: SourceConfig) -> Self {
        Self { config }
    }

    /// Loads the trip log for `spec.city` and keeps the trips `spec` admits.
    ///
    /// # Errors
    ///
    /// Fails only when the city's source is missing or unreadable. Bad rows are
    /// dropped and counted, never returned as errors.
    #[tracing::instrument(skip(self), fields(spec = %spec))]
    pub fn load(&self, spec: &FilterSpec) -> BikeshareResult<FilteredDataset> {
        let path = self
            .config
            .path_for(spec.city)
            .ok_or(BikeshareError::NoSourceConfigured { city: spec.city })?;

        let source = open_source(path).map_err(|source| BikeshareError::SourceUnavailable {
            city: spec.city,
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = %path.display(), "Reading trip log");
        let (dataset, _) = load_from_reader(spec, source)?;
        Ok(dataset)
    }
}

fn open_source(path: &Path) -> std::io::Result<Box<dyn Read>> {
    let file = BufReader::new(File::open(path)?);
    if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        Ok(Box::new(GzDecoder::new(file)))
    } else {
        Ok(Box::new(file))
    }
}

/// Reads CSV trip rows from `reader` and builds the dataset `spec` describes.
pub fn load_from_reader<R: Read>(
    spec: &FilterSpec,
    reader: R,
) -> BikeshareResult<(FilteredDataset, LoadSummary)> {
    let mut rdr = csv::Reader::from_reader(reader);
    let columns = rdr
        .headers()
        .map(Columns::from_headers)
        .map_err(|source| BikeshareError::BadHeader {
            city: spec.city,
            source,
        })?;

    let mut summary = LoadSummary::default();
    let mut records = Vec::new();

    for (line, row) in rdr.deserialize::<RawTrip>().enumerate() {
        summary.rows_read += 1;

        let raw = match row {
            Ok(raw) => raw,
            Err(e) => {
                debug!(line = line + 2, error = %e, "Dropping unreadable row");
                summary.dropped_malformed += 1;
                continue;
            }
        };

        let record = match TripRecord::try_from(raw) {
            Ok(record) => record,
            Err(e) if e.is_format_error() => {
                debug!(line = line + 2, error = %e, "Dropping malformed row");
                summary.dropped_malformed += 1;
                continue;
            }
            Err(e) => {
                debug!(line = line + 2, error = %e, "Dropping incomplete row");
                summary.dropped_incomplete += 1;
                continue;
            }
        };

        if spec.admits(record.month, record.day_of_week) {
            records.push(record);
        } else {
            summary.filtered_out += 1;
        }
    }

    summary.kept = records.len();

    if summary.dropped_malformed > 0 {
        warn!(
            dropped = summary.dropped_malformed,
            "Some rows had malformed data and were skipped"
        );
    }

    info!(
        city = %spec.city,
        rows_read = summary.rows_read,
        kept = summary.kept,
        filtered_out = summary.filtered_out,
        dropped_malformed = summary.dropped_malformed,
        dropped_incomplete = summary.dropped_incomplete,
        ?columns,
        "Dataset loaded"
    );

    Ok((FilteredDataset::new(spec.city, columns, records), summary))
}
