use serde::Serialize;

use super::utility::{mode, mode_with_count};
use super::{Figure, figure};
use crate::record::FilteredDataset;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopularTrip {
    pub start_station: String,
    pub end_station: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationReport {
    pub popular_start_station: Figure<String>,
    pub popular_end_station: Figure<String>,
    pub popular_trip: Figure<PopularTrip>,
}

#[tracing::instrument(name = "station_stats", skip_all, fields(records = dataset.len()))]
pub fn station_stats(dataset: &FilteredDataset) -> StationReport {
    let records = &dataset.records;

    let popular_trip = mode_with_count(
        records
            .iter()
            .map(|r| (r.start_station.as_str(), r.end_station.as_str())),
    )
    .map(|((start, end), count)| PopularTrip {
        start_station: start.to_string(),
        end_station: end.to_string(),
        count,
    });

    StationReport {
        popular_start_station: figure(mode(records.iter().map(|r| r.start_station.as_str())))
            .map(str::to_string),
        popular_end_station: figure(mode(records.iter().map(|r| r.end_station.as_str())))
            .map(str::to_string),
        popular_trip: figure(popular_trip),
    }
}
