use chrono::Weekday;
use serde::Serialize;

use super::utility::mode;
use super::{Figure, figure};
use crate::record::FilteredDataset;

/// Most frequent month, weekday and start hour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeReport {
    pub popular_month: Figure<u32>,
    pub popular_day: Figure<Weekday>,
    pub popular_hour: Figure<u32>,
}

#[tracing::instrument(name = "time_stats", skip_all, fields(records = dataset.len()))]
pub fn time_stats(dataset: &FilteredDataset) -> TimeReport {
    let records = &dataset.records;

    TimeReport {
        popular_month: figure(mode(records.iter().map(|r| r.month))),
        popular_day: figure(mode(records.iter().map(|r| r.day_of_week))),
        popular_hour: figure(mode(records.iter().map(|r| r.hour))),
    }
}
