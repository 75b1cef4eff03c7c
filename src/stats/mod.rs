//! Descriptive statistics over a filtered trip dataset.
//!
//! Four independent blocks (time of travel, stations, durations, users) each
//! read the dataset and produce their own report. A figure that cannot be
//! computed is reported as [`Unavailable`] inside its block; nothing a block
//! finds wrong stops the other blocks from running.

pub mod duration;
pub mod station;
pub mod time;
pub mod users;
pub mod utility;

use serde::Serialize;

use crate::error::Unavailable;
use crate::record::FilteredDataset;

pub use duration::{DurationReport, duration_stats};
pub use station::{PopularTrip, StationReport, station_stats};
pub use time::{TimeReport, time_stats};
pub use users::{BirthYears, UserReport, ValueCount, user_stats};

/// Outcome of a single statistic figure.
pub type Figure<T> = Result<T, Unavailable>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatBlock {
    Time,
    Station,
    Duration,
    User,
}

impl StatBlock {
    /// The order blocks are computed and reported in.
    pub const ORDER: [StatBlock; 4] = [
        StatBlock::Time,
        StatBlock::Station,
        StatBlock::Duration,
        StatBlock::User,
    ];

    pub fn title(self) -> &'static str {
        match self {
            StatBlock::Time => "The Most Frequent Times of Travel",
            StatBlock::Station => "The Most Popular Stations and Trip",
            StatBlock::Duration => "Trip Duration",
            StatBlock::User => "User Stats",
        }
    }

    pub fn run(self, dataset: &FilteredDataset) -> BlockReport {
        match self {
            StatBlock::Time => BlockReport::Time(time_stats(dataset)),
            StatBlock::Station => BlockReport::Station(station_stats(dataset)),
            StatBlock::Duration => BlockReport::Duration(duration_stats(dataset)),
            StatBlock::User => BlockReport::User(user_stats(dataset)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "block", rename_all = "snake_case")]
pub enum BlockReport {
    Time(TimeReport),
    Station(StationReport),
    Duration(DurationReport),
    User(UserReport),
}

impl BlockReport {
    pub fn block(&self) -> StatBlock {
        match self {
            BlockReport::Time(_) => StatBlock::Time,
            BlockReport::Station(_) => StatBlock::Station,
            BlockReport::Duration(_) => StatBlock::Duration,
            BlockReport::User(_) => StatBlock::User,
        }
    }
}

/// Runs every block over `dataset` in [`StatBlock::ORDER`].
pub fn run_suite(dataset: &FilteredDataset) -> Vec<BlockReport> {
    StatBlock::ORDER
        .into_iter()
        .map(|block| block.run(dataset))
        .collect()
}

pub(crate) fn figure<T>(value: Option<T>) -> Figure<T> {
    value.ok_or(Unavailable::NoData)
}


#[cfg(test)]
mod tests {
    use super::fixtures::{dataset, trip};
    use super::*;
    use crate::record::Columns;

    #[test]
    fn test_suite_runs_blocks_in_order() {
        let ds = dataset(vec![trip("2017-01-02 08:00:00", "A", "B", 60.0)]);
        let blocks: Vec<StatBlock> = run_suite(&ds).iter().map(BlockReport::block).collect();
        assert_eq!(blocks, StatBlock::ORDER.to_vec());
    }

    #[test]
    fn test_suite_survives_empty_dataset_without_columns() {
        let mut ds = dataset(vec![]);
        ds.columns = Columns::default();
        let reports = run_suite(&ds);

        assert_eq!(reports.len(), 4);
        match &reports[0] {
            BlockReport::Time(t) => assert_eq!(t.popular_month, Err(Unavailable::NoData)),
            other => panic!("unexpected block {other:?}"),
        }
    }

    #[test]
    fn test_block_report_json_is_tagged() {
        let ds = dataset(vec![trip("2017-01-02 08:00:00", "A", "B", 60.0)]);
        let json = serde_json::to_value(StatBlock::Station.run(&ds)).unwrap();
        assert_eq!(json["block"], "station");
    }
}
