use serde::Serialize;

use super::utility::{mode, value_counts};
use super::{Figure, figure};
use crate::error::Unavailable;
use crate::record::{BIRTH_YEAR, FilteredDataset, GENDER, USER_TYPE};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BirthYears {
    pub earliest: i32,
    pub most_recent: i32,
    pub most_common: i32,
}

/// Demographics. Each group is independently unavailable when the city's
/// trip log has no such column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserReport {
    pub user_types: Figure<Vec<ValueCount>>,
    pub genders: Figure<Vec<ValueCount>>,
    pub birth_years: Figure<BirthYears>,
}

#[tracing::instrument(name = "user_stats", skip_all, fields(records = dataset.len()))]
pub fn user_stats(dataset: &FilteredDataset) -> UserReport {
    let records = &dataset.records;
    let columns = dataset.columns;

    let user_types = present(columns.user_type, USER_TYPE)
        .map(|_| counts(records.iter().filter_map(|r| r.user_type.as_deref())));

    let genders = present(columns.gender, GENDER)
        .map(|_| counts(records.iter().filter_map(|r| r.gender.as_deref())));

    let birth_years = present(columns.birth_year, BIRTH_YEAR).and_then(|_| {
        let years: Vec<i32> = records.iter().filter_map(|r| r.birth_year).collect();
        Ok(BirthYears {
            earliest: figure(years.iter().min().copied())?,
            most_recent: figure(years.iter().max().copied())?,
            most_common: figure(mode(years.iter().copied()))?,
        })
    });

    UserReport {
        user_types,
        genders,
        birth_years,
    }
}

fn present(has_column: bool, column: &'static str) -> Figure<()> {
    if has_column {
        Ok(())
    } else {
        Err(Unavailable::MissingColumn(column))
    }
}

fn counts<'a>(values: impl Iterator<Item = &'a str>) -> Vec<ValueCount> {
    value_counts(values)
        .into_iter()
        .map(|(value, count)| ValueCount {
            value: value.to_string(),
            count,
        })
        .collect()
}
