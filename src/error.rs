//! Error types shared by the loader, the statistics suite and the session.
//!
//! Only [`BikeshareError`] ever aborts anything, and only the current cycle.
//! [`RecordError`] drops a single row and [`Unavailable`] replaces a single
//! statistic figure.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

use crate::filter::City;

#[derive(Error, Debug)]
pub enum BikeshareError {
    #[error("no record source configured for {city}")]
    NoSourceConfigured { city: City },

    #[error("record source for {city} at {} is unavailable: {source}", .path.display())]
    SourceUnavailable {
        city: City,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("record source for {city} has an unreadable header: {source}")]
    BadHeader {
        city: City,
        #[source]
        source: csv::Error,
    },

    #[error("invalid source configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type BikeshareResult<T> = Result<T, BikeshareError>;

/// Why a single source row did not make it into a dataset.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("cannot parse timestamp {0:?}")]
    InvalidTimestamp(String),

    #[error("cannot parse trip duration {0:?}")]
    InvalidDuration(String),
}

impl RecordError {
    /// Malformed data, as opposed to a simply absent value.
    pub fn is_format_error(&self) -> bool {
        !matches!(self, RecordError::MissingField(_))
    }
}

/// Reason a statistic figure could not be produced.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum Unavailable {
    #[error("no data")]
    NoData,

    #[error("column `{0}` is unavailable for this dataset")]
    MissingColumn(&'static str),

    #[error("undefined (division by zero standard deviation)")]
    DivisionUndefined,
}
