//! Trip records as read from a city's trip log, and the filtered set built from them.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::RecordError;
use crate::filter::City;

pub const START_TIME: &str = "Start Time";
pub const END_TIME: &str = "End Time";
pub const START_STATION: &str = "Start Station";
pub const END_STATION: &str = "End Station";
pub const TRIP_DURATION: &str = "Trip Duration";
pub const USER_TYPE: &str = "User Type";
pub const GENDER: &str = "Gender";
pub const BIRTH_YEAR: &str = "Birth Year";

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// A single row deserialized from a trip log CSV. Every field may be empty.
#[derive(Debug, Default, Deserialize)]
pub struct RawTrip {
    #[serde(rename = "Start Time")]
    pub start_time: Option<String>,
    #[serde(rename = "End Time")]
    pub end_time: Option<String>,
    #[serde(rename = "Start Station")]
    pub start_station: Option<String>,
    #[serde(rename = "End Station")]
    pub end_station: Option<String>,
    #[serde(rename = "Trip Duration")]
    pub trip_duration: Option<String>,
    #[serde(rename = "User Type")]
    pub user_type: Option<String>,
    #[serde(rename = "Gender")]
    pub gender: Option<String>,
    #[serde(rename = "Birth Year")]
    pub birth_year: Option<String>,
}

/// One trip with its calendar fields derived from `start_time`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRecord {
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub start_station: String,
    pub end_station: String,
    /// Seconds.
    pub trip_duration: f64,
    pub user_type: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<i32>,

    pub month: u32,
    pub day_of_week: Weekday,
    pub hour: u32,
}

impl TripRecord {
    pub fn new(
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
        start_station: impl Into<String>,
        end_station: impl Into<String>,
        trip_duration: f64,
    ) -> Self {
        TripRecord {
            start_time,
            end_time,
            start_station: start_station.into(),
            end_station: end_station.into(),
            trip_duration,
            user_type: None,
            gender: None,
            birth_year: None,
            month: start_time.month(),
            day_of_week: start_time.weekday(),
            hour: start_time.hour(),
        }
    }

    pub fn with_demographics(
        mut self,
        user_type: Option<&str>,
        gender: Option<&str>,
        birth_year: Option<i32>,
    ) -> Self {
        self.user_type = user_type.map(str::to_string);
        self.gender = gender.map(str::to_string);
        self.birth_year = birth_year;
        self
    }
}

impl TryFrom<RawTrip> for TripRecord {
    type Error = RecordError;

    fn try_from(raw: RawTrip) -> Result<Self, Self::Error> {
        // Timestamp first: a bad date is a format problem even when other fields are empty.
        let start_time = parse_timestamp(required(raw.start_time, START_TIME)?)?;
        let end_time = parse_timestamp(required(raw.end_time, END_TIME)?)?;
        let start_station = required(raw.start_station, START_STATION)?;
        let end_station = required(raw.end_station, END_STATION)?;
        let trip_duration = parse_duration(&required(raw.trip_duration, TRIP_DURATION)?)?;

        let record = TripRecord::new(
            start_time,
            end_time,
            start_station,
            end_station,
            trip_duration,
        );

        Ok(TripRecord {
            user_type: non_blank(raw.user_type),
            gender: non_blank(raw.gender),
            birth_year: non_blank(raw.birth_year).and_then(|y| parse_birth_year(&y)),
            ..record
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(value: Option<String>, field: &'static str) -> Result<String, RecordError> {
    non_blank(value).ok_or(RecordError::MissingField(field))
}

pub fn parse_timestamp(text: String) -> Result<NaiveDateTime, RecordError> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&text, fmt).ok())
        .ok_or(RecordError::InvalidTimestamp(text))
}

fn parse_duration(text: &str) -> Result<f64, RecordError> {
    match text.parse::<f64>() {
        Ok(secs) if secs.is_finite() && secs >= 0.0 => Ok(secs),
        _ => Err(RecordError::InvalidDuration(text.to_string())),
    }
}

// Birth years come through as "1992" or "1992.0".
fn parse_birth_year(text: &str) -> Option<i32> {
    text.parse::<i32>()
        .ok()
        .or_else(|| {
            text.parse::<f64>()
                .ok()
                .filter(|y| y.is_finite())
                .map(|y| y.trunc() as i32)
        })
}

/// Which optional demographic columns a trip log carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Columns {
    pub user_type: bool,
    pub gender: bool,
    pub birth_year: bool,
}

impl Columns {
    pub fn all() -> Self {
        Columns {
            user_type: true,
            gender: true,
            birth_year: true,
        }
    }

    pub fn from_headers(headers: &csv::StringRecord) -> Self {
        let has = |name: &str| headers.iter().any(|h| h.trim() == name);
        Columns {
            user_type: has(USER_TYPE),
            gender: has(GENDER),
            birth_year: has(BIRTH_YEAR),
        }
    }
}

/// Trips that survived loading, in source order.
#[derive(Debug, Clone)]
pub struct FilteredDataset {
    pub city: City,
    pub columns: Columns,
    pub records: Vec<TripRecord>,
}

impl FilteredDataset {
    pub fn new(city: City, columns: Columns, records: Vec<TripRecord>) -> Self {
        Self {
            city,
            columns,
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn raw(start: &str, duration: &str) -> RawTrip {
        RawTrip {
            start_time: Some(start.to_string()),
            end_time: Some("2017-06-23 15:24:54".to_string()),
            start_station: Some("Wood St & Hubbard St".to_string()),
            end_station: Some("Damen Ave & Chicago Ave".to_string()),
            trip_duration: Some(duration.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_derives_calendar_fields() {
        let record = TripRecord::try_from(raw("2017-06-23 15:09:32", "321")).unwrap();
        assert_eq!(record.month, 6);
        assert_eq!(record.day_of_week, Weekday::Fri);
        assert_eq!(record.hour, 15);
        assert_eq!(record.trip_duration, 321.0);
    }

    #[test]
    fn test_accepts_fractional_seconds_and_iso_separator() {
        let a = TripRecord::try_from(raw("2017-03-01 07:05:01.250", "1")).unwrap();
        let b = TripRecord::try_from(raw("2017-03-01T07:05:01", "1")).unwrap();
        assert_eq!(a.hour, 7);
        assert_eq!(b.start_time.date(), NaiveDate::from_ymd_opt(2017, 3, 1).unwrap());
    }

    #[test]
    fn test_bad_timestamp_is_format_error() {
        let err = TripRecord::try_from(raw("yesterday", "321")).unwrap_err();
        assert_eq!(err, RecordError::InvalidTimestamp("yesterday".into()));
    }

    #[test]
    fn test_missing_required_field() {
        let mut r = raw("2017-06-23 15:09:32", "321");
        r.end_station = Some("   ".to_string());
        let err = TripRecord::try_from(r).unwrap_err();
        assert_eq!(err, RecordError::MissingField(END_STATION));
    }

    #[test]
    fn test_negative_duration_rejected() {
        let err = TripRecord::try_from(raw("2017-06-23 15:09:32", "-5")).unwrap_err();
        assert!(err.is_format_error());
    }

    #[test]
    fn test_optional_fields_never_reject() {
        let mut r = raw("2017-01-02 00:00:01", "1144.2");
        r.user_type = Some("Subscriber".into());
        r.birth_year = Some("1992.0".into());
        r.gender = None;
        let record = TripRecord::try_from(r).unwrap();
        assert_eq!(record.user_type.as_deref(), Some("Subscriber"));
        assert_eq!(record.birth_year, Some(1992));
        assert_eq!(record.gender, None);
        assert_eq!(record.trip_duration, 1144.2);
    }

    #[test]
    fn test_unparsable_birth_year_is_absent() {
        let mut r = raw("2017-01-02 00:00:01", "10");
        r.birth_year = Some("unknown".into());
        assert_eq!(TripRecord::try_from(r).unwrap().birth_year, None);
    }

    #[test]
    fn test_non_finite_birth_year_is_absent() {
        for text in ["nan", "NaN", "inf", "-inf", "infinity"] {
            let mut r = raw("2017-01-02 00:00:01", "10");
            r.birth_year = Some(text.into());
            assert_eq!(TripRecord::try_from(r).unwrap().birth_year, None, "{text}");
        }
    }

    #[test]
    fn test_columns_from_headers() {
        let headers = csv::StringRecord::from(vec![
            "",
            "Start Time",
            "End Time",
            "Trip Duration",
            "Start Station",
            "End Station",
            "User Type",
        ]);
        let columns = Columns::from_headers(&headers);
        assert!(columns.user_type);
        assert!(!columns.gender);
        assert!(!columns.birth_year);
    }
}
