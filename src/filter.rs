//! Filter selection: which city to load and how to narrow it by month or day.

use chrono::{Month, Weekday};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Months the trip logs cover. Month filters only ever offer these.
pub const OFFERED_MONTHS: [Month; 6] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
];

pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum City {
    Chicago,
    NewYork,
    Washington,
}

impl City {
    pub const ALL: [City; 3] = [City::Chicago, City::NewYork, City::Washington];

    pub fn name(self) -> &'static str {
        match self {
            City::Chicago => "chicago",
            City::NewYork => "new york",
            City::Washington => "washington",
        }
    }

    /// File name of the city's trip log in the default layout.
    pub fn default_file(self) -> &'static str {
        match self {
            City::Chicago => "chicago.csv",
            City::NewYork => "new_york_city.csv",
            City::Washington => "washington.csv",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for City {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        City::ALL
            .into_iter()
            .find(|c| c.name() == normalized)
            .ok_or_else(|| format!("unknown city: {s}"))
    }
}

/// How the operator chose to narrow the data in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeMode {
    Month,
    Day,
    /// Offered as "both", but narrows nothing. Same behavior as `None`.
    All,
    None,
}

impl FromStr for TimeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "month" => Ok(TimeMode::Month),
            "day" => Ok(TimeMode::Day),
            "all" => Ok(TimeMode::All),
            "none" => Ok(TimeMode::None),
            other => Err(format!("unknown time filter: {other}")),
        }
    }
}

/// Either no restriction or exactly one admitted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter<T> {
    All,
    Only(T),
}

impl<T: PartialEq> Filter<T> {
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(wanted) => wanted == value,
        }
    }
}

impl<T> From<Option<T>> for Filter<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Filter::All, Filter::Only)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterSpec {
    pub city: City,
    pub month: Filter<Month>,
    pub day: Filter<Weekday>,
}

impl FilterSpec {
    pub fn unfiltered(city: City) -> Self {
        Self {
            city,
            month: Filter::All,
            day: Filter::All,
        }
    }

    /// Whether a trip starting in `month` (1-12) on `day` passes this filter.
    pub fn admits(&self, month: u32, day: Weekday) -> bool {
        let month_ok = match self.month {
            Filter::All => true,
            Filter::Only(wanted) => wanted.number_from_month() == month,
        };
        month_ok && self.day.admits(&day)
    }
}

impl fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.city)?;
        if let Filter::Only(month) = self.month {
            write!(f, ", month={}", month.name())?;
        }
        if let Filter::Only(day) = self.day {
            write!(f, ", day={}", day_name(day))?;
        }
        Ok(())
    }
}

/// Turns the operator's validated answers into a [`FilterSpec`].
///
/// Month and day answers are only consulted for the mode that asks for them.
/// `All` and `None` both leave month and day unrestricted.
pub fn resolve(
    city: City,
    mode: TimeMode,
    month: Option<Month>,
    day: Option<Weekday>,
) -> FilterSpec {
    match mode {
        TimeMode::Month => FilterSpec {
            city,
            month: month.into(),
            day: Filter::All,
        },
        TimeMode::Day => FilterSpec {
            city,
            month: Filter::All,
            day: day.into(),
        },
        TimeMode::All | TimeMode::None => FilterSpec::unfiltered(city),
    }
}

/// Parses a full month name, accepting only [`OFFERED_MONTHS`].
pub fn parse_month(answer: &str) -> Option<Month> {
    let answer = answer.trim().to_lowercase();
    OFFERED_MONTHS
        .into_iter()
        .find(|m| m.name().to_lowercase() == answer)
}

/// Parses a full weekday name.
pub fn parse_day(answer: &str) -> Option<Weekday> {
    let answer = answer.trim().to_lowercase();
    WEEKDAYS
        .into_iter()
        .find(|d| day_name(*d).to_lowercase() == answer)
}

pub fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
