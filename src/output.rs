//! Console rendering of statistic reports and raw record pages.
//!
//! Supports labeled plain text and pretty-printed JSON.

use anyhow::Result;
use std::fmt::Display;
use std::io::Write;
use tracing::debug;

use crate::error::BikeshareError;
use crate::filter::{FilterSpec, day_name};
use crate::record::TripRecord;
use crate::session::ReportSink;
use crate::stats::{BlockReport, Figure, ValueCount};

const RULE: &str = "----------------------------------------";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Text,
    Json,
}

pub struct ConsoleReporter<W> {
    out: W,
    format: Format,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, format: Format) -> Self {
        Self { out, format }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn text_block(&mut self, report: &BlockReport) -> Result<()> {
        let out = &mut self.out;
        writeln!(out, "\nCalculating {}...\n", report.block().title())?;

        match report {
            BlockReport::Time(t) => {
                writeln!(out, "Most Popular Month: {}", show(&t.popular_month, month_name))?;
                writeln!(out, "Most Popular Day: {}", show(&t.popular_day, |d| day_name(*d)))?;
                writeln!(out, "Most Popular Hour: {}", show(&t.popular_hour, |h| *h))?;
            }
            BlockReport::Station(s) => {
                writeln!(
                    out,
                    "Most Popular Start Station: {}",
                    show(&s.popular_start_station, |v| v.clone())
                )?;
                writeln!(
                    out,
                    "Most Popular End Station: {}",
                    show(&s.popular_end_station, |v| v.clone())
                )?;
                writeln!(
                    out,
                    "Most Popular Start and End Station: {}",
                    show(&s.popular_trip, |t| format!(
                        "{} -> {} ({} trips)",
                        t.start_station, t.end_station, t.count
                    ))
                )?;
            }
            BlockReport::Duration(d) => {
                writeln!(out, "Total Travel Time: {} seconds", d.total_seconds)?;
                writeln!(
                    out,
                    "Average Travel Time: {}",
                    show(&d.mean_seconds, |m| format!("{m:.2} seconds"))
                )?;
                writeln!(
                    out,
                    "Travel Time Std Dev: {}",
                    show(&d.std_dev_seconds, |s| format!("{s:.2} seconds"))
                )?;
                writeln!(out, "Mean Travel Time: {}", show(&d.mean_normalized, |z| *z))?;
            }
            BlockReport::User(u) => {
                write_counts(out, "User Types", &u.user_types)?;
                write_counts(out, "Genders", &u.genders)?;
                match &u.birth_years {
                    Ok(years) => {
                        writeln!(out, "Earliest Birth Year: {}", years.earliest)?;
                        writeln!(out, "Latest Birth Year: {}", years.most_recent)?;
                        writeln!(out, "Most Common Birth Year: {}", years.most_common)?;
                    }
                    Err(reason) => writeln!(out, "Birth Years: {reason}")?,
                }
            }
        }

        writeln!(out, "{RULE}")?;
        Ok(())
    }

    fn text_page(&mut self, records: &[TripRecord]) -> Result<()> {
        if records.is_empty() {
            writeln!(self.out, "(no matching trips)")?;
            return Ok(());
        }
        for r in records {
            writeln!(
                self.out,
                "{} | {} | {:>8} s | {} -> {} | {} | {} | {}",
                r.start_time,
                r.end_time,
                r.trip_duration,
                r.start_station,
                r.end_station,
                r.user_type.as_deref().unwrap_or("-"),
                r.gender.as_deref().unwrap_or("-"),
                r.birth_year.map_or_else(|| "-".to_string(), |y| y.to_string()),
            )?;
        }
        Ok(())
    }
}

impl<W: Write> ReportSink for ConsoleReporter<W> {
    fn filters(&mut self, spec: &FilterSpec) -> Result<()> {
        if self.format == Format::Text {
            writeln!(self.out, "Exploring {spec}")?;
            writeln!(self.out, "{RULE}")?;
        }
        Ok(())
    }

    fn block(&mut self, report: &BlockReport) -> Result<()> {
        debug!("{:#?}", report);
        match self.format {
            Format::Text => self.text_block(report),
            Format::Json => {
                writeln!(self.out, "{}", serde_json::to_string_pretty(report)?)?;
                Ok(())
            }
        }
    }

    fn page(&mut self, records: &[TripRecord]) -> Result<()> {
        match self.format {
            Format::Text => self.text_page(records),
            Format::Json => {
                writeln!(self.out, "{}", serde_json::to_string_pretty(records)?)?;
                Ok(())
            }
        }
    }

    fn cycle_failed(&mut self, error: &BikeshareError) -> Result<()> {
        writeln!(self.out, "Could not load trip data: {error}")?;
        writeln!(self.out, "{RULE}")?;
        Ok(())
    }
}

fn show<T, D: Display>(figure: &Figure<T>, render: impl Fn(&T) -> D) -> String {
    match figure {
        Ok(value) => render(value).to_string(),
        Err(reason) => reason.to_string(),
    }
}

fn month_name(month: &u32) -> String {
    u8::try_from(*month)
        .ok()
        .and_then(|m| chrono::Month::try_from(m).ok())
        .map_or_else(|| month.to_string(), |m| m.name().to_string())
}

fn write_counts<W: Write>(
    out: &mut W,
    label: &str,
    counts: &Figure<Vec<ValueCount>>,
) -> Result<()> {
    match counts {
        Ok(counts) => {
            writeln!(out, "{label}:")?;
            for c in counts {
                writeln!(out, "  {}: {}", c.value, c.count)?;
            }
        }
        Err(reason) => writeln!(out, "{label}: {reason}")?,
    }
    Ok(())
}
