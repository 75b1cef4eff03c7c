//! Session controller: resolve filters, load, report, browse, then offer a restart.
//!
//! The operator and the report renderer are injected as [`Operator`] and
//! [`ReportSink`], so the same session drives the console and the tests.

use anyhow::Result;
use chrono::{Month, Weekday};
use tracing::{error, info};

use crate::error::BikeshareError;
use crate::filter::{City, FilterSpec, TimeMode, resolve};
use crate::loader::DatasetLoader;
use crate::pager::Pager;
use crate::record::{FilteredDataset, TripRecord};
use crate::stats::{BlockReport, StatBlock};

/// Yes/no questions asked during a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Question {
    ShowRawData,
    ShowMoreRawData,
    Restart,
}

/// Source of already-validated operator answers.
pub trait Operator {
    fn choose_city(&mut self) -> Result<City>;
    fn choose_time_mode(&mut self) -> Result<TimeMode>;
    fn choose_month(&mut self) -> Result<Month>;
    fn choose_day(&mut self) -> Result<Weekday>;
    fn confirm(&mut self, question: Question) -> Result<bool>;
}

/// Receives everything a cycle produces.
pub trait ReportSink {
    fn filters(&mut self, spec: &FilterSpec) -> Result<()>;
    fn block(&mut self, report: &BlockReport) -> Result<()>;
    fn page(&mut self, records: &[TripRecord]) -> Result<()>;
    fn cycle_failed(&mut self, error: &BikeshareError) -> Result<()>;
}

#[derive(Debug)]
pub enum Phase {
    Resolving,
    Loaded(FilteredDataset),
    Reporting(FilteredDataset),
    AwaitingRestart,
    Finished,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub cycles: usize,
    pub failed_cycles: usize,
    pub pages_shown: usize,
}

pub struct Session<O, S> {
    loader: DatasetLoader,
    operator: O,
    sink: S,
    summary: SessionSummary,
}

impl<O: Operator, S: ReportSink> Session<O, S> {
    pub fn new(loader: DatasetLoader, operator: O, sink: S) -> Self {
        Self {
            loader,
            operator,
            sink,
            summary: SessionSummary::default(),
        }
    }

    /// Runs cycles until the operator declines to restart.
    ///
    /// # Errors
    ///
    /// Only operator or sink I/O failures end the session early. A city whose
    /// source cannot be read fails that cycle alone.
    pub fn run(mut self) -> Result<(SessionSummary, O, S)> {
        let mut phase = Phase::Resolving;
        while !matches!(phase, Phase::Finished) {
            phase = self.step(phase)?;
        }

        info!(
            cycles = self.summary.cycles,
            failed_cycles = self.summary.failed_cycles,
            "Session finished"
        );
        Ok((self.summary, self.operator, self.sink))
    }

    /// Advances the session by one phase.
    pub fn step(&mut self, phase: Phase) -> Result<Phase> {
        let next = match phase {
            Phase::Resolving => {
                self.summary.cycles += 1;
                let spec = self.resolve_filters()?;
                self.sink.filters(&spec)?;

                match self.loader.load(&spec) {
                    Ok(dataset) => Phase::Loaded(dataset),
                    Err(e) => {
                        error!(error = %e, "Cycle aborted, trip data unavailable");
                        self.summary.failed_cycles += 1;
                        self.sink.cycle_failed(&e)?;
                        Phase::AwaitingRestart
                    }
                }
            }
            Phase::Loaded(dataset) => {
                info!(
                    city = %dataset.city,
                    records = dataset.len(),
                    "Reporting statistics"
                );
                for block in StatBlock::ORDER {
                    self.sink.block(&block.run(&dataset))?;
                }
                Phase::Reporting(dataset)
            }
            Phase::Reporting(dataset) => {
                if self.operator.confirm(Question::ShowRawData)? {
                    self.browse(&dataset)?;
                }
                Phase::AwaitingRestart
            }
            Phase::AwaitingRestart => {
                if self.operator.confirm(Question::Restart)? {
                    Phase::Resolving
                } else {
                    Phase::Finished
                }
            }
            Phase::Finished => Phase::Finished,
        };
        Ok(next)
    }

    fn resolve_filters(&mut self) -> Result<FilterSpec> {
        let city = self.operator.choose_city()?;
        let mode = self.operator.choose_time_mode()?;

        let month = match mode {
            TimeMode::Month => Some(self.operator.choose_month()?),
            _ => None,
        };
        let day = match mode {
            TimeMode::Day => Some(self.operator.choose_day()?),
            _ => None,
        };

        let spec = resolve(city, mode, month, day);
        info!(spec = %spec, ?mode, "Filters resolved");
        Ok(spec)
    }

    fn browse(&mut self, dataset: &FilteredDataset) -> Result<()> {
        let mut pager = Pager::new(&dataset.records);

        self.sink.page(pager.first_page())?;
        self.summary.pages_shown += 1;

        while !pager.is_exhausted() && self.operator.confirm(Question::ShowMoreRawData)? {
            if let Some(page) = pager.next_page() {
                self.sink.page(page)?;
                self.summary.pages_shown += 1;
            }
        }
        Ok(())
    }
}
