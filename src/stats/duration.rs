use serde::Serialize;

use super::utility::{mean, population_stddev};
use super::{Figure, figure};
use crate::error::Unavailable;
use crate::record::FilteredDataset;

/// Totals and spread of trip durations, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationReport {
    pub total_seconds: f64,
    pub mean_seconds: Figure<f64>,
    pub std_dev_seconds: Figure<f64>,
    /// Mean of per-trip z-scores. Always close to zero by construction; kept
    /// because it is the figure the report has always shown as "mean travel time".
    pub mean_normalized: Figure<f64>,
}

#[tracing::instrument(name = "duration_stats", skip_all, fields(records = dataset.len()))]
pub fn duration_stats(dataset: &FilteredDataset) -> DurationReport {
    let durations: Vec<f64> = dataset.records.iter().map(|r| r.trip_duration).collect();

    let total_seconds: f64 = durations.iter().sum();

    // Summing identical fractional values drifts the mean by an ulp, which
    // would leave a tiny nonzero spread. Identical durations have none.
    let constant = durations.windows(2).all(|w| w[0] == w[1]);

    let (mean_seconds, std_dev_seconds) = match durations.first() {
        Some(&first) if constant => (Ok(first), Ok(0.0)),
        _ => {
            let mean_seconds = figure(mean(&durations));
            let std_dev_seconds =
                mean_seconds.and_then(|m| figure(population_stddev(&durations, m)));
            (mean_seconds, std_dev_seconds)
        }
    };

    let mean_normalized = match (mean_seconds, std_dev_seconds) {
        (Ok(_), Ok(sd)) if sd == 0.0 => Err(Unavailable::DivisionUndefined),
        (Ok(m), Ok(sd)) => {
            let z_scores: Vec<f64> = durations.iter().map(|d| (d - m) / sd).collect();
            figure(mean(&z_scores))
        }
        (Err(e), _) | (_, Err(e)) => Err(e),
    };

    DurationReport {
        total_seconds,
        mean_seconds,
        std_dev_seconds,
        mean_normalized,
    }
}
