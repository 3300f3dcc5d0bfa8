// measurement.rs — One sovereignty sample in the stability time series.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sov_score::{Grade, SovereigntyCalculation};

/// A single (intended: daily) sovereignty sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StabilityMeasurement {
    pub timestamp: DateTime<Utc>,
    pub score: f64,
    pub grade: Grade,
    pub trust_debt_units: u64,
    pub drift_events: u64,
    /// What produced the sample (e.g. "daily-check", "manual").
    pub source: String,
}

impl StabilityMeasurement {
    /// Sample a calculation, stamped with the calculation's own timestamp.
    pub fn from_calculation(calc: &SovereigntyCalculation, source: impl Into<String>) -> Self {
        Self {
            timestamp: calc.timestamp,
            score: calc.score,
            grade: calc.grade,
            trust_debt_units: calc.trust_debt_units,
            drift_events: calc.drift_events,
            source: source.into(),
        }
    }

    /// Override the timestamp (builder pattern).
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}
