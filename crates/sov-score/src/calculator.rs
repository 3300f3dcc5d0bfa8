// calculator.rs — Trust-debt units → sovereignty, with drift decay.
//
//   raw   = clamp(1 − units / MAX_UNITS, 0, 1)
//   score = raw × (1 − K_E) ^ drift_events
//
// MAX_UNITS is the top of grade C, so anything graded D has zero raw
// sovereignty. Each drift event multiplies the score by 0.997 until the
// next recalibration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sov_vector::CategoryVector;

use crate::grade::Grade;
use crate::scores::TrustDebtReport;

/// Units at which raw sovereignty reaches zero.
pub const MAX_UNITS: u64 = 3000;

/// Per-event drift decay constant.
pub const K_E: f64 = 0.003;

/// Raw sovereignty before drift decay. 0 units → 1.0, ≥ MAX_UNITS → 0.0.
pub fn raw_sovereignty(units: u64) -> f64 {
    (1.0 - units as f64 / MAX_UNITS as f64).clamp(0.0, 1.0)
}

/// Apply `drift_events` rounds of `(1 − K_E)` decay, clamped to [0, 1].
pub fn apply_drift_reduction(raw: f64, drift_events: u64) -> f64 {
    let exponent = i32::try_from(drift_events).unwrap_or(i32::MAX);
    (raw * (1.0 - K_E).powi(exponent)).clamp(0.0, 1.0)
}

/// Grade for a unit count. See [`Grade::from_units`].
pub fn units_to_grade(units: u64) -> Grade {
    Grade::from_units(units)
}

/// One computed sovereignty snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SovereigntyCalculation {
    pub score: f64,
    pub grade: Grade,
    pub trust_debt_units: u64,
    pub drift_events: u64,
    /// Score before drift decay.
    pub raw_score: f64,
    /// `raw_score - score`.
    pub drift_reduction: f64,
    pub category_scores: CategoryVector,
    pub timestamp: DateTime<Utc>,
}

/// Compute sovereignty from a bare unit count (no category breakdown).
pub fn calculate_from_units(units: u64, drift_events: u64) -> SovereigntyCalculation {
    build(units, drift_events, CategoryVector::zero())
}

/// Compute sovereignty from a full trust-debt report.
pub fn calculate(report: &TrustDebtReport, drift_events: u64) -> SovereigntyCalculation {
    build(report.total_units, drift_events, report.category_scores())
}

fn build(units: u64, drift_events: u64, category_scores: CategoryVector) -> SovereigntyCalculation {
    let raw_score = raw_sovereignty(units);
    let score = apply_drift_reduction(raw_score, drift_events);
    SovereigntyCalculation {
        score,
        grade: units_to_grade(units),
        trust_debt_units: units,
        drift_events,
        raw_score,
        drift_reduction: raw_score - score,
        category_scores,
        timestamp: Utc::now(),
    }
}
