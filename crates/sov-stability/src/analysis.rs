// analysis.rs — 30-day stability detection over the measurement series.
//
// Starting from the newest score, walk back while each older score stays
// within ±STABILITY_TOLERANCE of it. The length of that unbroken run is
// `stable_days`; stability is reached at STABLE_DAYS_REQUIRED.
//
// Trend is read from the newest ≤ TREND_WINDOW samples of the stable run:
// delta = newest − oldest, "up" above +0.01, "down" below −0.01.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::measurement::StabilityMeasurement;

/// Maximum distance from the current score for a sample to count as stable.
pub const STABILITY_TOLERANCE: f64 = 0.05;

/// Consecutive stable samples needed for stability.
pub const STABLE_DAYS_REQUIRED: usize = 30;

/// Samples considered for trend direction.
pub const TREND_WINDOW: usize = 7;

// Absorbs float rounding so a gap of exactly the tolerance counts as stable.
const TOLERANCE_EPSILON: f64 = 1e-9;

const TREND_DEAD_BAND: f64 = 0.01;
const TREND_FULL_STRENGTH_DELTA: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            TrendDirection::Up => "up",
            TrendDirection::Down => "down",
            TrendDirection::Stable => "stable",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub direction: TrendDirection,
    /// `min(1, |delta| / 0.1)`.
    pub strength: f64,
    pub delta: f64,
}

impl Trend {
    fn flat() -> Self {
        Self {
            direction: TrendDirection::Stable,
            strength: 0.0,
            delta: 0.0,
        }
    }
}

/// Result of analyzing a measurement series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StabilityAnalysis {
    pub is_stable: bool,
    pub stable_days: usize,
    pub required_days: usize,
    /// Newest score, if any measurements exist.
    pub current_score: Option<f64>,
    pub trend: Trend,
    pub total_measurements: usize,
}

impl StabilityAnalysis {
    /// Samples still needed before stability can be declared.
    pub fn days_remaining(&self) -> usize {
        self.required_days.saturating_sub(self.stable_days)
    }
}

fn within_tolerance(score: f64, reference: f64) -> bool {
    (score - reference).abs() <= STABILITY_TOLERANCE + TOLERANCE_EPSILON
}

/// Analyze a series given newest first.
pub fn analyze(newest_first: &[StabilityMeasurement]) -> StabilityAnalysis {
    let Some(current) = newest_first.first() else {
        return StabilityAnalysis {
            is_stable: false,
            stable_days: 0,
            required_days: STABLE_DAYS_REQUIRED,
            current_score: None,
            trend: Trend::flat(),
            total_measurements: 0,
        };
    };

    let stable_days = newest_first
        .iter()
        .take_while(|m| within_tolerance(m.score, current.score))
        .count();

    let window = &newest_first[..stable_days.min(TREND_WINDOW)];
    let trend = match (window.first(), window.last()) {
        (Some(newest), Some(oldest)) if window.len() > 1 => {
            let delta = newest.score - oldest.score;
            let direction = if delta > TREND_DEAD_BAND {
                TrendDirection::Up
            } else if delta < -TREND_DEAD_BAND {
                TrendDirection::Down
            } else {
                TrendDirection::Stable
            };
            Trend {
                direction,
                strength: (delta.abs() / TREND_FULL_STRENGTH_DELTA).min(1.0),
                delta,
            }
        }
        _ => Trend::flat(),
    };

    StabilityAnalysis {
        is_stable: stable_days >= STABLE_DAYS_REQUIRED,
        stable_days,
        required_days: STABLE_DAYS_REQUIRED,
        current_score: Some(current.score),
        trend,
        total_measurements: newest_first.len(),
    }
}
