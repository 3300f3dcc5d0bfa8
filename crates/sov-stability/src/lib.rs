//! # sov-stability
//!
//! Long-horizon stability monitoring for sovereignty scores.
//!
//! A scheduler records one [`StabilityMeasurement`] per interval (daily).
//! [`StabilityMonitor::check_stability`] walks the series back from the
//! newest sample; once 30 consecutive samples sit within ±0.05 of the current
//! score it records a [`StabilityMilestone`], at most once per 30 days, and
//! runs the optional artifact and notification hooks.

pub mod analysis;
pub mod error;
pub mod history;
pub mod measurement;
pub mod milestone;
pub mod monitor;
pub mod report;

pub use analysis::{
    analyze, StabilityAnalysis, Trend, TrendDirection, STABILITY_TOLERANCE, STABLE_DAYS_REQUIRED,
    TREND_WINDOW,
};
pub use error::StabilityError;
pub use history::MeasurementHistory;
pub use measurement::StabilityMeasurement;
pub use milestone::{MilestoneStore, StabilityMilestone, MILESTONE_DEDUP_DAYS};
pub use monitor::{CheckOutcome, MilestoneHook, StabilityCheck, StabilityMonitor};
pub use report::{export_csv, history_report, REPORT_WINDOW};
