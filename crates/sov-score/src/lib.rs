//! # sov-score
//!
//! Sovereignty calculation for the sovereignty engine.
//!
//! Converts a trust-debt measurement (total units plus per-category grades)
//! into a [0, 1] sovereignty score, decays it for recorded drift events, and
//! maps units to letter [`Grade`]s.
//!
//! ```rust
//! use sov_score::{calculate_from_units, Grade};
//!
//! let calc = calculate_from_units(0, 100);
//! assert_eq!(calc.grade, Grade::A);
//! assert!((calc.score - 0.741).abs() < 0.001);
//! ```

pub mod calculator;
pub mod error;
pub mod grade;
pub mod recovery;
pub mod scores;

pub use calculator::{
    apply_drift_reduction, calculate, calculate_from_units, raw_sovereignty, units_to_grade,
    SovereigntyCalculation, K_E, MAX_UNITS,
};
pub use error::ScoreError;
pub use grade::Grade;
pub use recovery::{recovery_path, RecoveryStep};
pub use scores::{extract_category_scores, CategoryDebt, TrustDebtReport};
