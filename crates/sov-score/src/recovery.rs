// recovery.rs — Forecast the path back to a better grade.
//
// Pure: given where an agent stands (units + drift events), list how many
// units it must shed to reach each better grade and what sovereignty it
// would have there. Drift events are held constant, since they only clear
// on recalibration.

use serde::{Deserialize, Serialize};

use crate::calculator::{apply_drift_reduction, raw_sovereignty};
use crate::grade::Grade;

/// One rung on the recovery ladder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryStep {
    pub target_grade: Grade,
    /// Upper unit bound of the target grade.
    pub target_units: u64,
    pub units_reduction: u64,
    pub resulting_sovereignty: f64,
    pub sovereignty_gain: f64,
}

/// Recovery steps toward every grade better than the current one, nearest first.
pub fn recovery_path(units: u64, drift_events: u64) -> Vec<RecoveryStep> {
    let current_score = apply_drift_reduction(raw_sovereignty(units), drift_events);
    Grade::from_units(units)
        .better_grades()
        .into_iter()
        .filter_map(|grade| {
            let (_, upper) = grade.unit_range();
            let target_units = upper?;
            let resulting = apply_drift_reduction(raw_sovereignty(target_units), drift_events);
            Some(RecoveryStep {
                target_grade: grade,
                target_units,
                units_reduction: units.saturating_sub(target_units),
                resulting_sovereignty: resulting,
                sovereignty_gain: resulting - current_score,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_a_has_no_recovery_steps() {
        assert!(recovery_path(120, 0).is_empty());
    }

    #[test]
    fn grade_d_lists_c_b_a() {
        let path = recovery_path(3600, 0);
        let grades: Vec<Grade> = path.iter().map(|s| s.target_grade).collect();
        assert_eq!(grades, vec![Grade::C, Grade::B, Grade::A]);
        assert_eq!(path[0].units_reduction, 600);
        assert_eq!(path[1].units_reduction, 2100);
        assert_eq!(path[2].units_reduction, 3100);
        // Reaching C's upper bound (3000) still yields zero sovereignty.
        assert_eq!(path[0].resulting_sovereignty, 0.0);
        assert!((path[2].resulting_sovereignty - (1.0 - 500.0 / 3000.0)).abs() < 1e-12);
    }

    #[test]
    fn gains_account_for_drift() {
        let path = recovery_path(2000, 50);
        let to_a = path.last().unwrap();
        let decay = 0.997f64.powi(50);
        let expected_gain = (1.0 - 500.0 / 3000.0) * decay - (1.0 - 2000.0 / 3000.0) * decay;
        assert!((to_a.sovereignty_gain - expected_gain).abs() < 1e-12);
        assert!(path.iter().all(|s| s.sovereignty_gain > 0.0));
    }
}
