// sovereignty.rs — Sovereignty score, grade, and the recovery path.

use serde::Serialize;
use sov_audit::DriftLog;
use sov_interceptor::EngineConfig;
use sov_score::{
    calculate, calculate_from_units, recovery_path, RecoveryStep, SovereigntyCalculation,
    TrustDebtReport,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SovereigntyView {
    calculation: SovereigntyCalculation,
    recovery: Vec<RecoveryStep>,
}

pub fn execute(
    config: &EngineConfig,
    units: Option<u64>,
    drift: Option<u64>,
    json: bool,
) -> anyhow::Result<()> {
    let calculation = match units {
        Some(units) => calculate_from_units(units, drift.unwrap_or(0)),
        None => match TrustDebtReport::load(&config.scores_file)? {
            Some((report, _)) => {
                let drift = match drift {
                    Some(n) => n,
                    None => DriftLog::count_since(&config.drift_log, report.generated_at)?,
                };
                calculate(&report, drift)
            }
            None => {
                println!(
                    "No scores artifact at {}; pass --units to compute directly.",
                    config.scores_file.display()
                );
                return Ok(());
            }
        },
    };
    let recovery = recovery_path(calculation.trust_debt_units, calculation.drift_events);

    if json {
        return super::print_json(&SovereigntyView {
            calculation,
            recovery,
        });
    }

    println!(
        "Sovereignty:  {:.3}  grade {} {}",
        calculation.score,
        calculation.grade,
        calculation.grade.description()
    );
    println!("Trust debt:   {} units", calculation.trust_debt_units);
    println!(
        "Drift:        {} event(s), -{:.3} from raw {:.3}",
        calculation.drift_events, calculation.drift_reduction, calculation.raw_score
    );

    if recovery.is_empty() {
        println!("\nAlready at the best grade.");
        return Ok(());
    }
    println!();
    println!("{:<7} {:>12} {:>10} {:>12}", "TARGET", "REDUCE BY", "SCORE", "GAIN");
    println!("{}", "-".repeat(44));
    for step in &recovery {
        println!(
            "{:<7} {:>12} {:>10.3} {:>+12.3}",
            step.target_grade,
            step.units_reduction,
            step.resulting_sovereignty,
            step.sovereignty_gain
        );
    }
    Ok(())
}
