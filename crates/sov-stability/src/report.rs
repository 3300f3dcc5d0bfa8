// report.rs — Read-only reporting over the measurement history.

use std::fmt::Write as _;
use std::io;

use serde::Serialize;

use crate::analysis::{analyze, StabilityAnalysis};
use crate::error::StabilityError;
use crate::measurement::StabilityMeasurement;

/// Default number of most recent samples shown in the history report.
pub const REPORT_WINDOW: usize = 30;

/// Render a rolling text report of the newest `window` samples.
///
/// `newest_first` is the full series; the stability summary is computed over
/// all of it, while only the window is listed.
pub fn history_report(newest_first: &[StabilityMeasurement], window: usize) -> String {
    let analysis = analyze(newest_first);
    let mut out = String::new();

    let _ = writeln!(out, "Sovereignty stability report");
    let _ = writeln!(out, "============================");
    summarize(&mut out, &analysis);

    if newest_first.is_empty() {
        let _ = writeln!(out, "\nNo measurements recorded.");
        return out;
    }

    let shown = &newest_first[..window.min(newest_first.len())];
    let _ = writeln!(out, "\nLast {} measurement(s), newest first:", shown.len());
    let _ = writeln!(
        out,
        "{:<20} {:>7} {:>5} {:>8} {:>7}",
        "DATE", "SCORE", "GRADE", "CHANGE", "DRIFT"
    );
    for (i, m) in shown.iter().enumerate() {
        // Change relative to the next older sample, when there is one.
        let change = newest_first
            .get(i + 1)
            .map(|older| format!("{:+.3}", m.score - older.score))
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "{:<20} {:>7.3} {:>5} {:>8} {:>7}",
            m.timestamp.format("%Y-%m-%d %H:%M"),
            m.score,
            m.grade,
            change,
            m.drift_events
        );
    }
    out
}

fn summarize(out: &mut String, analysis: &StabilityAnalysis) {
    match analysis.current_score {
        Some(score) => {
            let _ = writeln!(out, "Current score:  {:.3}", score);
        }
        None => {
            let _ = writeln!(out, "Current score:  n/a");
        }
    }
    let _ = writeln!(
        out,
        "Stable days:    {} / {}{}",
        analysis.stable_days,
        analysis.required_days,
        if analysis.is_stable { " (stable)" } else { "" }
    );
    let _ = writeln!(
        out,
        "Trend:          {} (strength {:.2}, delta {:+.3})",
        analysis.trend.direction, analysis.trend.strength, analysis.trend.delta
    );
    let _ = writeln!(out, "Measurements:   {}", analysis.total_measurements);
}

#[derive(Serialize)]
struct CsvRow<'a> {
    timestamp: String,
    score: f64,
    grade: String,
    trust_debt_units: u64,
    drift_events: u64,
    source: &'a str,
}

/// Write the full series as CSV, oldest first, with a header row.
pub fn export_csv<W: io::Write>(
    oldest_first: &[StabilityMeasurement],
    writer: W,
) -> Result<(), StabilityError> {
    let mut csv = csv::Writer::from_writer(writer);
    for m in oldest_first {
        csv.serialize(CsvRow {
            timestamp: m.timestamp.to_rfc3339(),
            score: m.score,
            grade: m.grade.to_string(),
            trust_debt_units: m.trust_debt_units,
            drift_events: m.drift_events,
            source: &m.source,
        })?;
    }
    csv.flush().map_err(StabilityError::ExportFailed)?;
    Ok(())
}
