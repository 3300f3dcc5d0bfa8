// Thirty daily checks against a steady score: stability is reached on the
// thirtieth sample, and a second trigger inside the window is deduplicated.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use sov_score::calculate_from_units;
use sov_stability::{
    CheckOutcome, StabilityAnalysis, StabilityError, StabilityMeasurement, StabilityMilestone,
    StabilityMonitor,
};
use tempfile::tempdir;

fn counting_hook(
    counter: &Arc<AtomicUsize>,
) -> impl Fn(&StabilityMilestone, &StabilityAnalysis) -> Result<(), StabilityError> + Send + 'static
{
    let counter = Arc::clone(counter);
    move |_: &StabilityMilestone, _: &StabilityAnalysis| -> Result<(), StabilityError> {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[test]
fn stability_on_day_thirty_not_twenty_nine() {
    let dir = tempdir().unwrap();
    let notified = Arc::new(AtomicUsize::new(0));
    let monitor = StabilityMonitor::new(
        dir.path().join("stability-history.jsonl"),
        dir.path().join("milestones.json"),
    )
    .with_notify_hook(counting_hook(&notified));

    let start = Utc.with_ymd_and_hms(2026, 1, 1, 6, 0, 0).unwrap();
    let base = calculate_from_units(800, 0);

    for day in 0..29 {
        // Jitter stays inside the ±0.05 band.
        let score = base.score + if day % 2 == 0 { 0.02 } else { -0.02 };
        let at = start + Duration::days(day);
        let m = StabilityMeasurement {
            score,
            ..StabilityMeasurement::from_calculation(&base, "daily-check").at(at)
        };
        monitor.record_measurement(&m).unwrap();
        let check = monitor.check_stability_at(at).unwrap();
        assert_eq!(check.outcome, CheckOutcome::NotStable, "day {}", day + 1);
    }
    assert_eq!(monitor.analyze_stability().unwrap().stable_days, 29);

    let day30 = start + Duration::days(29);
    monitor
        .record_measurement(&StabilityMeasurement::from_calculation(&base, "daily-check").at(day30))
        .unwrap();
    let check = monitor.check_stability_at(day30).unwrap();
    let milestone = check.created_milestone().expect("milestone on day 30");
    assert_eq!(milestone.stable_days, 30);
    assert!(milestone.notification_sent);
    assert!(!milestone.artifact_generated);
    assert_eq!(notified.load(Ordering::SeqCst), 1);
}

#[test]
fn two_triggers_within_thirty_days_make_one_milestone() {
    let dir = tempdir().unwrap();
    let artifacts = Arc::new(AtomicUsize::new(0));
    let monitor = StabilityMonitor::new(
        dir.path().join("stability-history.jsonl"),
        dir.path().join("milestones.json"),
    )
    .with_artifact_hook(counting_hook(&artifacts));

    let start = Utc.with_ymd_and_hms(2026, 1, 1, 6, 0, 0).unwrap();
    let calc = calculate_from_units(400, 0);
    for day in 0..45 {
        let at = start + Duration::days(day);
        let measurement = StabilityMeasurement::from_calculation(&calc, "daily-check").at(at);
        monitor.record_measurement(&measurement).unwrap();
        monitor.check_stability_at(at).unwrap();
    }

    // Stable from day 30 through day 45, yet only one milestone.
    let milestones = monitor.milestones().load().unwrap();
    assert_eq!(milestones.len(), 1);
    assert_eq!(milestones[0].achieved_at, start + Duration::days(29));
    assert_eq!(artifacts.load(Ordering::SeqCst), 1);

    // Once the window has passed, the next trigger creates a second one.
    let later = start + Duration::days(59);
    monitor
        .record_measurement(&StabilityMeasurement::from_calculation(&calc, "daily-check").at(later))
        .unwrap();
    let check = monitor.check_stability_at(later).unwrap();
    assert!(matches!(check.outcome, CheckOutcome::MilestoneCreated { .. }));
    assert_eq!(monitor.milestones().load().unwrap().len(), 2);
}

#[test]
fn repeated_checks_are_idempotent() {
    let dir = tempdir().unwrap();
    let monitor = StabilityMonitor::new(
        dir.path().join("stability-history.jsonl"),
        dir.path().join("milestones.json"),
    );
    let now = Utc::now();
    let calc = calculate_from_units(0, 0);
    for day in 0..30 {
        monitor
            .record_measurement(
                &StabilityMeasurement::from_calculation(&calc, "daily-check")
                    .at(now - Duration::days(day)),
            )
            .unwrap();
    }

    let first = monitor.check_stability_at(now).unwrap();
    let second = monitor.check_stability_at(now).unwrap();
    assert!(first.created_milestone().is_some());
    assert_eq!(second.analysis, first.analysis);
    assert!(matches!(second.outcome, CheckOutcome::AlreadyRecorded { .. }));
}
