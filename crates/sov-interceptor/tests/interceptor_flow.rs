// End-to-end interceptor flows against real files in a temp `.sov/` layout.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{Duration, Utc};
use sov_audit::{query_file, AuditFilter, Decision, DriftLog, FailOpenLog};
use sov_interceptor::{
    DenialNotice, DriftNotice, EngineConfig, HeatMap, HeatState, Interceptor, InterceptorBuilder,
    InterceptorError, InterceptorSettings, Verdict,
};
use sov_policy::{ActionRequirement, RequirementRegistry};
use sov_vector::{Category, CategoryVector, IdentityVector};
use tempfile::tempdir;

fn security_identity(security: f64, sovereignty: f64) -> IdentityVector {
    IdentityVector::new(
        "agent-1",
        CategoryVector::zero().with(Category::Security, security),
        sovereignty,
    )
}

fn scan_registry() -> RequirementRegistry {
    let mut registry = RequirementRegistry::empty();
    registry
        .insert(ActionRequirement::new("scan_secrets", 0.6).requires(Category::Security, 0.7))
        .unwrap();
    registry
}

fn counter_hook(
    counter: &Arc<AtomicUsize>,
) -> impl Fn(&DriftNotice) -> Result<(), InterceptorError> + Send + 'static {
    let counter = Arc::clone(counter);
    move |_: &DriftNotice| -> Result<(), InterceptorError> {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn write_scores(path: &Path, units: u64, generated_at: chrono::DateTime<Utc>) {
    let mut categories = serde_json::Map::new();
    for category in Category::ALL {
        categories.insert(
            category.as_str().to_string(),
            serde_json::json!({"units": 5, "percentage": 50.0, "grade": "B"}),
        );
    }
    let doc = serde_json::json!({
        "generatedAt": generated_at,
        "userId": "agent-42",
        "totalUnits": units,
        "grade": "A",
        "categories": categories,
    });
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, serde_json::to_string_pretty(&doc).unwrap()).unwrap();
}

#[test]
fn security_scenario_allows_then_denies_with_reason() {
    let dir = tempdir().unwrap();
    let audit = dir.path().join("audit.jsonl");

    let mut gate = Interceptor::builder()
        .registry(scan_registry())
        .identity(security_identity(0.75, 0.72))
        .audit_log(&audit)
        .build();
    let verdict = gate.intercept_tool("scan_secrets");
    let result = verdict.permission().unwrap();
    assert!(result.allowed);
    assert_eq!(result.overlap, 1.0);

    let mut gate = Interceptor::builder()
        .registry(scan_registry())
        .identity(security_identity(0.65, 0.72))
        .audit_log(&audit)
        .build();
    let verdict = gate.intercept_tool("scan_secrets");
    let result = verdict.permission().unwrap();
    assert!(!result.allowed);
    assert_eq!(result.overlap, 0.0);
    assert_eq!(result.failed_categories, vec!["security: 0.65 < 0.7"]);

    let records = query_file(&audit, &AuditFilter::new()).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].decision, Decision::Allow);
    assert_eq!(records[1].decision, Decision::Deny);
    assert_eq!(records[1].failed_categories, vec!["security: 0.65 < 0.7"]);
    assert_ne!(records[0].session_id, records[1].session_id);
}

#[test]
fn sovereignty_gate_denies_despite_full_overlap() {
    let mut gate = Interceptor::builder()
        .registry(scan_registry())
        .identity(security_identity(0.95, 0.55))
        .build();
    let verdict = gate.intercept_tool("scan_secrets");
    let result = verdict.permission().unwrap();
    assert_eq!(result.overlap, 1.0);
    assert!(!result.allowed);
    assert!(result.failed_categories.is_empty());
}

#[test]
fn unregistered_tool_always_fails_open() {
    let dir = tempdir().unwrap();
    let trail = dir.path().join("fail-open.jsonl");
    let audit = dir.path().join("audit.jsonl");
    let mut gate = Interceptor::builder()
        .identity(security_identity(0.0, 0.0))
        .audit_log(&audit)
        .fail_open_log(&trail)
        .build();

    for _ in 0..5 {
        let verdict = gate.intercept_tool("summon_kraken");
        assert!(verdict.is_allowed());
        assert!(matches!(verdict, Verdict::FailOpen { .. }));
    }

    let records = FailOpenLog::read_all(&trail).unwrap();
    assert_eq!(records.len(), 5);
    assert_eq!(records[0].tool_name.as_deref(), Some("summon_kraken"));
    assert!(query_file(&audit, &AuditFilter::new()).unwrap().is_empty());
    assert_eq!(gate.stats().fail_open, 5);
}

#[test]
fn exempt_skills_leave_no_trace() {
    let dir = tempdir().unwrap();
    let config = EngineConfig::for_project(dir.path());
    let mut gate = InterceptorBuilder::from_config(&config, &InterceptorSettings::default())
        .unwrap()
        .build();

    assert!(gate.intercept_skill("status").is_allowed());
    assert!(query_file(&config.audit_log, &AuditFilter::new()).unwrap().is_empty());
    assert!(FailOpenLog::read_all(&config.fail_open_log).unwrap().is_empty());
    assert!(!config.heat_map.exists());
}

#[test]
fn three_consecutive_denials_fire_drift_hook_once() {
    let trips = Arc::new(AtomicUsize::new(0));
    let denials = Arc::new(AtomicUsize::new(0));
    let denial_counter = Arc::clone(&denials);
    let mut gate = Interceptor::builder()
        .identity(security_identity(0.0, 0.3))
        .on_drift_threshold(counter_hook(&trips))
        .on_denial(move |_: &DenialNotice| -> Result<(), InterceptorError> {
            denial_counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .build();

    // Deny, deny, allow: the streak resets without firing.
    assert!(!gate.intercept_skill("git-push").is_allowed());
    assert!(!gate.intercept_skill("git-push").is_allowed());
    assert!(gate.intercept_skill("file-reader").is_allowed());
    assert_eq!(trips.load(Ordering::SeqCst), 0);
    assert_eq!(gate.stats().consecutive_denials, 0);

    // Three in a row fire exactly once.
    for _ in 0..3 {
        gate.intercept_skill("git-push");
    }
    assert_eq!(trips.load(Ordering::SeqCst), 1);
    assert_eq!(gate.stats().consecutive_denials, 0);
    assert_eq!(gate.stats().lifetime_denials, 5);
    assert_eq!(denials.load(Ordering::SeqCst), 5);

    // Two more do not fire again.
    gate.intercept_skill("git-push");
    gate.intercept_skill("git-push");
    assert_eq!(trips.load(Ordering::SeqCst), 1);
}

#[test]
fn drift_reload_decays_sovereignty_from_denials() {
    let dir = tempdir().unwrap();
    let config = EngineConfig::for_project(dir.path());
    write_scores(&config.scores_file, 0, Utc::now() - Duration::minutes(5));

    let trips = Arc::new(AtomicUsize::new(0));
    let mut gate = InterceptorBuilder::from_config(&config, &InterceptorSettings::default())
        .unwrap()
        .on_drift_threshold(counter_hook(&trips))
        .build();
    assert_eq!(gate.identity().user_id, "agent-42");
    assert_eq!(gate.identity().sovereignty(), 1.0);
    let first_digest = gate.loaded_identity().digest.clone();
    assert!(first_digest.is_some());

    // Every category sits at 0.8; access_credentials needs security 0.9.
    for _ in 0..3 {
        assert!(!gate.intercept_skill("secrets-vault").is_allowed());
    }
    assert_eq!(trips.load(Ordering::SeqCst), 1);
    assert_eq!(DriftLog::count_since(&config.drift_log, None).unwrap(), 3);

    // Reloaded after the trip: three drift events since the snapshot.
    let calc = gate.loaded_identity().calculation.clone().unwrap();
    assert_eq!(calc.drift_events, 3);
    assert!((gate.identity().sovereignty() - 0.997f64.powi(3)).abs() < 1e-9);
    assert_eq!(gate.loaded_identity().digest, first_digest);

    // A fresh snapshot from the pipeline changes the digest and clears decay.
    write_scores(&config.scores_file, 100, Utc::now() + Duration::seconds(1));
    let outcome = gate.reload_identity().unwrap();
    assert!(outcome.changed);
    assert_eq!(gate.loaded_identity().calculation.as_ref().unwrap().drift_events, 0);
}

#[test]
fn heat_map_tracks_cells_on_disk() {
    let dir = tempdir().unwrap();
    let config = EngineConfig::for_project(dir.path());
    let mut gate = InterceptorBuilder::from_config(&config, &InterceptorSettings::default())
        .unwrap()
        .identity(IdentityVector::new(
            "agent-1",
            CategoryVector::zero()
                .with(Category::Testing, 0.9)
                .with(Category::Reliability, 0.9)
                .with(Category::Compliance, 0.9),
            0.95,
        ))
        .build();

    for _ in 0..3 {
        assert!(gate.intercept_skill("git-push").is_allowed());
    }
    let heat = HeatMap::load(&config.heat_map).unwrap();
    let cell = heat.get("testing.high").unwrap();
    assert_eq!(cell.state, HeatState::Building);
    assert_eq!(cell.task_count, 3);
    assert_eq!(heat.document().sovereignty, 0.95);
}

#[test]
fn persistence_failures_never_change_the_verdict() {
    let dir = tempdir().unwrap();
    // A regular file where a directory is expected makes every write fail.
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "not a directory").unwrap();

    let mut gate = Interceptor::builder()
        .identity(security_identity(0.0, 0.3))
        .audit_log(blocker.join("audit.jsonl"))
        .fail_open_log(blocker.join("fail-open.jsonl"))
        .drift_log(blocker.join("drift.jsonl"))
        .heat_map(blocker.join("heat-map.json"))
        .build();

    assert!(!gate.intercept_skill("git-push").is_allowed());
    assert!(gate.intercept_skill("file-reader").is_allowed());
    assert!(gate.intercept_skill("teleport").is_allowed());
    assert_eq!(gate.stats().lifetime_denials, 1);
}
