// interceptor.rs — The runtime permission gate wrapped around every invocation.
//
// Per invocation:
//
//   1. Exempt skill      → allow; no audit, no heat.
//   2. Unmapped skill or
//      unregistered tool → allow; record on the fail-open trail.
//   3. Otherwise         → PermissionEngine verdict, then:
//        allow: reset the consecutive-denial streak, audit ALLOW, heat allow
//        deny:  extend the streak, audit DENY, heat deny, drift event,
//               denial hooks; at the drift limit run the drift-threshold hook,
//               reset the streak and (optionally) reload the identity
//
// The verdict is fixed before any side effect runs. Every write and every
// hook is best-effort: failures (hook panics included) are logged here and
// never returned.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sov_audit::{
    AuditEntry, AuditLogger, DriftEvent, DriftLog, FailOpenLog, FailOpenReason, FailOpenRecord,
    SnapshotDigest,
};
use sov_policy::{
    ActionRequirement, PermissionEngine, PermissionResult, RequirementRegistry, Resolution,
    SkillRouting, DEFAULT_OVERLAP_THRESHOLD,
};
use sov_vector::IdentityVector;

use crate::config::{EngineConfig, InterceptorSettings};
use crate::error::InterceptorError;
use crate::heat::{HeatMap, HeatState};
use crate::hooks::{DenialHook, DenialNotice, DriftNotice, DriftThresholdHook};
use crate::identity::{IdentitySource, LoadedIdentity, ScoresFileSource, StaticIdentity};

/// Default consecutive denials before the drift-threshold hook runs.
pub const DEFAULT_DRIFT_DENIAL_LIMIT: u32 = 3;

/// The outcome of one interception.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Verdict {
    /// On the exemption list.
    Exempt { skill_name: String },
    /// Allowed without a check because no requirement applies.
    FailOpen {
        skill_name: String,
        tool_name: Option<String>,
        reason: FailOpenReason,
    },
    /// Checked against a registered requirement.
    Checked {
        skill_name: String,
        tool_name: String,
        cell_id: String,
        result: PermissionResult,
    },
}

impl Verdict {
    pub fn is_allowed(&self) -> bool {
        match self {
            Verdict::Exempt { .. } | Verdict::FailOpen { .. } => true,
            Verdict::Checked { result, .. } => result.allowed,
        }
    }

    pub fn permission(&self) -> Option<&PermissionResult> {
        match self {
            Verdict::Checked { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn skill_name(&self) -> &str {
        match self {
            Verdict::Exempt { skill_name }
            | Verdict::FailOpen { skill_name, .. }
            | Verdict::Checked { skill_name, .. } => skill_name,
        }
    }
}

/// Counters since the interceptor was built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterceptorStats {
    pub consecutive_denials: u32,
    pub lifetime_denials: u64,
    pub allows: u64,
    pub exempt: u64,
    pub fail_open: u64,
    pub drift_threshold_trips: u64,
}

/// Result of an identity reload.
#[derive(Debug, Clone, PartialEq)]
pub struct ReloadOutcome {
    /// Whether the snapshot digest differs from the previous one.
    pub changed: bool,
    pub sovereignty: f64,
    pub digest: Option<SnapshotDigest>,
}

pub struct Interceptor {
    engine: PermissionEngine,
    registry: RequirementRegistry,
    routing: SkillRouting,
    source: Box<dyn IdentitySource>,
    current: LoadedIdentity,
    audit: Option<AuditLogger>,
    fail_open: Option<FailOpenLog>,
    drift: Option<DriftLog>,
    heat: Option<HeatMap>,
    denial_hooks: Vec<Box<dyn DenialHook>>,
    drift_hook: Option<Box<dyn DriftThresholdHook>>,
    drift_denial_limit: u32,
    reload_after_drift: bool,
    stats: InterceptorStats,
}

impl Interceptor {
    pub fn builder() -> InterceptorBuilder {
        InterceptorBuilder::new()
    }

    /// Intercept an invocation by skill name.
    pub fn intercept_skill(&mut self, skill_name: &str) -> Verdict {
        let tool = match self.routing.resolve(skill_name) {
            Resolution::Exempt => return self.exempt(skill_name),
            Resolution::Unmapped => {
                return self.fail_open(skill_name, None, FailOpenReason::UnmappedSkill)
            }
            Resolution::Tool(tool) => tool.to_string(),
        };
        self.check(skill_name, &tool)
    }

    /// Intercept an invocation already expressed as a tool name.
    pub fn intercept_tool(&mut self, tool_name: &str) -> Verdict {
        if self.routing.is_exempt(tool_name) {
            return self.exempt(tool_name);
        }
        self.check(tool_name, tool_name)
    }

    fn exempt(&mut self, skill_name: &str) -> Verdict {
        self.stats.exempt += 1;
        tracing::debug!(skill = skill_name, "exempt, allowed without check");
        Verdict::Exempt {
            skill_name: skill_name.to_string(),
        }
    }

    fn fail_open(
        &mut self,
        skill_name: &str,
        tool_name: Option<String>,
        reason: FailOpenReason,
    ) -> Verdict {
        self.stats.fail_open += 1;
        let sovereignty = self.current.identity.sovereignty();
        tracing::warn!(
            skill = skill_name,
            tool = tool_name.as_deref().unwrap_or("-"),
            %reason,
            "failing open"
        );
        if let Some(log) = self.fail_open.as_mut() {
            let record = FailOpenRecord::new(skill_name, tool_name.clone(), sovereignty, reason);
            if let Err(e) = log.record(&record) {
                tracing::warn!("fail-open trail write failed: {}", e);
            }
        }
        Verdict::FailOpen {
            skill_name: skill_name.to_string(),
            tool_name,
            reason,
        }
    }

    fn check(&mut self, skill_name: &str, tool_name: &str) -> Verdict {
        let Some(requirement) = self.registry.get(tool_name).cloned() else {
            return self.fail_open(
                skill_name,
                Some(tool_name.to_string()),
                FailOpenReason::UnregisteredTool,
            );
        };

        let result = self.engine.evaluate(&self.current.identity, &requirement);
        let cell_id = requirement.cell_id();

        if result.allowed {
            self.on_allow(skill_name, &requirement, &cell_id, &result);
        } else {
            self.on_deny(skill_name, &requirement, &cell_id, &result);
        }

        Verdict::Checked {
            skill_name: skill_name.to_string(),
            tool_name: tool_name.to_string(),
            cell_id,
            result,
        }
    }

    fn on_allow(
        &mut self,
        skill_name: &str,
        requirement: &ActionRequirement,
        cell_id: &str,
        result: &PermissionResult,
    ) {
        self.stats.consecutive_denials = 0;
        self.stats.allows += 1;
        tracing::debug!(
            tool = %requirement.tool_name,
            overlap = result.overlap,
            sovereignty = result.sovereignty,
            "allowed"
        );

        if let Some(audit) = self.audit.as_mut() {
            if let Err(e) = audit.log_allow(audit_entry(skill_name, requirement, result)) {
                tracing::warn!("audit write failed: {}", e);
            }
        }
        self.update_heat(cell_id, result.sovereignty, true);
    }

    fn on_deny(
        &mut self,
        skill_name: &str,
        requirement: &ActionRequirement,
        cell_id: &str,
        result: &PermissionResult,
    ) {
        self.stats.consecutive_denials += 1;
        self.stats.lifetime_denials += 1;
        let reason = result.reason();
        tracing::info!(
            tool = %requirement.tool_name,
            skill = skill_name,
            consecutive = self.stats.consecutive_denials,
            %reason,
            "denied"
        );

        if let Some(audit) = self.audit.as_mut() {
            if let Err(e) = audit.log_deny(audit_entry(skill_name, requirement, result)) {
                tracing::warn!("audit write failed: {}", e);
            }
        }
        self.update_heat(cell_id, result.sovereignty, false);

        if let Some(drift) = self.drift.as_mut() {
            let event = DriftEvent::new(
                requirement.tool_name.clone(),
                result.overlap,
                result.sovereignty,
                reason.clone(),
            );
            if let Err(e) = drift.record(&event) {
                tracing::warn!("drift log write failed: {}", e);
            }
        }

        let notice = DenialNotice {
            tool_name: requirement.tool_name.clone(),
            skill_name: skill_name.to_string(),
            overlap: result.overlap,
            sovereignty: result.sovereignty,
            threshold: result.threshold,
            min_sovereignty: result.min_sovereignty,
            failed_categories: result.failed_categories.clone(),
            reason,
            consecutive_denials: self.stats.consecutive_denials,
            timestamp: result.timestamp,
        };
        for hook in &self.denial_hooks {
            if let Err(e) = guard_hook(|| hook.on_denial(&notice)) {
                tracing::warn!(tool = %notice.tool_name, "denial hook failed: {}", e);
            }
        }

        if self.stats.consecutive_denials >= self.drift_denial_limit {
            self.trip_drift_threshold(&notice);
        }
    }

    fn trip_drift_threshold(&mut self, last: &DenialNotice) {
        self.stats.drift_threshold_trips += 1;
        let notice = DriftNotice {
            user_id: self.current.identity.user_id.clone(),
            consecutive_denials: self.stats.consecutive_denials,
            lifetime_denials: self.stats.lifetime_denials,
            sovereignty: self.current.identity.sovereignty(),
            last_tool: last.tool_name.clone(),
            timestamp: Utc::now(),
        };
        tracing::warn!(
            consecutive = notice.consecutive_denials,
            lifetime = notice.lifetime_denials,
            "drift threshold reached, requesting recalibration"
        );

        if let Some(hook) = self.drift_hook.as_ref() {
            if let Err(e) = guard_hook(|| hook.on_drift_threshold(&notice)) {
                tracing::warn!("drift-threshold hook failed: {}", e);
            }
        }
        self.stats.consecutive_denials = 0;

        if self.reload_after_drift {
            // Failure keeps the current identity; already logged.
            let _ = self.reload_identity();
        }
    }

    fn update_heat(&mut self, cell_id: &str, sovereignty: f64, allowed: bool) {
        let Some(heat) = self.heat.as_mut() else {
            return;
        };
        let transition = if allowed {
            heat.record_allow(cell_id, sovereignty)
        } else {
            heat.record_deny(cell_id, sovereignty)
        };
        if let Some(t) = transition {
            if t.to == HeatState::HotBlocked {
                tracing::warn!(cell = cell_id, "heat cell hot-blocked pending review");
            } else {
                tracing::debug!(cell = cell_id, from = %t.from, to = %t.to, "heat transition");
            }
        }
        if let Err(e) = heat.save() {
            tracing::warn!("heat map write failed: {}", e);
        }
    }

    /// Re-read the identity from its source and reset the denial streak.
    ///
    /// On error the previous identity stays in effect.
    pub fn reload_identity(&mut self) -> Result<ReloadOutcome, InterceptorError> {
        self.stats.consecutive_denials = 0;
        let loaded = match self.source.load() {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::warn!("identity reload failed, keeping previous identity: {}", e);
                return Err(e);
            }
        };

        let changed = loaded.digest != self.current.digest;
        tracing::info!(
            user = %loaded.identity.user_id,
            sovereignty = loaded.identity.sovereignty(),
            digest = loaded.digest.as_ref().map(|d| d.short()).unwrap_or("-"),
            changed,
            "identity reloaded"
        );
        if let Some(audit) = self.audit.as_mut() {
            audit.set_user(loaded.identity.user_id.clone());
        }

        let outcome = ReloadOutcome {
            changed,
            sovereignty: loaded.identity.sovereignty(),
            digest: loaded.digest.clone(),
        };
        self.current = loaded;
        Ok(outcome)
    }

    pub fn identity(&self) -> &IdentityVector {
        &self.current.identity
    }

    pub fn loaded_identity(&self) -> &LoadedIdentity {
        &self.current
    }

    pub fn stats(&self) -> InterceptorStats {
        self.stats
    }

    pub fn registry(&self) -> &RequirementRegistry {
        &self.registry
    }

    pub fn routing(&self) -> &SkillRouting {
        &self.routing
    }

    pub fn heat_map(&self) -> Option<&HeatMap> {
        self.heat.as_ref()
    }

    pub fn session_id(&self) -> Option<&str> {
        self.audit.as_ref().map(AuditLogger::session_id)
    }
}

/// Run a hook, turning a panic into a hook error.
fn guard_hook<F>(call: F) -> Result<(), InterceptorError>
where
    F: FnOnce() -> Result<(), InterceptorError>,
{
    panic::catch_unwind(AssertUnwindSafe(call)).unwrap_or_else(|payload| {
        Err(InterceptorError::Hook(format!("panicked: {}", panic_message(&*payload))))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

fn audit_entry(
    skill_name: &str,
    requirement: &ActionRequirement,
    result: &PermissionResult,
) -> AuditEntry {
    AuditEntry {
        tool_name: requirement.tool_name.clone(),
        skill_name: skill_name.to_string(),
        overlap: result.overlap,
        sovereignty: result.sovereignty,
        threshold: result.threshold,
        min_sovereignty: result.min_sovereignty,
        failed_categories: result.failed_categories.clone(),
    }
}

/// Assembles an [`Interceptor`]. Every durable trail is optional.
pub struct InterceptorBuilder {
    registry: RequirementRegistry,
    routing: SkillRouting,
    threshold: f64,
    source: Option<Box<dyn IdentitySource>>,
    default_user: String,
    audit_path: Option<PathBuf>,
    session_id: Option<String>,
    fail_open_path: Option<PathBuf>,
    drift_path: Option<PathBuf>,
    heat_path: Option<PathBuf>,
    denial_hooks: Vec<Box<dyn DenialHook>>,
    drift_hook: Option<Box<dyn DriftThresholdHook>>,
    drift_denial_limit: u32,
    reload_after_drift: bool,
}

impl InterceptorBuilder {
    pub fn new() -> Self {
        Self {
            registry: RequirementRegistry::builtin(),
            routing: SkillRouting::builtin(),
            threshold: DEFAULT_OVERLAP_THRESHOLD,
            source: None,
            default_user: "default".to_string(),
            audit_path: None,
            session_id: None,
            fail_open_path: None,
            drift_path: None,
            heat_path: None,
            denial_hooks: Vec::new(),
            drift_hook: None,
            drift_denial_limit: DEFAULT_DRIFT_DENIAL_LIMIT,
            reload_after_drift: false,
        }
    }

    /// Everything wired to the `.sov/` layout: scores-file identity, all four
    /// trails, the merged registry and configured routing.
    pub fn from_config(
        config: &EngineConfig,
        settings: &InterceptorSettings,
    ) -> Result<Self, InterceptorError> {
        let source = ScoresFileSource::new(&config.scores_file, settings.user_id.clone())
            .with_drift_log(&config.drift_log);
        Ok(Self::new()
            .registry(config.registry()?)
            .routing(settings.routing())
            .threshold(settings.overlap_threshold)
            .default_user(settings.user_id.clone())
            .identity_source(source)
            .audit_log(&config.audit_log)
            .fail_open_log(&config.fail_open_log)
            .drift_log(&config.drift_log)
            .heat_map(&config.heat_map)
            .drift_denial_limit(settings.drift_denial_limit)
            .reload_after_drift(settings.reload_after_drift))
    }

    pub fn registry(mut self, registry: RequirementRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn routing(mut self, routing: SkillRouting) -> Self {
        self.routing = routing;
        self
    }

    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn identity_source(mut self, source: impl IdentitySource + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Shorthand for a [`StaticIdentity`] source.
    pub fn identity(self, identity: IdentityVector) -> Self {
        self.identity_source(StaticIdentity(identity))
    }

    /// User recorded when the identity source cannot supply one.
    pub fn default_user(mut self, user_id: impl Into<String>) -> Self {
        self.default_user = user_id.into();
        self
    }

    pub fn audit_log(mut self, path: impl AsRef<Path>) -> Self {
        self.audit_path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn fail_open_log(mut self, path: impl AsRef<Path>) -> Self {
        self.fail_open_path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn drift_log(mut self, path: impl AsRef<Path>) -> Self {
        self.drift_path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn heat_map(mut self, path: impl AsRef<Path>) -> Self {
        self.heat_path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn on_denial(mut self, hook: impl DenialHook + 'static) -> Self {
        self.denial_hooks.push(Box::new(hook));
        self
    }

    pub fn on_drift_threshold(mut self, hook: impl DriftThresholdHook + 'static) -> Self {
        self.drift_hook = Some(Box::new(hook));
        self
    }

    pub fn drift_denial_limit(mut self, limit: u32) -> Self {
        self.drift_denial_limit = limit.max(1);
        self
    }

    pub fn reload_after_drift(mut self, reload: bool) -> Self {
        self.reload_after_drift = reload;
        self
    }

    /// Build the interceptor. Never fails: an unreadable identity falls back
    /// to the permissive identity, and a trail that cannot be opened is
    /// disabled with a warning.
    pub fn build(self) -> Interceptor {
        let default_user = self.default_user;
        let source: Box<dyn IdentitySource> = self.source.unwrap_or_else(|| {
            Box::new(StaticIdentity(IdentityVector::permissive(default_user.clone())))
        });
        let current = match source.load() {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::warn!("identity unavailable, using permissive identity: {}", e);
                LoadedIdentity::permissive(default_user.clone())
            }
        };
        tracing::info!(
            user = %current.identity.user_id,
            sovereignty = current.identity.sovereignty(),
            "interceptor identity loaded"
        );

        let user_id = current.identity.user_id.clone();
        let audit = self.audit_path.and_then(|path| {
            match AuditLogger::open(&path, user_id) {
                Ok(logger) => Some(match self.session_id {
                    Some(session) => logger.with_session(session),
                    None => logger,
                }),
                Err(e) => {
                    tracing::warn!("audit log disabled: {}", e);
                    None
                }
            }
        });
        let fail_open = self.fail_open_path.and_then(|path| {
            FailOpenLog::open(&path)
                .map_err(|e| tracing::warn!("fail-open trail disabled: {}", e))
                .ok()
        });
        let drift = self.drift_path.and_then(|path| {
            DriftLog::open(&path)
                .map_err(|e| tracing::warn!("drift log disabled: {}", e))
                .ok()
        });
        let heat = self.heat_path.map(|path| match HeatMap::load(&path) {
            Ok(heat) => heat,
            Err(e) => {
                tracing::warn!("heat map unreadable, starting empty: {}", e);
                HeatMap::new(path)
            }
        });

        Interceptor {
            engine: PermissionEngine::new(self.threshold),
            registry: self.registry,
            routing: self.routing,
            source,
            current,
            audit,
            fail_open,
            drift,
            heat,
            denial_hooks: self.denial_hooks,
            drift_hook: self.drift_hook,
            drift_denial_limit: self.drift_denial_limit,
            reload_after_drift: self.reload_after_drift,
            stats: InterceptorStats::default(),
        }
    }
}

impl Default for InterceptorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sov_vector::{Category, CategoryVector};
    use std::sync::{Arc, Mutex};

    fn identity(sovereignty: f64) -> IdentityVector {
        let mut scores = CategoryVector::zero();
        for c in Category::ALL {
            scores.set(c, 0.75);
        }
        IdentityVector::new("agent-1", scores, sovereignty)
    }

    #[test]
    fn exempt_skill_is_allowed_without_counting() {
        let mut gate = Interceptor::builder().identity(identity(0.0)).build();
        let verdict = gate.intercept_skill("heartbeat");
        assert!(matches!(verdict, Verdict::Exempt { .. }));
        assert!(verdict.is_allowed());
        assert_eq!(gate.stats().exempt, 1);
        assert_eq!(gate.stats().allows, 0);
    }

    #[test]
    fn unmapped_skill_fails_open() {
        let mut gate = Interceptor::builder().identity(identity(0.0)).build();
        let verdict = gate.intercept_skill("teleport");
        assert_eq!(
            verdict,
            Verdict::FailOpen {
                skill_name: "teleport".into(),
                tool_name: None,
                reason: FailOpenReason::UnmappedSkill,
            }
        );
        assert_eq!(gate.stats().fail_open, 1);
    }

    #[test]
    fn mapped_but_unregistered_tool_fails_open() {
        let mut routing = SkillRouting::builtin();
        routing.map_skill("image-gen", "generate_image");
        let mut gate = Interceptor::builder()
            .routing(routing)
            .identity(identity(0.0))
            .build();
        let verdict = gate.intercept_skill("image-gen");
        assert!(verdict.is_allowed());
        match verdict {
            Verdict::FailOpen { tool_name, reason, .. } => {
                assert_eq!(tool_name.as_deref(), Some("generate_image"));
                assert_eq!(reason, FailOpenReason::UnregisteredTool);
            }
            other => panic!("expected fail-open, got {:?}", other),
        }
    }

    #[test]
    fn allow_resets_streak() {
        let mut gate = Interceptor::builder().identity(identity(0.65)).build();
        // deploy_production needs 0.9 sovereignty.
        assert!(!gate.intercept_skill("deployer").is_allowed());
        assert!(!gate.intercept_skill("deployer").is_allowed());
        assert_eq!(gate.stats().consecutive_denials, 2);
        assert!(gate.intercept_skill("file-reader").is_allowed());
        assert_eq!(gate.stats().consecutive_denials, 0);
        assert_eq!(gate.stats().lifetime_denials, 2);
    }

    #[test]
    fn verdict_survives_hook_failures() {
        let mut gate = Interceptor::builder()
            .identity(identity(0.1))
            .on_denial(|_: &DenialNotice| -> Result<(), InterceptorError> {
                Err(InterceptorError::Hook("reporter down".into()))
            })
            .build();
        let verdict = gate.intercept_skill("git-push");
        assert!(!verdict.is_allowed());
        assert!(verdict.permission().is_some());
    }

    #[test]
    fn panicking_hooks_do_not_escape() {
        let mut gate = Interceptor::builder()
            .identity(identity(0.1))
            .on_denial(|_: &DenialNotice| -> Result<(), InterceptorError> {
                panic!("reporter crashed")
            })
            .on_drift_threshold(|_: &DriftNotice| -> Result<(), InterceptorError> {
                panic!("recalibration crashed")
            })
            .build();
        for _ in 0..3 {
            assert!(!gate.intercept_skill("git-push").is_allowed());
        }
        assert_eq!(gate.stats().drift_threshold_trips, 1);
        assert_eq!(gate.stats().consecutive_denials, 0);
        assert!(gate.intercept_skill("file-reader").is_allowed());
    }

    #[test]
    fn drift_hook_fires_at_limit_and_resets() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut gate = Interceptor::builder()
            .identity(identity(0.1))
            .on_drift_threshold(move |n: &DriftNotice| -> Result<(), InterceptorError> {
                sink.lock().unwrap().push(n.consecutive_denials);
                Ok(())
            })
            .build();
        for _ in 0..3 {
            gate.intercept_skill("git-push");
        }
        assert_eq!(*seen.lock().unwrap(), vec![3]);
        assert_eq!(gate.stats().consecutive_denials, 0);
        assert_eq!(gate.stats().drift_threshold_trips, 1);
    }

    #[test]
    fn intercept_tool_checks_registry_directly() {
        let mut gate = Interceptor::builder().identity(identity(1.0)).build();
        let verdict = gate.intercept_tool("write_file");
        match verdict {
            Verdict::Checked { tool_name, skill_name, .. } => {
                assert_eq!(tool_name, "write_file");
                assert_eq!(skill_name, "write_file");
            }
            other => panic!("expected checked, got {:?}", other),
        }
    }
}
