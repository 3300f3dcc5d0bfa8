// config.rs — Engine file layout and interceptor settings.
//
// `EngineConfig::for_project()` places every durable file the engine reads
// or writes under a `.sov/` directory in the project root. Behavioral knobs
// live in `.sov/config.toml`; every field has a default so a missing file
// (or a partial one) is valid.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sov_policy::{RequirementRegistry, SkillRouting, DEFAULT_OVERLAP_THRESHOLD};

use crate::error::InterceptorError;

/// Where the engine keeps its state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub project_root: PathBuf,

    /// Trust-debt scores produced by the external pipeline (input only).
    pub scores_file: PathBuf,

    /// Append-only permission audit log.
    pub audit_log: PathBuf,

    /// Append-only trail of fail-open decisions.
    pub fail_open_log: PathBuf,

    /// Append-only denial log feeding sovereignty decay.
    pub drift_log: PathBuf,

    /// Heat map, rewritten whole on every update.
    pub heat_map: PathBuf,

    pub stability_history: PathBuf,
    pub milestones: PathBuf,

    /// Operator additions and overrides to the requirement registry.
    pub requirements_file: PathBuf,

    pub settings_file: PathBuf,
}

impl EngineConfig {
    /// Standard `.sov/` layout for a project.
    pub fn for_project(project_root: impl AsRef<Path>) -> Self {
        let root = project_root.as_ref().to_path_buf();
        let sov_dir = root.join(".sov");
        Self {
            project_root: root,
            scores_file: sov_dir.join("trust-debt-scores.json"),
            audit_log: sov_dir.join("audit.jsonl"),
            fail_open_log: sov_dir.join("fail-open.jsonl"),
            drift_log: sov_dir.join("drift.jsonl"),
            heat_map: sov_dir.join("heat-map.json"),
            stability_history: sov_dir.join("stability-history.jsonl"),
            milestones: sov_dir.join("milestones.json"),
            requirements_file: sov_dir.join("requirements.yaml"),
            settings_file: sov_dir.join("config.toml"),
        }
    }

    pub fn sov_dir(&self) -> PathBuf {
        self.project_root.join(".sov")
    }

    pub fn load_settings(&self) -> Result<InterceptorSettings, InterceptorError> {
        InterceptorSettings::load(&self.settings_file)
    }

    /// Built-in requirements merged with `requirements.yaml`, if present.
    pub fn registry(&self) -> Result<RequirementRegistry, InterceptorError> {
        let overrides = RequirementRegistry::load_overrides(&self.requirements_file)?;
        Ok(RequirementRegistry::builtin().with_overrides(overrides)?)
    }
}

/// Interceptor behavior, from `.sov/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterceptorSettings {
    /// Actor recorded on audit entries when the scores artifact names none.
    #[serde(default = "default_user_id")]
    pub user_id: String,

    #[serde(default = "default_overlap_threshold")]
    pub overlap_threshold: f64,

    /// Consecutive denials that trip the drift-threshold hook.
    #[serde(default = "default_drift_denial_limit")]
    pub drift_denial_limit: u32,

    /// Re-read the identity after the drift-threshold hook runs.
    #[serde(default = "default_reload_after_drift")]
    pub reload_after_drift: bool,

    /// Skills exempt in addition to the built-in list.
    #[serde(default)]
    pub extra_exemptions: Vec<String>,

    /// Skill → tool mappings added to (or replacing) the built-in table.
    #[serde(default)]
    pub skill_aliases: BTreeMap<String, String>,
}

impl Default for InterceptorSettings {
    fn default() -> Self {
        Self {
            user_id: default_user_id(),
            overlap_threshold: default_overlap_threshold(),
            drift_denial_limit: default_drift_denial_limit(),
            reload_after_drift: default_reload_after_drift(),
            extra_exemptions: Vec::new(),
            skill_aliases: BTreeMap::new(),
        }
    }
}

impl InterceptorSettings {
    /// Load settings; a missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, InterceptorError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(path).map_err(|source| InterceptorError::ConfigReadFailed {
                path: path.to_path_buf(),
                source,
            })?;
        Self::parse(&content).map_err(|source| InterceptorError::ConfigParseFailed {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Built-in routing extended with the configured aliases and exemptions.
    pub fn routing(&self) -> SkillRouting {
        let mut routing = SkillRouting::builtin();
        for (skill, tool) in &self.skill_aliases {
            routing.map_skill(skill.clone(), tool.clone());
        }
        for skill in &self.extra_exemptions {
            routing.exempt(skill.clone());
        }
        routing
    }
}

// Serde default functions
fn default_user_id() -> String {
    "default".to_string()
}

fn default_overlap_threshold() -> f64 {
    DEFAULT_OVERLAP_THRESHOLD
}

fn default_drift_denial_limit() -> u32 {
    3
}

fn default_reload_after_drift() -> bool {
    true
}
