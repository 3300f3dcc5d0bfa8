// registry.rs — The action requirement table.
//
// The registry is an explicitly constructed value: the interceptor receives
// one at build time, so two interceptors in the same process (e.g. tests)
// never share or mutate each other's tables.
//
// Operators extend or override the built-in table with a YAML file:
//
// ```yaml
// requirements:
//   - toolName: publish_release
//     minSovereignty: 0.85
//     requiredScores:
//       testing: 0.8
//       compliance: 0.7
//     description: Tag and publish a release
// ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sov_vector::Category;

use crate::error::PolicyError;
use crate::requirement::{ActionRequirement, RiskTier};

/// Tool name → requirement.
#[derive(Debug, Clone, Default)]
pub struct RequirementRegistry {
    entries: BTreeMap<String, ActionRequirement>,
}

/// On-disk shape of an operator requirements file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequirementsFile {
    #[serde(default)]
    pub requirements: Vec<ActionRequirement>,
}

impl RequirementRegistry {
    /// A registry with no entries (every tool fails open).
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in table of privileged actions.
    pub fn builtin() -> Self {
        use Category::*;

        let table = vec![
            ActionRequirement::new("read_file", 0.2)
                .with_description("Read a file inside the workspace"),
            ActionRequirement::new("search_web", 0.2)
                .requires(Privacy, 0.3)
                .with_description("Run a web search"),
            ActionRequirement::new("write_file", 0.4)
                .requires(Reliability, 0.5)
                .requires(Testing, 0.4)
                .with_description("Create or modify a workspace file"),
            ActionRequirement::new("send_message", 0.4)
                .requires(Transparency, 0.5)
                .requires(Privacy, 0.5)
                .with_description("Send a message on a chat platform"),
            ActionRequirement::new("http_request", 0.5)
                .requires(Security, 0.5)
                .requires(Privacy, 0.5)
                .with_description("Make an outbound HTTP request"),
            ActionRequirement::new("execute_command", 0.6)
                .requires(Security, 0.7)
                .requires(Safety, 0.6)
                .with_description("Run a shell command"),
            ActionRequirement::new("delete_file", 0.6)
                .requires(Safety, 0.6)
                .requires(Integrity, 0.6)
                .with_description("Delete a workspace file"),
            ActionRequirement::new("git_commit", 0.5)
                .requires(Testing, 0.5)
                .requires(Documentation, 0.4)
                .with_description("Commit staged changes"),
            ActionRequirement::new("git_push", 0.7)
                .requires(Testing, 0.7)
                .requires(Reliability, 0.6)
                .requires(Compliance, 0.5)
                .with_description("Push commits to a shared remote"),
            ActionRequirement::new("database_write", 0.7)
                .requires(Integrity, 0.7)
                .requires(Reliability, 0.6)
                .requires(Auditability, 0.5)
                .with_description("Write to a production database"),
            ActionRequirement::new("post_social", 0.7)
                .requires(Transparency, 0.6)
                .requires(Compliance, 0.6)
                .requires(Accountability, 0.5)
                .with_description("Publish a public social post"),
            ActionRequirement::new("dispatch_task", 0.5)
                .requires(Accountability, 0.5)
                .requires(Observability, 0.4)
                .with_description("Hand a task to a worker terminal"),
            ActionRequirement::new("deploy_production", 0.9)
                .requires(Security, 0.8)
                .requires(Reliability, 0.8)
                .requires(Testing, 0.8)
                .requires(Compliance, 0.7)
                .with_description("Deploy to production"),
            ActionRequirement::new("access_credentials", 0.9)
                .requires(Security, 0.9)
                .requires(Privacy, 0.8)
                .requires(Governance, 0.7)
                .with_description("Read stored secrets or credentials"),
            ActionRequirement::new("financial_transaction", 0.95)
                .requires(Security, 0.9)
                .requires(Compliance, 0.9)
                .requires(Accountability, 0.8)
                .requires(Auditability, 0.8)
                .with_description("Move money or sign a payment"),
        ];

        let mut registry = Self::empty();
        for requirement in table {
            registry.entries.insert(requirement.tool_name.clone(), requirement);
        }
        registry
    }

    /// Insert or replace one entry after validating it.
    pub fn insert(&mut self, requirement: ActionRequirement) -> Result<(), PolicyError> {
        requirement.validate()?;
        self.entries.insert(requirement.tool_name.clone(), requirement);
        Ok(())
    }

    /// Merge operator entries over this registry (later entries win).
    pub fn with_overrides(
        mut self,
        overrides: impl IntoIterator<Item = ActionRequirement>,
    ) -> Result<Self, PolicyError> {
        for requirement in overrides {
            if self.entries.contains_key(&requirement.tool_name) {
                tracing::info!(tool = %requirement.tool_name, "overriding built-in requirement");
            }
            self.insert(requirement)?;
        }
        Ok(self)
    }

    /// Parse an operator requirements file.
    pub fn parse_overrides(content: &str) -> Result<Vec<ActionRequirement>, PolicyError> {
        let file: RequirementsFile = serde_yaml::from_str(content)?;
        Ok(file.requirements)
    }

    /// Load operator overrides from a YAML file. A missing file yields no overrides.
    pub fn load_overrides(path: &Path) -> Result<Vec<ActionRequirement>, PolicyError> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(path).map_err(|source| PolicyError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_overrides(&content)
    }

    pub fn get(&self, tool_name: &str) -> Option<&ActionRequirement> {
        self.entries.get(tool_name)
    }

    pub fn contains(&self, tool_name: &str) -> bool {
        self.entries.contains_key(tool_name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, sorted by tool name.
    pub fn iter(&self) -> impl Iterator<Item = &ActionRequirement> {
        self.entries.values()
    }

    /// Risk tier of a registered tool.
    pub fn risk_tier(&self, tool_name: &str) -> Option<RiskTier> {
        self.get(tool_name).map(ActionRequirement::risk_tier)
    }

    /// Tools that name `category` among their minimums.
    pub fn tools_requiring(&self, category: Category) -> Vec<&ActionRequirement> {
        self.iter()
            .filter(|r| r.required_scores.contains_key(&category))
            .collect()
    }

    /// Tools whose minimum sovereignty places them in `tier`.
    pub fn tools_in_tier(&self, tier: RiskTier) -> Vec<&ActionRequirement> {
        self.iter().filter(|r| r.risk_tier() == tier).collect()
    }
}
