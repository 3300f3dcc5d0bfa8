// routing.rs — Skill name → tool name mapping and the exemption list.
//
// Agents invoke *skills* (e.g. "file-editor"); requirements are keyed by
// *tool* (e.g. "write_file"). The interceptor resolves one to the other here
// before consulting the registry. Exempt skills are internal, side-effect
// free operations that bypass checking entirely.

use std::collections::{BTreeMap, BTreeSet};

/// How a skill name resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// On the exemption list: allow without checking or auditing.
    Exempt,
    /// Mapped to a canonical tool name.
    Tool(&'a str),
    /// No mapping exists.
    Unmapped,
}

/// Static skill routing table plus exemptions.
#[derive(Debug, Clone, Default)]
pub struct SkillRouting {
    skills: BTreeMap<String, String>,
    exemptions: BTreeSet<String>,
}

impl SkillRouting {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in skill table.
    pub fn builtin() -> Self {
        let skills = [
            ("file-reader", "read_file"),
            ("file-editor", "write_file"),
            ("file-cleanup", "delete_file"),
            ("web-search", "search_web"),
            ("web-fetch", "http_request"),
            ("shell", "execute_command"),
            ("test-runner", "execute_command"),
            ("git-commit", "git_commit"),
            ("git-push", "git_push"),
            ("db-migrate", "database_write"),
            ("chat-reply", "send_message"),
            ("social-post", "post_social"),
            ("task-dispatch", "dispatch_task"),
            ("deployer", "deploy_production"),
            ("secrets-vault", "access_credentials"),
            ("payments", "financial_transaction"),
        ];
        let exemptions = [
            "status",
            "help",
            "list-skills",
            "sovereignty-report",
            "heartbeat",
        ];

        let mut routing = Self::empty();
        for (skill, tool) in skills {
            routing.map_skill(skill, tool);
        }
        for skill in exemptions {
            routing.exempt(skill);
        }
        routing
    }

    /// Add or replace a skill → tool mapping.
    pub fn map_skill(&mut self, skill: impl Into<String>, tool: impl Into<String>) {
        self.skills.insert(skill.into(), tool.into());
    }

    /// Add a skill to the exemption list.
    pub fn exempt(&mut self, skill: impl Into<String>) {
        self.exemptions.insert(skill.into());
    }

    pub fn is_exempt(&self, skill: &str) -> bool {
        self.exemptions.contains(skill)
    }

    /// Canonical tool for a skill, if mapped.
    pub fn tool_for(&self, skill: &str) -> Option<&str> {
        self.skills.get(skill).map(String::as_str)
    }

    /// Exemption takes precedence over mapping.
    pub fn resolve(&self, skill: &str) -> Resolution<'_> {
        if self.is_exempt(skill) {
            Resolution::Exempt
        } else if let Some(tool) = self.tool_for(skill) {
            Resolution::Tool(tool)
        } else {
            Resolution::Unmapped
        }
    }

    /// All skills that route to `tool`.
    pub fn skills_for_tool(&self, tool: &str) -> Vec<&str> {
        self.skills
            .iter()
            .filter(|(_, t)| t.as_str() == tool)
            .map(|(s, _)| s.as_str())
            .collect()
    }

    pub fn exemptions(&self) -> impl Iterator<Item = &str> {
        self.exemptions.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RequirementRegistry;

    #[test]
    fn resolves_mapped_skill() {
        let routing = SkillRouting::builtin();
        assert_eq!(routing.resolve("git-push"), Resolution::Tool("git_push"));
    }

    #[test]
    fn exempt_skill_wins_over_mapping() {
        let mut routing = SkillRouting::builtin();
        routing.map_skill("status", "read_file");
        assert_eq!(routing.resolve("status"), Resolution::Exempt);
    }

    #[test]
    fn unknown_skill_is_unmapped() {
        assert_eq!(
            SkillRouting::builtin().resolve("teleport"),
            Resolution::Unmapped
        );
    }

    #[test]
    fn every_builtin_skill_targets_a_registered_tool() {
        let routing = SkillRouting::builtin();
        let registry = RequirementRegistry::builtin();
        for (skill, tool) in &routing.skills {
            assert!(registry.contains(tool), "{} → {} is unregistered", skill, tool);
        }
    }

    #[test]
    fn skills_for_tool_reverse_lookup() {
        let routing = SkillRouting::builtin();
        assert_eq!(
            routing.skills_for_tool("execute_command"),
            vec!["shell", "test-runner"]
        );
    }
}
