// requirement.rs — What an action needs before it may run.
//
// An ActionRequirement names a tool, the per-category minimums an identity
// must meet, and the minimum sovereignty. The risk tier is derived from
// `min_sovereignty` and is descriptive only; enforcement is the numbers.

use std::fmt;

use serde::{Deserialize, Serialize};
use sov_vector::{to_vector, Category, CategoryMap, CategoryVector};

use crate::error::PolicyError;

/// Qualitative risk class, derived purely from `min_sovereignty`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    /// [0.2, 0.4) — reversible, low blast radius. Values below 0.2 also land here.
    Low,
    /// [0.4, 0.7)
    Medium,
    /// [0.7, 0.9)
    High,
    /// [0.9, 1.0]
    Critical,
}

impl RiskTier {
    pub fn from_min_sovereignty(min_sovereignty: f64) -> Self {
        if min_sovereignty >= 0.9 {
            RiskTier::Critical
        } else if min_sovereignty >= 0.7 {
            RiskTier::High
        } else if min_sovereignty >= 0.4 {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            RiskTier::Low => "low risk, reversible",
            RiskTier::Medium => "medium risk",
            RiskTier::High => "high risk",
            RiskTier::Critical => "critical, irreversible or externally visible",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            RiskTier::Low => "low",
            RiskTier::Medium => "medium",
            RiskTier::High => "high",
            RiskTier::Critical => "critical",
        })
    }
}

/// Requirements an identity must meet to use one tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRequirement {
    pub tool_name: String,
    /// Sparse category minimums. Empty means any identity passes overlap.
    #[serde(default)]
    pub required_scores: CategoryMap,
    pub min_sovereignty: f64,
    #[serde(default)]
    pub description: String,
}

impl ActionRequirement {
    pub fn new(tool_name: impl Into<String>, min_sovereignty: f64) -> Self {
        Self {
            tool_name: tool_name.into(),
            required_scores: CategoryMap::new(),
            min_sovereignty,
            description: String::new(),
        }
    }

    /// Add one category minimum (builder pattern).
    pub fn requires(mut self, category: Category, minimum: f64) -> Self {
        self.required_scores.insert(category, minimum);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn risk_tier(&self) -> RiskTier {
        RiskTier::from_min_sovereignty(self.min_sovereignty)
    }

    /// Dense form of the minimums, for cosine alignment.
    pub fn as_vector(&self) -> CategoryVector {
        to_vector(&self.required_scores)
    }

    /// The category with the highest minimum (ties broken by canonical order).
    pub fn primary_category(&self) -> Option<Category> {
        self.required_scores
            .iter()
            .fold(None, |best: Option<(Category, f64)>, (c, v)| match best {
                Some((_, bv)) if bv >= *v => best,
                _ => Some((*c, *v)),
            })
            .map(|(c, _)| c)
    }

    /// Heat-map classification for this action: `<primary category>.<risk tier>`,
    /// or `general.<tier>` when no categories are required.
    pub fn cell_id(&self) -> String {
        let category = self
            .primary_category()
            .map(|c| c.as_str())
            .unwrap_or("general");
        format!("{}.{}", category, self.risk_tier())
    }

    /// Check that every threshold lies in [0, 1].
    pub fn validate(&self) -> Result<(), PolicyError> {
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        if !in_unit(self.min_sovereignty) {
            return Err(PolicyError::InvalidRequirement {
                tool: self.tool_name.clone(),
                reason: format!("minSovereignty {} outside [0, 1]", self.min_sovereignty),
            });
        }
        if let Some((category, value)) = self.required_scores.iter().find(|(_, v)| !in_unit(**v)) {
            return Err(PolicyError::InvalidRequirement {
                tool: self.tool_name.clone(),
                reason: format!("minimum for {} is {} (outside [0, 1])", category, value),
            });
        }
        Ok(())
    }
}
