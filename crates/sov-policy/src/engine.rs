// engine.rs — Permission composition.
//
// A check passes only when both gates pass:
//
//   1. overlap(identity, requirement) >= threshold
//   2. identity.sovereignty          >= requirement.min_sovereignty
//
// Neither gate can compensate for the other. The engine is stateless; the
// interceptor owns all cross-call state (denial counters, heat, audit).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sov_vector::{compute_overlap, cosine_similarity, IdentityVector};

use crate::registry::RequirementRegistry;
use crate::requirement::ActionRequirement;

/// Default overlap threshold.
pub const DEFAULT_OVERLAP_THRESHOLD: f64 = 0.8;

/// Outcome of one permission check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionResult {
    pub allowed: bool,
    pub overlap: f64,
    pub sovereignty: f64,
    pub threshold: f64,
    pub min_sovereignty: f64,
    /// `"category: actual < required"` for every failing category.
    pub failed_categories: Vec<String>,
    /// Cosine similarity of identity and requirement vectors. Never gates.
    pub alignment: f64,
    pub timestamp: DateTime<Utc>,
}

impl PermissionResult {
    /// One-line explanation for logs and denial notices.
    pub fn reason(&self) -> String {
        if self.allowed {
            return "all requirements met".to_string();
        }
        let mut parts = Vec::new();
        if self.overlap < self.threshold {
            parts.push(format!(
                "overlap {:.2} below threshold {:.2} ({})",
                self.overlap,
                self.threshold,
                self.failed_categories.join(", ")
            ));
        }
        if self.sovereignty < self.min_sovereignty {
            parts.push(format!(
                "sovereignty {:.3} below required {:.2}",
                self.sovereignty, self.min_sovereignty
            ));
        }
        parts.join("; ")
    }
}

/// Evaluates identities against requirements with a fixed overlap threshold.
#[derive(Debug, Clone, Copy)]
pub struct PermissionEngine {
    threshold: f64,
}

impl PermissionEngine {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn evaluate(
        &self,
        identity: &IdentityVector,
        requirement: &ActionRequirement,
    ) -> PermissionResult {
        let overlap = compute_overlap(&identity.category_scores, &requirement.required_scores);
        let sovereignty = identity.sovereignty();
        let allowed =
            overlap.ratio >= self.threshold && sovereignty >= requirement.min_sovereignty;

        PermissionResult {
            allowed,
            overlap: overlap.ratio,
            sovereignty,
            threshold: self.threshold,
            min_sovereignty: requirement.min_sovereignty,
            failed_categories: overlap.failed_categories(),
            alignment: cosine_similarity(&identity.category_scores, &requirement.as_vector()),
            timestamp: Utc::now(),
        }
    }

    /// Registered tools this identity would currently be allowed to use.
    pub fn permitted_tools<'r>(
        &self,
        registry: &'r RequirementRegistry,
        identity: &IdentityVector,
    ) -> Vec<&'r ActionRequirement> {
        registry
            .iter()
            .filter(|r| self.evaluate(identity, r).allowed)
            .collect()
    }
}

impl Default for PermissionEngine {
    fn default() -> Self {
        Self::new(DEFAULT_OVERLAP_THRESHOLD)
    }
}
