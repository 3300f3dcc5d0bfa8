// identity.rs — A user or agent's trust profile at a point in time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::vector::CategoryVector;

/// Per-category trust scores plus the derived sovereignty score.
///
/// Sovereignty has no setter: it comes from the sovereignty calculator when
/// the identity is built, and only changes by building a new identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityVector {
    pub user_id: String,
    pub category_scores: CategoryVector,
    sovereignty_score: f64,
    pub last_updated: DateTime<Utc>,
}

impl IdentityVector {
    /// Build an identity from computed scores. Sovereignty is clamped to [0, 1].
    pub fn new(
        user_id: impl Into<String>,
        category_scores: CategoryVector,
        sovereignty_score: f64,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            category_scores,
            sovereignty_score: if sovereignty_score.is_nan() {
                0.0
            } else {
                sovereignty_score.clamp(0.0, 1.0)
            },
            last_updated: Utc::now(),
        }
    }

    /// The fallback identity used when no trust snapshot exists:
    /// sovereignty 1.0, every category unset.
    pub fn permissive(user_id: impl Into<String>) -> Self {
        Self::new(user_id, CategoryVector::zero(), 1.0)
    }

    /// Override the timestamp (builder pattern).
    pub fn updated_at(mut self, at: DateTime<Utc>) -> Self {
        self.last_updated = at;
        self
    }

    pub fn sovereignty(&self) -> f64 {
        self.sovereignty_score
    }
}
