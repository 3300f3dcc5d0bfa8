// record.rs — Audit record data model.
//
// One AuditRecord per permission verdict, allow or deny. Field names are
// camelCase on disk so the trail stays readable by the rest of the platform.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The verdict recorded. Serialized as `"ALLOW"` / `"DENY"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Decision {
    Allow,
    Deny,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Allow => write!(f, "ALLOW"),
            Decision::Deny => write!(f, "DENY"),
        }
    }
}

/// The measurements behind a verdict, supplied by the caller.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AuditEntry {
    pub tool_name: String,
    pub skill_name: String,
    pub overlap: f64,
    pub sovereignty: f64,
    pub threshold: f64,
    pub min_sovereignty: f64,
    pub failed_categories: Vec<String>,
}

/// A single persisted permission decision — one line in the audit log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub timestamp: DateTime<Utc>,
    pub decision: Decision,
    pub tool_name: String,
    pub skill_name: String,
    pub overlap: f64,
    pub sovereignty: f64,
    pub threshold: f64,
    pub min_sovereignty: f64,
    #[serde(default)]
    pub failed_categories: Vec<String>,
    pub user_id: String,
    pub session_id: String,
}

impl AuditRecord {
    /// Stamp an entry with its decision, actor and session at the current time.
    pub fn from_entry(
        decision: Decision,
        entry: AuditEntry,
        user_id: impl Into<String>,
        session_id: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            decision,
            tool_name: entry.tool_name,
            skill_name: entry.skill_name,
            overlap: entry.overlap,
            sovereignty: entry.sovereignty,
            threshold: entry.threshold,
            min_sovereignty: entry.min_sovereignty,
            failed_categories: entry.failed_categories,
            user_id: user_id.into(),
            session_id: session_id.into(),
        }
    }
}
