// fail_open.rs — The trail of actions allowed without a registered requirement.
//
// Unknown skills and unregistered tools are allowed rather than blocked,
// but every such case lands here for later security review.

use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AuditError;
use crate::jsonl::{read_records, JsonlWriter};

/// Why an action was allowed without a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailOpenReason {
    /// The skill name has no tool mapping.
    UnmappedSkill,
    /// The tool has no registered requirement.
    UnregisteredTool,
}

impl fmt::Display for FailOpenReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailOpenReason::UnmappedSkill => write!(f, "unmapped skill"),
            FailOpenReason::UnregisteredTool => write!(f, "no registered requirement"),
        }
    }
}

/// One fail-open event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailOpenRecord {
    pub skill_name: String,
    /// Known only when the skill mapped to a tool.
    pub tool_name: Option<String>,
    pub sovereignty: f64,
    pub timestamp: DateTime<Utc>,
    pub reason: FailOpenReason,
}

impl FailOpenRecord {
    pub fn new(
        skill_name: impl Into<String>,
        tool_name: Option<String>,
        sovereignty: f64,
        reason: FailOpenReason,
    ) -> Self {
        Self {
            skill_name: skill_name.into(),
            tool_name,
            sovereignty,
            timestamp: Utc::now(),
            reason,
        }
    }
}

/// Append-only JSONL trail of fail-open events.
pub struct FailOpenLog {
    writer: JsonlWriter<FailOpenRecord>,
}

impl FailOpenLog {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AuditError> {
        Ok(Self {
            writer: JsonlWriter::open(path)?,
        })
    }

    pub fn record(&mut self, record: &FailOpenRecord) -> Result<(), AuditError> {
        self.writer.append(record)
    }

    pub fn path(&self) -> &Path {
        self.writer.path()
    }

    /// Every fail-open event in a trail file, oldest first.
    pub fn read_all(path: impl AsRef<Path>) -> Result<Vec<FailOpenRecord>, AuditError> {
        read_records(path)
    }
}
