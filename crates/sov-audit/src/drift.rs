// drift.rs — Durable record of denials and violations.
//
// Every denial becomes a DriftEvent. The log is append-only; the number of
// events since the current trust snapshot was produced drives sovereignty
// decay the next time the identity is loaded.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AuditError;
use crate::jsonl::{read_records, JsonlWriter};

/// A recorded denial or violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriftEvent {
    pub timestamp: DateTime<Utc>,
    pub tool_name: String,
    pub overlap: f64,
    pub sovereignty: f64,
    pub reason: String,
}

impl DriftEvent {
    pub fn new(
        tool_name: impl Into<String>,
        overlap: f64,
        sovereignty: f64,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            tool_name: tool_name.into(),
            overlap,
            sovereignty,
            reason: reason.into(),
        }
    }

    /// Override the timestamp (builder pattern).
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Append-only JSONL drift log.
pub struct DriftLog {
    writer: JsonlWriter<DriftEvent>,
}

impl DriftLog {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AuditError> {
        Ok(Self {
            writer: JsonlWriter::open(path)?,
        })
    }

    pub fn record(&mut self, event: &DriftEvent) -> Result<(), AuditError> {
        self.writer.append(event)
    }

    pub fn path(&self) -> &Path {
        self.writer.path()
    }

    pub fn read_all(path: impl AsRef<Path>) -> Result<Vec<DriftEvent>, AuditError> {
        read_records(path)
    }

    /// Events strictly after `reference`, or all events when `reference` is `None`.
    pub fn count_since(
        path: impl AsRef<Path>,
        reference: Option<DateTime<Utc>>,
    ) -> Result<u64, AuditError> {
        let events = Self::read_all(path)?;
        let count = match reference {
            Some(since) => events.iter().filter(|e| e.timestamp > since).count(),
            None => events.len(),
        };
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::tempdir;

    #[test]
    fn count_since_reference() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("drift.jsonl");
        let now = Utc::now();
        let mut log = DriftLog::open(&path).unwrap();
        for days_ago in [10, 5, 1] {
            let event = DriftEvent::new("git_push", 0.0, 0.7, "overlap")
                .at(now - Duration::days(days_ago));
            log.record(&event).unwrap();
        }

        assert_eq!(DriftLog::count_since(&path, None).unwrap(), 3);
        assert_eq!(
            DriftLog::count_since(&path, Some(now - Duration::days(7))).unwrap(),
            2
        );
        assert_eq!(DriftLog::count_since(&path, Some(now)).unwrap(), 0);
    }

    #[test]
    fn missing_log_counts_zero() {
        assert_eq!(DriftLog::count_since("/nonexistent/drift.jsonl", None).unwrap(), 0);
    }
}
