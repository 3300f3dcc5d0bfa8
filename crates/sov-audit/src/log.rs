// log.rs — The append-only permission audit log.
//
// One AuditRecord per verdict, appended as a JSON line to a durable file.
// Each logger instance carries a session id (fresh UUID unless supplied) so
// the records of one run can be correlated. Queries re-read the file every
// time; nothing is cached in memory.

use std::path::Path;

use uuid::Uuid;

use crate::error::AuditError;
use crate::jsonl::{read_records, JsonlWriter};
use crate::query::{AuditFilter, AuditStats};
use crate::record::{AuditEntry, AuditRecord, Decision};

/// An append-only audit log backed by a JSONL file.
pub struct AuditLogger {
    writer: JsonlWriter<AuditRecord>,
    user_id: String,
    session_id: String,
}

impl AuditLogger {
    /// Open (or create) an audit log with a fresh session id.
    pub fn open(path: impl AsRef<Path>, user_id: impl Into<String>) -> Result<Self, AuditError> {
        Ok(Self {
            writer: JsonlWriter::open(path)?,
            user_id: user_id.into(),
            session_id: Uuid::new_v4().to_string(),
        })
    }

    /// Use an explicit session id instead of the generated one.
    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = session_id.into();
        self
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Change the actor recorded on subsequent entries (after an identity reload).
    pub fn set_user(&mut self, user_id: impl Into<String>) {
        self.user_id = user_id.into();
    }

    pub fn path(&self) -> &Path {
        self.writer.path()
    }

    /// Append an ALLOW record.
    pub fn log_allow(&mut self, entry: AuditEntry) -> Result<AuditRecord, AuditError> {
        self.append(Decision::Allow, entry)
    }

    /// Append a DENY record, including the failed categories.
    pub fn log_deny(&mut self, entry: AuditEntry) -> Result<AuditRecord, AuditError> {
        self.append(Decision::Deny, entry)
    }

    fn append(&mut self, decision: Decision, entry: AuditEntry) -> Result<AuditRecord, AuditError> {
        let record = AuditRecord::from_entry(decision, entry, &self.user_id, &self.session_id);
        self.writer.append(&record)?;
        Ok(record)
    }

    /// All records matching `filter`, in append order, read fresh from disk.
    pub fn query(&self, filter: &AuditFilter) -> Result<Vec<AuditRecord>, AuditError> {
        query_file(self.path(), filter)
    }

    /// Aggregate statistics over the records matching `filter`.
    pub fn stats(&self, filter: &AuditFilter) -> Result<AuditStats, AuditError> {
        stats_file(self.path(), filter)
    }
}

/// Query an audit log file without opening it for writing.
pub fn query_file(
    path: impl AsRef<Path>,
    filter: &AuditFilter,
) -> Result<Vec<AuditRecord>, AuditError> {
    Ok(read_records::<AuditRecord>(path)?
        .into_iter()
        .filter(|r| filter.matches(r))
        .collect())
}

/// Statistics over an audit log file without opening it for writing.
pub fn stats_file(path: impl AsRef<Path>, filter: &AuditFilter) -> Result<AuditStats, AuditError> {
    let records = query_file(path, filter)?;
    Ok(AuditStats::compute(&records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn entry(tool: &str, skill: &str) -> AuditEntry {
        AuditEntry {
            tool_name: tool.into(),
            skill_name: skill.into(),
            overlap: 1.0,
            sovereignty: 0.9,
            threshold: 0.8,
            min_sovereignty: 0.4,
            failed_categories: vec![],
        }
    }

    #[test]
    fn append_and_query_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let mut log = AuditLogger::open(&path, "agent-1").unwrap();

        log.log_allow(entry("write_file", "file-editor")).unwrap();
        let mut denied = entry("git_push", "git-push");
        denied.failed_categories = vec!["testing: 0.3 < 0.7".into()];
        log.log_deny(denied).unwrap();

        let all = log.query(&AuditFilter::new()).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].decision, Decision::Allow);
        assert_eq!(all[1].decision, Decision::Deny);
        assert_eq!(all[1].failed_categories, vec!["testing: 0.3 < 0.7"]);

        let denies = log.query(&AuditFilter::new().decision(Decision::Deny)).unwrap();
        assert_eq!(denies.len(), 1);
        assert_eq!(denies[0].tool_name, "git_push");
    }

    #[test]
    fn each_logger_gets_a_fresh_session() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let a = AuditLogger::open(&path, "agent-1").unwrap();
        let b = AuditLogger::open(&path, "agent-1").unwrap();
        assert_ne!(a.session_id(), b.session_id());
    }

    #[test]
    fn explicit_session_is_recorded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let mut log = AuditLogger::open(&path, "agent-1")
            .unwrap()
            .with_session("run-42");
        log.log_allow(entry("read_file", "file-reader")).unwrap();
        let records = log.query(&AuditFilter::new().session("run-42")).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].user_id, "agent-1");
    }

    #[test]
    fn queries_see_records_from_earlier_instances() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        {
            let mut first = AuditLogger::open(&path, "agent-1").unwrap();
            first.log_deny(entry("git_push", "git-push")).unwrap();
        }
        let mut second = AuditLogger::open(&path, "agent-2").unwrap();
        second.log_allow(entry("read_file", "file-reader")).unwrap();

        let stats = second.stats(&AuditFilter::new()).unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.denied, 1);
        let by_user = stats_file(&path, &AuditFilter::new().user("agent-2")).unwrap();
        assert_eq!(by_user.total, 1);
    }

    #[test]
    fn existing_lines_are_never_rewritten() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let mut log = AuditLogger::open(&path, "agent-1").unwrap();
        log.log_allow(entry("read_file", "file-reader")).unwrap();
        let before = std::fs::read_to_string(&path).unwrap();
        log.log_deny(entry("git_push", "git-push")).unwrap();
        let after = std::fs::read_to_string(&path).unwrap();
        assert!(after.starts_with(&before));
    }
}
