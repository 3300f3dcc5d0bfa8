//! # sov-audit
//!
//! Append-only trails for the sovereignty engine.
//!
//! Every permission verdict, allow or deny, is recorded as an [`AuditRecord`]
//! in a JSONL (JSON Lines) file. Two parallel trails use the same format:
//! the [`FailOpenLog`] of actions allowed without a registered requirement,
//! and the [`DriftLog`] of denials that feed sovereignty decay.
//!
//! ## Quick Example
//!
//! ```rust,no_run
//! use sov_audit::{AuditEntry, AuditFilter, AuditLogger, Decision};
//!
//! let mut log = AuditLogger::open("/tmp/audit.jsonl", "agent-1").unwrap();
//! log.log_allow(AuditEntry {
//!     tool_name: "write_file".into(),
//!     skill_name: "file-editor".into(),
//!     overlap: 1.0,
//!     sovereignty: 0.9,
//!     threshold: 0.8,
//!     min_sovereignty: 0.4,
//!     failed_categories: vec![],
//! })
//! .unwrap();
//! let denies = log.query(&AuditFilter::new().decision(Decision::Deny)).unwrap();
//! ```

pub mod digest;
pub mod drift;
pub mod error;
pub mod fail_open;
pub mod jsonl;
pub mod log;
pub mod query;
pub mod record;

// Re-export the main types at the crate root for convenience.
pub use digest::SnapshotDigest;
pub use drift::{DriftEvent, DriftLog};
pub use error::AuditError;
pub use fail_open::{FailOpenLog, FailOpenReason, FailOpenRecord};
pub use log::{query_file, stats_file, AuditLogger};
pub use query::{AuditFilter, AuditStats, DenialCount, TOP_DENIED_LIMIT};
pub use record::{AuditEntry, AuditRecord, Decision};
