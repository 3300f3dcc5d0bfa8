// error.rs — Error types for the audit subsystem.
//
// Uses `thiserror` to derive the standard Rust `Error` trait automatically.
// Each variant maps to a specific failure mode in the audit pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during audit operations.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Failed to open or create a log file.
    #[error("failed to open log at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write a record to the log.
    #[error("failed to append record: {0}")]
    WriteFailed(#[from] std::io::Error),

    /// Failed to serialize a record.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
