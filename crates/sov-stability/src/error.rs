// error.rs — Error types for the stability monitor.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading or writing stability state.
#[derive(Debug, Error)]
pub enum StabilityError {
    /// A history or milestone file could not be read or written.
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A history line or the milestone file is not valid JSON.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// A CSV row could not be encoded.
    #[error("csv export error: {0}")]
    Csv(#[from] csv::Error),

    /// The export destination rejected the write.
    #[error("export failed: {0}")]
    ExportFailed(std::io::Error),

    /// A milestone hook (artifact generation or notification) failed.
    /// Non-fatal: the milestone is still recorded.
    #[error("milestone hook error: {0}")]
    HookError(String),
}
