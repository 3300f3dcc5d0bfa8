// error.rs — Error types for the sovereignty calculator.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading trust-debt input.
#[derive(Debug, Error)]
pub enum ScoreError {
    /// The scores artifact exists but could not be read.
    #[error("failed to read scores artifact at {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The scores artifact is not valid JSON for the expected shape.
    #[error("malformed scores artifact: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A grade letter outside A–D.
    #[error("unknown grade '{0}'")]
    UnknownGrade(String),
}
