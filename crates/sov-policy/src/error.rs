// error.rs — Error types for the requirement registry.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building or extending the registry.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// A requirement has a threshold outside [0, 1].
    #[error("invalid requirement for tool '{tool}': {reason}")]
    InvalidRequirement { tool: String, reason: String },

    /// The operator's requirement file could not be read.
    #[error("failed to read requirements file at {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The requirement file is not valid YAML for the expected shape.
    #[error("failed to parse requirements file: {0}")]
    ParseFailed(#[from] serde_yaml::Error),
}
