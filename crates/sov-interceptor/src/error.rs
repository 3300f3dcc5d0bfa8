// error.rs — Error types for the interceptor crate.
//
// None of these ever reach a permission verdict: the interceptor catches
// persistence and hook failures at the write boundary and logs them. They
// surface from construction (config, registry, identity loading) and from
// the read-side helpers the CLI uses.

use std::path::PathBuf;

use sov_audit::AuditError;
use sov_policy::PolicyError;
use sov_score::ScoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InterceptorError {
    /// The settings file exists but could not be read.
    #[error("failed to read settings {path}: {source}")]
    ConfigReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The settings file is not valid TOML for `InterceptorSettings`.
    #[error("invalid settings in {path}: {source}")]
    ConfigParseFailed {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("policy error: {0}")]
    Policy(#[from] PolicyError),

    #[error("scores error: {0}")]
    Score(#[from] ScoreError),

    #[error("audit error: {0}")]
    Audit(#[from] AuditError),

    /// The heat-map file could not be read or written.
    #[error("heat map I/O error at {path}: {source}")]
    HeatMapIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No heat cell with this id exists.
    #[error("unknown heat cell: {0}")]
    UnknownCell(String),

    /// A denial or drift hook reported failure. Logged, never propagated.
    #[error("hook error: {0}")]
    Hook(String),
}
