// error.rs — Error types for the vector model.
//
// The math itself is total and never fails; errors only arise at the
// boundary where sparse external records are converted into vectors.

use thiserror::Error;

/// Errors that can occur while building category vectors.
#[derive(Debug, Error)]
pub enum VectorError {
    /// A category name did not match any of the 20 fixed categories.
    #[error("unknown trust category '{0}'")]
    UnknownCategory(String),

    /// A category score fell outside [0, 1] (or was NaN).
    #[error("score for category '{category}' out of range: {value}")]
    ScoreOutOfRange { category: String, value: f64 },
}
