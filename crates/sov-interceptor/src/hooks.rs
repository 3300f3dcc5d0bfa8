// hooks.rs — Callbacks the surrounding platform injects into the interceptor.
//
// Hooks run after the verdict is computed. A hook error is logged by the
// interceptor and goes no further; it never changes or delays the verdict.
// Closures with the matching signature implement both traits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::InterceptorError;

/// What a denial hook is told about a denied action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DenialNotice {
    pub tool_name: String,
    pub skill_name: String,
    pub overlap: f64,
    pub sovereignty: f64,
    pub threshold: f64,
    pub min_sovereignty: f64,
    pub failed_categories: Vec<String>,
    pub reason: String,
    pub consecutive_denials: u32,
    pub timestamp: DateTime<Utc>,
}

/// Told about the streak that tripped the drift threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriftNotice {
    pub user_id: String,
    pub consecutive_denials: u32,
    pub lifetime_denials: u64,
    pub sovereignty: f64,
    /// The denial that completed the streak.
    pub last_tool: String,
    pub timestamp: DateTime<Utc>,
}

/// Invoked on every denial (e.g. for transparency reporting).
pub trait DenialHook: Send {
    fn on_denial(&self, notice: &DenialNotice) -> Result<(), InterceptorError>;
}

impl<F> DenialHook for F
where
    F: Fn(&DenialNotice) -> Result<(), InterceptorError> + Send,
{
    fn on_denial(&self, notice: &DenialNotice) -> Result<(), InterceptorError> {
        self(notice)
    }
}

/// Invoked when consecutive denials reach the drift limit, to request a
/// fresh run of the external trust pipeline.
pub trait DriftThresholdHook: Send {
    fn on_drift_threshold(&self, notice: &DriftNotice) -> Result<(), InterceptorError>;
}

impl<F> DriftThresholdHook for F
where
    F: Fn(&DriftNotice) -> Result<(), InterceptorError> + Send,
{
    fn on_drift_threshold(&self, notice: &DriftNotice) -> Result<(), InterceptorError> {
        self(notice)
    }
}
