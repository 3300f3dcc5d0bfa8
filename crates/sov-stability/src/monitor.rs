// monitor.rs — The stability monitor: record, analyze, and emit milestones.
//
// The monitor keeps no state between calls beyond its two files, so a
// scheduler can invoke it daily (or twice, or late) and get the same answer
// for the same history.
//
// Milestone hooks (artifact generation, notification) are invoked in turn.
// A hook error or panic is logged and recorded as `false` on the milestone;
// it never prevents the milestone from being saved.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sov_score::SovereigntyCalculation;

use crate::analysis::{analyze, StabilityAnalysis};
use crate::error::StabilityError;
use crate::history::MeasurementHistory;
use crate::measurement::StabilityMeasurement;
use crate::milestone::{MilestoneStore, StabilityMilestone};

/// A side effect run once when a milestone is created.
pub trait MilestoneHook: Send {
    fn on_milestone(
        &self,
        milestone: &StabilityMilestone,
        analysis: &StabilityAnalysis,
    ) -> Result<(), StabilityError>;
}

impl<F> MilestoneHook for F
where
    F: Fn(&StabilityMilestone, &StabilityAnalysis) -> Result<(), StabilityError> + Send,
{
    fn on_milestone(
        &self,
        milestone: &StabilityMilestone,
        analysis: &StabilityAnalysis,
    ) -> Result<(), StabilityError> {
        self(milestone, analysis)
    }
}

/// What a stability check concluded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CheckOutcome {
    /// Fewer than the required stable days.
    NotStable,
    /// Stable, but a milestone already exists within the dedup window.
    AlreadyRecorded { achieved_at: DateTime<Utc> },
    /// Stable, and a new milestone was written.
    MilestoneCreated { milestone: StabilityMilestone },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilityCheck {
    pub analysis: StabilityAnalysis,
    #[serde(flatten)]
    pub outcome: CheckOutcome,
}

impl StabilityCheck {
    pub fn created_milestone(&self) -> Option<&StabilityMilestone> {
        match &self.outcome {
            CheckOutcome::MilestoneCreated { milestone } => Some(milestone),
            _ => None,
        }
    }
}

pub struct StabilityMonitor {
    history: MeasurementHistory,
    milestones: MilestoneStore,
    artifact_hook: Option<Box<dyn MilestoneHook>>,
    notify_hook: Option<Box<dyn MilestoneHook>>,
}

impl StabilityMonitor {
    pub fn new(history_path: impl AsRef<Path>, milestones_path: impl AsRef<Path>) -> Self {
        Self {
            history: MeasurementHistory::new(history_path),
            milestones: MilestoneStore::new(milestones_path),
            artifact_hook: None,
            notify_hook: None,
        }
    }

    /// Hook that renders the milestone artifact.
    pub fn with_artifact_hook(mut self, hook: impl MilestoneHook + 'static) -> Self {
        self.artifact_hook = Some(Box::new(hook));
        self
    }

    /// Hook that announces the milestone.
    pub fn with_notify_hook(mut self, hook: impl MilestoneHook + 'static) -> Self {
        self.notify_hook = Some(Box::new(hook));
        self
    }

    pub fn history(&self) -> &MeasurementHistory {
        &self.history
    }

    pub fn milestones(&self) -> &MilestoneStore {
        &self.milestones
    }

    pub fn record_measurement(
        &self,
        measurement: &StabilityMeasurement,
    ) -> Result<(), StabilityError> {
        self.history.record(measurement)?;
        tracing::debug!(
            score = measurement.score,
            source = %measurement.source,
            "stability measurement recorded"
        );
        Ok(())
    }

    pub fn analyze_stability(&self) -> Result<StabilityAnalysis, StabilityError> {
        Ok(analyze(&self.history.load_newest_first()?))
    }

    /// Record today's sample, then check stability as of its timestamp.
    pub fn daily_check(
        &self,
        calculation: &SovereigntyCalculation,
        source: &str,
    ) -> Result<StabilityCheck, StabilityError> {
        let measurement = StabilityMeasurement::from_calculation(calculation, source);
        self.record_measurement(&measurement)?;
        self.check_stability_at(measurement.timestamp)
    }

    pub fn check_stability(&self) -> Result<StabilityCheck, StabilityError> {
        self.check_stability_at(Utc::now())
    }

    /// Analyze the history and create a milestone if newly stable.
    pub fn check_stability_at(&self, now: DateTime<Utc>) -> Result<StabilityCheck, StabilityError> {
        let analysis = self.analyze_stability()?;
        if !analysis.is_stable {
            return Ok(StabilityCheck {
                analysis,
                outcome: CheckOutcome::NotStable,
            });
        }

        if let Some(existing) = self.milestones.recent(now)? {
            tracing::debug!(
                achieved_at = %existing.achieved_at,
                "stable, milestone already recorded in window"
            );
            return Ok(StabilityCheck {
                analysis,
                outcome: CheckOutcome::AlreadyRecorded {
                    achieved_at: existing.achieved_at,
                },
            });
        }

        let mut milestone = StabilityMilestone::new(
            now,
            analysis.current_score.unwrap_or_default(),
            analysis.stable_days,
        );
        milestone.artifact_generated =
            run_hook("artifact", self.artifact_hook.as_deref(), &milestone, &analysis);
        milestone.notification_sent =
            run_hook("notify", self.notify_hook.as_deref(), &milestone, &analysis);

        self.milestones.append(milestone.clone())?;
        tracing::info!(
            score = milestone.score,
            stable_days = milestone.stable_days,
            artifact = milestone.artifact_generated,
            notified = milestone.notification_sent,
            "stability milestone achieved"
        );

        Ok(StabilityCheck {
            analysis,
            outcome: CheckOutcome::MilestoneCreated { milestone },
        })
    }
}

/// `true` only when a hook is present and succeeds.
fn run_hook(
    name: &str,
    hook: Option<&dyn MilestoneHook>,
    milestone: &StabilityMilestone,
    analysis: &StabilityAnalysis,
) -> bool {
    let Some(hook) = hook else {
        return false;
    };
    match panic::catch_unwind(AssertUnwindSafe(|| hook.on_milestone(milestone, analysis))) {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            tracing::warn!(hook = name, "milestone hook failed: {}", e);
            false
        }
        Err(payload) => {
            tracing::warn!(hook = name, "milestone hook panicked: {}", panic_message(&*payload));
            false
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}
