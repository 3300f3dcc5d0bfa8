// identity.rs — Where the interceptor gets its identity vector.
//
// The production source reads the scores artifact produced by the external
// trust pipeline and decays its sovereignty by the drift events recorded
// since that artifact was generated. The artifact is fingerprinted so a
// reload can tell whether anything changed.

use std::path::{Path, PathBuf};

use sov_audit::{DriftLog, SnapshotDigest};
use sov_score::{calculate, SovereigntyCalculation, TrustDebtReport};
use sov_vector::IdentityVector;

use crate::error::InterceptorError;

/// An identity together with what it was computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedIdentity {
    pub identity: IdentityVector,
    /// Present when the identity came from a scores artifact.
    pub calculation: Option<SovereigntyCalculation>,
    /// SHA-256 of the artifact bytes, when one was read.
    pub digest: Option<SnapshotDigest>,
}

impl LoadedIdentity {
    /// The fallback used when no artifact exists.
    pub fn permissive(user_id: impl Into<String>) -> Self {
        Self {
            identity: IdentityVector::permissive(user_id),
            calculation: None,
            digest: None,
        }
    }
}

/// Produces the current identity on demand.
pub trait IdentitySource: Send {
    fn load(&self) -> Result<LoadedIdentity, InterceptorError>;
}

/// Reads `trust-debt-scores.json` and the drift log.
#[derive(Debug, Clone)]
pub struct ScoresFileSource {
    scores_path: PathBuf,
    drift_log: Option<PathBuf>,
    default_user: String,
}

impl ScoresFileSource {
    pub fn new(scores_path: impl AsRef<Path>, default_user: impl Into<String>) -> Self {
        Self {
            scores_path: scores_path.as_ref().to_path_buf(),
            drift_log: None,
            default_user: default_user.into(),
        }
    }

    /// Decay sovereignty by the events in this drift log.
    pub fn with_drift_log(mut self, path: impl AsRef<Path>) -> Self {
        self.drift_log = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn scores_path(&self) -> &Path {
        &self.scores_path
    }

    /// Drift events after the report was generated. An unreadable drift log
    /// counts as zero events.
    fn drift_events(&self, report: &TrustDebtReport) -> u64 {
        let Some(path) = &self.drift_log else {
            return 0;
        };
        match DriftLog::count_since(path, report.generated_at) {
            Ok(n) => n,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    "drift log unreadable, assuming no drift: {}",
                    e
                );
                0
            }
        }
    }
}

impl IdentitySource for ScoresFileSource {
    fn load(&self) -> Result<LoadedIdentity, InterceptorError> {
        let Some((report, bytes)) = TrustDebtReport::load(&self.scores_path)? else {
            tracing::info!(
                path = %self.scores_path.display(),
                "no trust-debt scores found, using permissive identity"
            );
            return Ok(LoadedIdentity::permissive(self.default_user.clone()));
        };

        let calculation = calculate(&report, self.drift_events(&report));
        let user_id = report
            .user_id
            .clone()
            .unwrap_or_else(|| self.default_user.clone());
        let identity = IdentityVector::new(
            user_id,
            calculation.category_scores.clone(),
            calculation.score,
        )
        .updated_at(calculation.timestamp);

        Ok(LoadedIdentity {
            identity,
            calculation: Some(calculation),
            digest: Some(SnapshotDigest::of(&bytes)),
        })
    }
}

/// A fixed identity, for embedding and tests.
#[derive(Debug, Clone)]
pub struct StaticIdentity(pub IdentityVector);

impl IdentitySource for StaticIdentity {
    fn load(&self) -> Result<LoadedIdentity, InterceptorError> {
        Ok(LoadedIdentity {
            identity: self.0.clone(),
            calculation: None,
            digest: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use sov_audit::DriftEvent;
    use sov_vector::Category;
    use tempfile::tempdir;

    fn write_scores(path: &Path, units: u64, generated_at: Option<chrono::DateTime<Utc>>) {
        let mut categories = serde_json::Map::new();
        for category in Category::ALL {
            categories.insert(
                category.as_str().to_string(),
                serde_json::json!({"units": 5, "percentage": 50.0, "grade": "B"}),
            );
        }
        let mut doc = serde_json::json!({
            "userId": "agent-9",
            "totalUnits": units,
            "grade": "A",
            "categories": categories,
        });
        if let Some(at) = generated_at {
            doc["generatedAt"] = serde_json::json!(at);
        }
        std::fs::write(path, serde_json::to_string(&doc).unwrap()).unwrap();
    }

    #[test]
    fn missing_artifact_is_permissive() {
        let dir = tempdir().unwrap();
        let source = ScoresFileSource::new(dir.path().join("trust-debt-scores.json"), "fallback");
        let loaded = source.load().unwrap();
        assert_eq!(loaded.identity.user_id, "fallback");
        assert_eq!(loaded.identity.sovereignty(), 1.0);
        assert!(loaded.digest.is_none());
        assert!(loaded.calculation.is_none());
    }

    #[test]
    fn artifact_yields_scores_and_digest() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("trust-debt-scores.json");
        write_scores(&path, 0, None);
        let loaded = ScoresFileSource::new(&path, "fallback").load().unwrap();
        assert_eq!(loaded.identity.user_id, "agent-9");
        assert_eq!(loaded.identity.sovereignty(), 1.0);
        assert!((loaded.identity.category_scores.get(Category::Security) - 0.8).abs() < 1e-9);
        assert_eq!(loaded.digest.unwrap().as_str().len(), 64);
    }

    #[test]
    fn drift_after_generation_decays_sovereignty() {
        let dir = tempdir().unwrap();
        let scores = dir.path().join("trust-debt-scores.json");
        let drift = dir.path().join("drift.jsonl");
        let generated = Utc::now() - Duration::hours(1);
        write_scores(&scores, 0, Some(generated));

        let mut log = DriftLog::open(&drift).unwrap();
        // Before the snapshot: ignored.
        log.record(&DriftEvent::new("git_push", 0.0, 1.0, "old").at(generated - Duration::hours(2)))
            .unwrap();
        for _ in 0..10 {
            log.record(&DriftEvent::new("git_push", 0.0, 1.0, "new")).unwrap();
        }

        let loaded = ScoresFileSource::new(&scores, "fallback")
            .with_drift_log(&drift)
            .load()
            .unwrap();
        let calc = loaded.calculation.unwrap();
        assert_eq!(calc.drift_events, 10);
        assert!(loaded.identity.sovereignty() < 1.0);
    }

    #[test]
    fn malformed_artifact_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("trust-debt-scores.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = ScoresFileSource::new(&path, "fallback").load().unwrap_err();
        assert!(matches!(err, InterceptorError::Score(_)));
    }
}
