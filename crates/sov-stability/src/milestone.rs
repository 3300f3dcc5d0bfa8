// milestone.rs — One-time records of sustained 30-day stability.
//
// Milestones live in a single JSON array file. The file is rewritten whole on
// each save; it is small (a few entries per year at most).

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StabilityError;

/// Milestones closer together than this are considered duplicates.
pub const MILESTONE_DEDUP_DAYS: i64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StabilityMilestone {
    pub achieved_at: DateTime<Utc>,
    pub score: f64,
    pub stable_days: usize,
    /// Whether the artifact hook ran and succeeded.
    pub artifact_generated: bool,
    /// Whether the notification hook ran and succeeded.
    pub notification_sent: bool,
}

impl StabilityMilestone {
    pub fn new(achieved_at: DateTime<Utc>, score: f64, stable_days: usize) -> Self {
        Self {
            achieved_at,
            score,
            stable_days,
            artifact_generated: false,
            notification_sent: false,
        }
    }
}

/// JSON-array file of milestones.
#[derive(Debug, Clone)]
pub struct MilestoneStore {
    path: PathBuf,
}

impl MilestoneStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All milestones in stored order. Missing file ⇒ empty.
    pub fn load(&self) -> Result<Vec<StabilityMilestone>, StabilityError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&self.path).map_err(|source| StabilityError::IoError {
            path: self.path.clone(),
            source,
        })?;
        if data.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&data)?)
    }

    pub fn save(&self, milestones: &[StabilityMilestone]) -> Result<(), StabilityError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StabilityError::IoError {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(milestones)?;
        fs::write(&self.path, json).map_err(|source| StabilityError::IoError {
            path: self.path.clone(),
            source,
        })?;
        Ok(())
    }

    /// Append one milestone, preserving the existing ones.
    pub fn append(&self, milestone: StabilityMilestone) -> Result<(), StabilityError> {
        let mut all = self.load()?;
        all.push(milestone);
        self.save(&all)
    }

    /// The milestone achieved within the dedup window before `now`, if any.
    pub fn recent(&self, now: DateTime<Utc>) -> Result<Option<StabilityMilestone>, StabilityError> {
        let window = Duration::days(MILESTONE_DEDUP_DAYS);
        Ok(self
            .load()?
            .into_iter()
            .filter(|m| now - m.achieved_at < window)
            .max_by_key(|m| m.achieved_at))
    }

    pub fn latest(&self) -> Result<Option<StabilityMilestone>, StabilityError> {
        Ok(self.load()?.into_iter().max_by_key(|m| m.achieved_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_store_is_empty() {
        let dir = tempdir().unwrap();
        let store = MilestoneStore::new(dir.path().join("milestones.json"));
        assert!(store.load().unwrap().is_empty());
        assert!(store.latest().unwrap().is_none());
    }

    #[test]
    fn append_keeps_earlier_entries() {
        let dir = tempdir().unwrap();
        let store = MilestoneStore::new(dir.path().join("milestones.json"));
        let now = Utc::now();
        store
            .append(StabilityMilestone::new(now - Duration::days(90), 0.8, 30))
            .unwrap();
        store.append(StabilityMilestone::new(now, 0.85, 31)).unwrap();

        let all = store.load().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(store.latest().unwrap().unwrap().stable_days, 31);
    }

    #[test]
    fn recent_respects_thirty_day_window() {
        let dir = tempdir().unwrap();
        let store = MilestoneStore::new(dir.path().join("milestones.json"));
        let now = Utc::now();
        store
            .append(StabilityMilestone::new(now - Duration::days(29), 0.8, 30))
            .unwrap();
        assert!(store.recent(now).unwrap().is_some());
        assert!(store.recent(now + Duration::days(2)).unwrap().is_none());
    }

    #[test]
    fn file_is_a_json_array() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("milestones.json");
        let store = MilestoneStore::new(&path);
        store.append(StabilityMilestone::new(Utc::now(), 0.9, 30)).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["stableDays"], 30);
        assert_eq!(value[0]["artifactGenerated"], false);
    }
}
