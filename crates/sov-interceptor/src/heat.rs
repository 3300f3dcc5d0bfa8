// heat.rs — Per-cell usage/denial heat map.
//
// Each action class (see `ActionRequirement::cell_id`) has a HeatCell with a
// four-level state:
//
//   Seed ──3 allows──▶ Building ──10 allows──▶ Productive
//     ▲                    │                        │
//     └──── 3 denials ─────┴────────────────────────┘
//   any ──5 denials──▶ HotBlocked ──review()──▶ Seed
//
// Promotion moves one level per allowed use. HotBlocked is only left through
// an explicit review. The map is monitoring state: it never gates a verdict.
//
// The file is a single JSON document rewritten whole after every update.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::InterceptorError;

/// Allowed uses at which a Seed cell becomes Building.
pub const BUILDING_AT_TASKS: u64 = 3;
/// Allowed uses at which a Building cell becomes Productive.
pub const PRODUCTIVE_AT_TASKS: u64 = 10;
/// Denials at which a cell falls back to Seed.
pub const SEED_AT_DENIALS: u64 = 3;
/// Denials at which a cell is blocked pending review.
pub const HOT_BLOCKED_AT_DENIALS: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HeatState {
    #[serde(rename = "S")]
    Seed,
    #[serde(rename = "B")]
    Building,
    #[serde(rename = "P")]
    Productive,
    #[serde(rename = "H")]
    HotBlocked,
}

impl HeatState {
    pub fn letter(self) -> char {
        match self {
            HeatState::Seed => 'S',
            HeatState::Building => 'B',
            HeatState::Productive => 'P',
            HeatState::HotBlocked => 'H',
        }
    }
}

impl fmt::Display for HeatState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            HeatState::Seed => "seed",
            HeatState::Building => "building",
            HeatState::Productive => "productive",
            HeatState::HotBlocked => "hot-blocked",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatCell {
    pub state: HeatState,
    pub last_update: DateTime<Utc>,
    /// Allowed uses.
    pub task_count: u64,
    pub denials: u64,
}

impl HeatCell {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            state: HeatState::Seed,
            last_update: now,
            task_count: 0,
            denials: 0,
        }
    }

    fn allow(&mut self, now: DateTime<Utc>) {
        self.task_count += 1;
        self.last_update = now;
        self.state = match self.state {
            HeatState::Seed if self.task_count >= BUILDING_AT_TASKS => HeatState::Building,
            HeatState::Building if self.task_count >= PRODUCTIVE_AT_TASKS => HeatState::Productive,
            other => other,
        };
    }

    fn deny(&mut self, now: DateTime<Utc>) {
        self.denials += 1;
        self.last_update = now;
        if self.denials >= HOT_BLOCKED_AT_DENIALS {
            self.state = HeatState::HotBlocked;
        } else if self.denials >= SEED_AT_DENIALS && self.state != HeatState::HotBlocked {
            self.state = HeatState::Seed;
        }
    }
}

/// A state change caused by one update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeatTransition {
    pub from: HeatState,
    pub to: HeatState,
}

/// The on-disk heat-map document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatMapDocument {
    #[serde(default)]
    pub cells: BTreeMap<String, HeatCell>,
    /// Sovereignty at the most recent update.
    #[serde(default)]
    pub sovereignty: f64,
    pub last_update: DateTime<Utc>,
}

impl Default for HeatMapDocument {
    fn default() -> Self {
        Self {
            cells: BTreeMap::new(),
            sovereignty: 0.0,
            last_update: Utc::now(),
        }
    }
}

/// The heat map and the file it persists to.
#[derive(Debug, Clone)]
pub struct HeatMap {
    path: PathBuf,
    document: HeatMapDocument,
}

impl HeatMap {
    /// An empty map that will persist to `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            document: HeatMapDocument::default(),
        }
    }

    /// Load from `path`. Missing file ⇒ empty map.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InterceptorError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Ok(Self::new(path));
        }
        let data = fs::read_to_string(&path).map_err(|source| InterceptorError::HeatMapIo {
            path: path.clone(),
            source,
        })?;
        let document: HeatMapDocument = serde_json::from_str(&data)?;
        Ok(Self { path, document })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &HeatMapDocument {
        &self.document
    }

    pub fn get(&self, cell_id: &str) -> Option<&HeatCell> {
        self.document.cells.get(cell_id)
    }

    pub fn cells(&self) -> impl Iterator<Item = (&str, &HeatCell)> {
        self.document.cells.iter().map(|(id, cell)| (id.as_str(), cell))
    }

    /// Cells currently blocked pending review.
    pub fn hot_blocked(&self) -> Vec<&str> {
        self.cells()
            .filter(|(_, cell)| cell.state == HeatState::HotBlocked)
            .map(|(id, _)| id)
            .collect()
    }

    /// Count an allowed use. Returns the transition, if the state changed.
    pub fn record_allow(&mut self, cell_id: &str, sovereignty: f64) -> Option<HeatTransition> {
        self.update(cell_id, sovereignty, HeatCell::allow)
    }

    /// Count a denial. Returns the transition, if the state changed.
    pub fn record_deny(&mut self, cell_id: &str, sovereignty: f64) -> Option<HeatTransition> {
        self.update(cell_id, sovereignty, HeatCell::deny)
    }

    fn update(
        &mut self,
        cell_id: &str,
        sovereignty: f64,
        apply: fn(&mut HeatCell, DateTime<Utc>),
    ) -> Option<HeatTransition> {
        let now = Utc::now();
        let cell = self
            .document
            .cells
            .entry(cell_id.to_string())
            .or_insert_with(|| HeatCell::new(now));
        let from = cell.state;
        apply(cell, now);
        let to = cell.state;

        self.document.sovereignty = sovereignty;
        self.document.last_update = now;
        (from != to).then_some(HeatTransition { from, to })
    }

    /// Clear a cell after human review: back to Seed with zeroed counters.
    pub fn review(&mut self, cell_id: &str) -> Result<HeatTransition, InterceptorError> {
        let now = Utc::now();
        let cell = self
            .document
            .cells
            .get_mut(cell_id)
            .ok_or_else(|| InterceptorError::UnknownCell(cell_id.to_string()))?;
        let from = cell.state;
        *cell = HeatCell::new(now);
        self.document.last_update = now;
        tracing::info!(cell = cell_id, from = %from, "heat cell reviewed and reset");
        Ok(HeatTransition {
            from,
            to: HeatState::Seed,
        })
    }

    /// Overwrite the file with the current document.
    pub fn save(&self) -> Result<(), InterceptorError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| InterceptorError::HeatMapIo {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(&self.document)?;
        fs::write(&self.path, json).map_err(|source| InterceptorError::HeatMapIo {
            path: self.path.clone(),
            source,
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn map() -> HeatMap {
        HeatMap::new("/unused/heat-map.json")
    }

    #[test]
    fn promotes_seed_to_building_at_three() {
        let mut heat = map();
        assert_eq!(heat.record_allow("testing.high", 0.9), None);
        assert_eq!(heat.record_allow("testing.high", 0.9), None);
        assert_eq!(
            heat.record_allow("testing.high", 0.9),
            Some(HeatTransition {
                from: HeatState::Seed,
                to: HeatState::Building
            })
        );
        assert_eq!(heat.get("testing.high").unwrap().task_count, 3);
    }

    #[test]
    fn promotes_building_to_productive_at_ten() {
        let mut heat = map();
        for _ in 0..9 {
            heat.record_allow("security.medium", 0.9);
        }
        assert_eq!(heat.get("security.medium").unwrap().state, HeatState::Building);
        heat.record_allow("security.medium", 0.9);
        assert_eq!(heat.get("security.medium").unwrap().state, HeatState::Productive);
    }

    #[test]
    fn three_denials_demote_to_seed() {
        let mut heat = map();
        for _ in 0..10 {
            heat.record_allow("security.high", 0.9);
        }
        heat.record_deny("security.high", 0.6);
        heat.record_deny("security.high", 0.6);
        assert_eq!(heat.get("security.high").unwrap().state, HeatState::Productive);
        let t = heat.record_deny("security.high", 0.6).unwrap();
        assert_eq!(t.from, HeatState::Productive);
        assert_eq!(t.to, HeatState::Seed);
    }

    #[test]
    fn five_denials_block_until_review() {
        let mut heat = map();
        for _ in 0..5 {
            heat.record_deny("security.critical", 0.5);
        }
        assert_eq!(heat.get("security.critical").unwrap().state, HeatState::HotBlocked);
        assert_eq!(heat.hot_blocked(), vec!["security.critical"]);

        // Allows do not unblock.
        for _ in 0..12 {
            heat.record_allow("security.critical", 0.95);
        }
        assert_eq!(heat.get("security.critical").unwrap().state, HeatState::HotBlocked);

        let t = heat.review("security.critical").unwrap();
        assert_eq!(t.from, HeatState::HotBlocked);
        let cell = heat.get("security.critical").unwrap();
        assert_eq!(cell.state, HeatState::Seed);
        assert_eq!(cell.denials, 0);
        assert_eq!(cell.task_count, 0);
    }

    #[test]
    fn review_unknown_cell_fails() {
        let mut heat = map();
        assert!(matches!(
            heat.review("nope.low"),
            Err(InterceptorError::UnknownCell(_))
        ));
    }

    #[test]
    fn save_overwrites_whole_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("heat-map.json");
        let mut heat = HeatMap::new(&path);
        heat.record_allow("general.low", 0.8);
        heat.save().unwrap();
        heat.record_deny("testing.high", 0.4);
        heat.save().unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["sovereignty"], 0.4);
        assert_eq!(value["cells"]["general.low"]["taskCount"], 1);
        assert_eq!(value["cells"]["testing.high"]["state"], "S");
        assert!(value.get("lastUpdate").is_some());

        let reloaded = HeatMap::load(&path).unwrap();
        assert_eq!(reloaded.document(), heat.document());
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let heat = HeatMap::load(dir.path().join("heat-map.json")).unwrap();
        assert_eq!(heat.cells().count(), 0);
    }
}
