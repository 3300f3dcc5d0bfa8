// scores.rs — The trust-debt scores artifact produced by the external pipeline.
//
// This crate only reads the artifact. Shape:
//
// ```json
// {
//   "generatedAt": "2026-10-01T12:00:00Z",
//   "userId": "agent-7",
//   "totalUnits": 1240,
//   "grade": "B",
//   "categories": {
//     "security": { "units": 40, "percentage": 80.0, "grade": "A" },
//     ...
//   }
// }
// ```
//
// `percentage` is the position within the category's grade band, 0–100,
// where 100 is the top of the band.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sov_vector::{Category, CategoryVector, CATEGORY_COUNT};

use crate::error::ScoreError;
use crate::grade::Grade;

/// Per-category trust-debt breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDebt {
    #[serde(default)]
    pub units: u64,
    /// Position within the grade band, 0–100.
    pub percentage: f64,
    pub grade: Grade,
}

/// The full scores document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustDebtReport {
    /// When the pipeline produced this snapshot. Drift events after this
    /// instant count toward decay.
    #[serde(default)]
    pub generated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user_id: Option<String>,
    pub total_units: u64,
    pub grade: Grade,
    #[serde(default)]
    pub categories: BTreeMap<Category, CategoryDebt>,
}

impl TrustDebtReport {
    /// Parse a report from JSON text.
    pub fn parse(json: &str) -> Result<Self, ScoreError> {
        Self::from_slice(json.as_bytes())
    }

    /// Parse a report from raw artifact bytes. Invalid UTF-8 is malformed.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ScoreError> {
        let report: TrustDebtReport = serde_json::from_slice(bytes)?;
        if report.categories.len() != CATEGORY_COUNT {
            let missing: Vec<&str> = Category::ALL
                .iter()
                .filter(|c| !report.categories.contains_key(c))
                .map(|c| c.as_str())
                .collect();
            tracing::warn!(
                missing = %missing.join(","),
                "trust-debt report is missing categories; they default to 0.0"
            );
        }
        if report.grade != Grade::from_units(report.total_units) {
            tracing::warn!(
                declared = %report.grade,
                units = report.total_units,
                "declared overall grade disagrees with unit count; using unit count"
            );
        }
        Ok(report)
    }

    /// Load a report from disk. Returns `Ok(None)` when the file does not exist.
    pub fn load(path: &Path) -> Result<Option<(Self, Vec<u8>)>, ScoreError> {
        if !path.exists() {
            return Ok(None);
        }
        let bytes = std::fs::read(path).map_err(|source| ScoreError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let report = Self::from_slice(&bytes)?;
        Ok(Some((report, bytes)))
    }

    /// Normalized per-category scores. See [`extract_category_scores`].
    pub fn category_scores(&self) -> CategoryVector {
        extract_category_scores(&self.categories)
    }
}

/// Map each category's grade and in-band percentage to a [0, 1] score by
/// linear interpolation within the grade's score sub-range.
///
/// A → [0.9, 1.0], B → [0.7, 0.9], C → [0.5, 0.7], D → [0.0, 0.5].
pub fn extract_category_scores(categories: &BTreeMap<Category, CategoryDebt>) -> CategoryVector {
    let mut vector = CategoryVector::zero();
    for (category, debt) in categories {
        vector.set(*category, interpolate(debt.grade, debt.percentage));
    }
    vector
}

fn interpolate(grade: Grade, percentage: f64) -> f64 {
    let (low, high) = grade.score_range();
    let fraction = if percentage.is_nan() {
        0.0
    } else {
        (percentage / 100.0).clamp(0.0, 1.0)
    };
    low + (high - low) * fraction
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> String {
        let mut categories = serde_json::Map::new();
        for category in Category::ALL {
            categories.insert(
                category.to_string(),
                serde_json::json!({"units": 10, "percentage": 50.0, "grade": "B"}),
            );
        }
        categories.insert(
            "security".to_string(),
            serde_json::json!({"units": 2, "percentage": 100.0, "grade": "A"}),
        );
        serde_json::json!({
            "generatedAt": "2026-10-01T12:00:00Z",
            "totalUnits": 420,
            "grade": "A",
            "categories": categories,
        })
        .to_string()
    }

    #[test]
    fn interpolation_endpoints() {
        assert!((interpolate(Grade::A, 0.0) - 0.9).abs() < 1e-12);
        assert!((interpolate(Grade::A, 100.0) - 1.0).abs() < 1e-12);
        assert!((interpolate(Grade::B, 50.0) - 0.8).abs() < 1e-12);
        assert!((interpolate(Grade::C, 25.0) - 0.55).abs() < 1e-12);
        assert!((interpolate(Grade::D, 100.0) - 0.5).abs() < 1e-12);
        assert_eq!(interpolate(Grade::D, -40.0), 0.0);
    }

    #[test]
    fn parses_full_report() {
        let report = TrustDebtReport::parse(&sample_json()).unwrap();
        assert_eq!(report.total_units, 420);
        assert_eq!(report.categories.len(), CATEGORY_COUNT);
        let scores = report.category_scores();
        assert!((scores[Category::Security] - 1.0).abs() < 1e-12);
        assert!((scores[Category::Testing] - 0.8).abs() < 1e-12);
    }

    #[test]
    fn partial_report_defaults_missing_categories() {
        let report = TrustDebtReport::parse(
            r#"{"totalUnits": 100, "grade": "A",
                "categories": {"privacy": {"percentage": 0, "grade": "C"}}}"#,
        )
        .unwrap();
        let scores = report.category_scores();
        assert!((scores[Category::Privacy] - 0.5).abs() < 1e-12);
        assert_eq!(scores[Category::Security], 0.0);
        assert!(report.generated_at.is_none());
    }

    #[test]
    fn unknown_category_is_rejected() {
        let result = TrustDebtReport::parse(
            r#"{"totalUnits": 1, "grade": "A",
                "categories": {"vibes": {"percentage": 1, "grade": "A"}}}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn load_missing_file_is_none() {
        let loaded = TrustDebtReport::load(Path::new("/nonexistent/scores.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn load_returns_raw_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        std::fs::write(&path, sample_json()).unwrap();
        let (report, bytes) = TrustDebtReport::load(&path).unwrap().unwrap();
        assert_eq!(report.total_units, 420);
        assert_eq!(bytes, sample_json().into_bytes());
    }

    #[test]
    fn invalid_utf8_artifact_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trust-debt-scores.json");
        let mut bytes = br#"{"userId": ""#.to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe]);
        bytes.extend_from_slice(br#"", "totalUnits": 0, "grade": "A", "categories": {}}"#);
        std::fs::write(&path, &bytes).unwrap();

        let err = TrustDebtReport::load(&path).unwrap_err();
        assert!(matches!(err, ScoreError::Malformed(_)));
    }
}
