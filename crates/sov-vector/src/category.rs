// category.rs — The closed set of trust dimensions.
//
// Every identity and requirement vector has exactly one slot per category,
// in the order declared here. The order is part of the data model: dense
// vectors are indexed by `Category::index()`, so reordering variants would
// silently change the meaning of stored vectors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::VectorError;

/// Number of trust dimensions. All dense vectors have this length.
pub const CATEGORY_COUNT: usize = 20;

/// One of the 20 fixed, orthogonal trust dimensions.
///
/// Serialized as snake_case strings (e.g. `"security"`), which is also the
/// key format of the external trust-debt scores artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Security,
    Reliability,
    Testing,
    Compliance,
    Transparency,
    Documentation,
    Performance,
    Maintainability,
    Privacy,
    Accountability,
    Accuracy,
    Availability,
    Scalability,
    Observability,
    Integrity,
    Accessibility,
    Efficiency,
    Safety,
    Governance,
    Auditability,
}

impl Category {
    /// All categories in canonical vector order.
    pub const ALL: [Category; CATEGORY_COUNT] = [
        Category::Security,
        Category::Reliability,
        Category::Testing,
        Category::Compliance,
        Category::Transparency,
        Category::Documentation,
        Category::Performance,
        Category::Maintainability,
        Category::Privacy,
        Category::Accountability,
        Category::Accuracy,
        Category::Availability,
        Category::Scalability,
        Category::Observability,
        Category::Integrity,
        Category::Accessibility,
        Category::Efficiency,
        Category::Safety,
        Category::Governance,
        Category::Auditability,
    ];

    /// Position of this category in a dense vector.
    pub fn index(self) -> usize {
        self as usize
    }

    /// The stable external name (same as the serde representation).
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Security => "security",
            Category::Reliability => "reliability",
            Category::Testing => "testing",
            Category::Compliance => "compliance",
            Category::Transparency => "transparency",
            Category::Documentation => "documentation",
            Category::Performance => "performance",
            Category::Maintainability => "maintainability",
            Category::Privacy => "privacy",
            Category::Accountability => "accountability",
            Category::Accuracy => "accuracy",
            Category::Availability => "availability",
            Category::Scalability => "scalability",
            Category::Observability => "observability",
            Category::Integrity => "integrity",
            Category::Accessibility => "accessibility",
            Category::Efficiency => "efficiency",
            Category::Safety => "safety",
            Category::Governance => "governance",
            Category::Auditability => "auditability",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Category {
    type Err = VectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| VectorError::UnknownCategory(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_matches_canonical_order() {
        for (i, category) in Category::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("Security".parse::<Category>().unwrap(), Category::Security);
        assert_eq!(" testing ".parse::<Category>().unwrap(), Category::Testing);
    }

    #[test]
    fn parse_rejects_unknown_names() {
        let err = "charisma".parse::<Category>().unwrap_err();
        assert!(matches!(err, VectorError::UnknownCategory(name) if name == "charisma"));
    }

    #[test]
    fn serde_name_matches_display() {
        for category in Category::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category));
        }
    }
}
