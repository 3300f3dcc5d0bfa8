// overlap.rs — Dimensional pass/fail overlap between identity and requirement.
//
// For each category a requirement names, the identity either meets the
// minimum or it does not. Overlap is the fraction of named categories that
// pass. One failing axis is exactly one unit of failure regardless of how
// the rest of the vector looks, which is what the permission decision keys on.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::vector::{CategoryMap, CategoryVector};

/// A single category where the identity fell below the required minimum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryShortfall {
    pub category: Category,
    pub actual: f64,
    pub required: f64,
}

impl fmt::Display for CategoryShortfall {
    /// Renders as `"security: 0.65 < 0.7"`, the format stored in audit records.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} < {}", self.category, self.actual, self.required)
    }
}

/// Result of comparing an identity against a requirement's minimums.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overlap {
    /// Fraction of required categories that passed, in [0, 1].
    pub ratio: f64,
    /// Number of required categories that passed.
    pub passed: usize,
    /// Number of categories the requirement names.
    pub required: usize,
    /// Categories that failed, in canonical category order.
    pub shortfalls: Vec<CategoryShortfall>,
}

impl Overlap {
    /// Human-readable shortfall strings, e.g. `["security: 0.65 < 0.7"]`.
    pub fn failed_categories(&self) -> Vec<String> {
        self.shortfalls.iter().map(|s| s.to_string()).collect()
    }
}

/// Compute the dimensional overlap of `identity` with `requirement`.
///
/// An empty requirement is trivially satisfied (ratio 1.0).
pub fn compute_overlap(identity: &CategoryVector, requirement: &CategoryMap) -> Overlap {
    if requirement.is_empty() {
        return Overlap {
            ratio: 1.0,
            passed: 0,
            required: 0,
            shortfalls: Vec::new(),
        };
    }

    let mut shortfalls = Vec::new();
    for (category, minimum) in requirement {
        let actual = identity.get(*category);
        if actual < *minimum {
            shortfalls.push(CategoryShortfall {
                category: *category,
                actual,
                required: *minimum,
            });
        }
    }

    let required = requirement.len();
    let passed = required - shortfalls.len();
    Overlap {
        ratio: passed as f64 / required as f64,
        passed,
        required,
        shortfalls,
    }
}
