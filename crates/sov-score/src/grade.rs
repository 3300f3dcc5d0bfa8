// grade.rs — Trust-debt letter grades.
//
// Four bands over trust-debt units. The description and emoji are for
// reports; nothing branches on them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScoreError;

/// Letter grade for a trust-debt measurement. Ordered best (A) to worst (D).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
}

impl Grade {
    /// Best to worst.
    pub const ALL: [Grade; 4] = [Grade::A, Grade::B, Grade::C, Grade::D];

    /// Grade for a unit count: A [0,500], B [501,1500], C [1501,3000], D [3001,∞).
    pub fn from_units(units: u64) -> Self {
        match units {
            0..=500 => Grade::A,
            501..=1500 => Grade::B,
            1501..=3000 => Grade::C,
            _ => Grade::D,
        }
    }

    /// Inclusive unit range of this band. D has no upper bound.
    pub fn unit_range(self) -> (u64, Option<u64>) {
        match self {
            Grade::A => (0, Some(500)),
            Grade::B => (501, Some(1500)),
            Grade::C => (1501, Some(3000)),
            Grade::D => (3001, None),
        }
    }

    /// Normalized category-score sub-range for this grade.
    pub fn score_range(self) -> (f64, f64) {
        match self {
            Grade::A => (0.9, 1.0),
            Grade::B => (0.7, 0.9),
            Grade::C => (0.5, 0.7),
            Grade::D => (0.0, 0.5),
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Grade::A => "Excellent: minimal trust debt",
            Grade::B => "Good: manageable trust debt",
            Grade::C => "Fair: significant trust debt",
            Grade::D => "Poor: critical trust debt",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Grade::A => "🟢",
            Grade::B => "🟡",
            Grade::C => "🟠",
            Grade::D => "🔴",
        }
    }

    /// Grades strictly better than this one, nearest first.
    pub fn better_grades(self) -> Vec<Grade> {
        let mut better: Vec<Grade> = Grade::ALL.iter().copied().filter(|g| *g < self).collect();
        better.reverse();
        better
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
        };
        f.pad(letter)
    }
}

impl FromStr for Grade {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(Grade::A),
            "B" | "b" => Ok(Grade::B),
            "C" | "c" => Ok(Grade::C),
            "D" | "d" => Ok(Grade::D),
            other => Err(ScoreError::UnknownGrade(other.to_string())),
        }
    }
}
