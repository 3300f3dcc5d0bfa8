// vector.rs — Dense 20-dimensional trust vectors and their geometry.
//
// Internally every profile is a fixed `[f64; CATEGORY_COUNT]`, so indexing by
// category is exhaustive at compile time. The sparse map form
// (`{"security": 0.75}`) only exists at the serialization boundary.

use std::collections::BTreeMap;
use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::category::{Category, CATEGORY_COUNT};
use crate::error::VectorError;

/// A sparse category → score map, as found in external records.
pub type CategoryMap = BTreeMap<Category, f64>;

/// A dense vector with one score per category, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CategoryMap", into = "CategoryMap")]
pub struct CategoryVector {
    values: [f64; CATEGORY_COUNT],
}

impl CategoryVector {
    /// The all-zero vector (every category unset).
    pub fn zero() -> Self {
        Self {
            values: [0.0; CATEGORY_COUNT],
        }
    }

    /// Score for one category (0.0 when unset).
    pub fn get(&self, category: Category) -> f64 {
        self.values[category.index()]
    }

    /// Set one category, clamping into [0, 1]. NaN is stored as 0.0.
    pub fn set(&mut self, category: Category, value: f64) {
        self.values[category.index()] = clamp_unit(value);
    }

    /// Builder form of [`CategoryVector::set`].
    pub fn with(mut self, category: Category, value: f64) -> Self {
        self.set(category, value);
        self
    }

    /// Raw values in canonical order.
    pub fn as_array(&self) -> &[f64; CATEGORY_COUNT] {
        &self.values
    }

    /// Iterate `(category, score)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        Category::ALL.iter().map(move |c| (*c, self.values[c.index()]))
    }

    /// Sparse form, omitting zero entries.
    pub fn to_map(&self) -> CategoryMap {
        self.iter().filter(|(_, v)| *v != 0.0).collect()
    }
}

impl Default for CategoryVector {
    fn default() -> Self {
        Self::zero()
    }
}

impl Index<Category> for CategoryVector {
    type Output = f64;

    fn index(&self, category: Category) -> &f64 {
        &self.values[category.index()]
    }
}

/// Strict conversion used when deserializing: out-of-range scores are rejected
/// rather than clamped, so a corrupt snapshot is noticed.
impl TryFrom<CategoryMap> for CategoryVector {
    type Error = VectorError;

    fn try_from(map: CategoryMap) -> Result<Self, Self::Error> {
        let mut vector = Self::zero();
        for (category, value) in map {
            if !(0.0..=1.0).contains(&value) {
                return Err(VectorError::ScoreOutOfRange {
                    category: category.to_string(),
                    value,
                });
            }
            vector.values[category.index()] = value;
        }
        Ok(vector)
    }
}

impl From<CategoryVector> for CategoryMap {
    fn from(vector: CategoryVector) -> Self {
        vector.to_map()
    }
}

/// Convert a sparse map into a dense vector. Missing categories become 0.0.
///
/// Total: values outside [0, 1] are clamped instead of rejected.
pub fn to_vector(map: &CategoryMap) -> CategoryVector {
    let mut vector = CategoryVector::zero();
    for (category, value) in map {
        vector.set(*category, *value);
    }
    vector
}

/// Sum of element-wise products.
pub fn dot_product(a: &CategoryVector, b: &CategoryVector) -> f64 {
    a.values
        .iter()
        .zip(b.values.iter())
        .map(|(x, y)| x * y)
        .sum()
}

/// Euclidean length.
pub fn magnitude(v: &CategoryVector) -> f64 {
    dot_product(v, v).sqrt()
}

/// `dot / (|a| |b|)`, or 0.0 when either vector has zero length.
///
/// Informational only: permission decisions use [`crate::compute_overlap`].
pub fn cosine_similarity(a: &CategoryVector, b: &CategoryVector) -> f64 {
    let denominator = magnitude(a) * magnitude(b);
    if denominator == 0.0 {
        return 0.0;
    }
    dot_product(a, b) / denominator
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
