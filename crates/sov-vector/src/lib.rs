//! # sov-vector
//!
//! Trust category vectors for the sovereignty engine.
//!
//! Every identity and every action requirement is expressed over the same
//! 20 fixed [`Category`] dimensions. This crate converts sparse records into
//! dense [`CategoryVector`]s and computes the two comparisons the engine uses:
//!
//! - [`compute_overlap`] — the fraction of a requirement's categories the
//!   identity meets. This is the value permission decisions use.
//! - [`cosine_similarity`] — geometric alignment, reported for analysis only.
//!
//! Everything here is pure and total: empty requirements overlap fully, and
//! zero vectors have zero cosine similarity instead of dividing by zero.

pub mod category;
pub mod error;
pub mod identity;
pub mod overlap;
pub mod vector;

pub use category::{Category, CATEGORY_COUNT};
pub use error::VectorError;
pub use identity::IdentityVector;
pub use overlap::{compute_overlap, CategoryShortfall, Overlap};
pub use vector::{cosine_similarity, dot_product, magnitude, to_vector, CategoryMap, CategoryVector};
