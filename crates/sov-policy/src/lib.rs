//! # sov-policy
//!
//! Action requirements and permission composition for the sovereignty engine.
//!
//! - [`RequirementRegistry`] maps tool names to [`ActionRequirement`]s
//!   (sparse category minimums plus a minimum sovereignty). The built-in
//!   table can be extended by operators from a YAML file.
//! - [`SkillRouting`] resolves invoked skill names to tool names and holds
//!   the exemption list.
//! - [`PermissionEngine`] composes the two gates into a [`PermissionResult`].
//!
//! ## Key invariants
//!
//! - `allowed` ⇔ `overlap >= threshold` **and** `sovereignty >= min_sovereignty`.
//! - An empty requirement overlaps fully; only sovereignty can deny it.
//! - [`RiskTier`] is derived from `min_sovereignty` and never enforces anything.

pub mod engine;
pub mod error;
pub mod registry;
pub mod requirement;
pub mod routing;

pub use engine::{PermissionEngine, PermissionResult, DEFAULT_OVERLAP_THRESHOLD};
pub use error::PolicyError;
pub use registry::{RequirementRegistry, RequirementsFile};
pub use requirement::{ActionRequirement, RiskTier};
pub use routing::{Resolution, SkillRouting};
