//! # sov-interceptor
//!
//! The runtime entry point of the sovereignty engine. An [`Interceptor`]
//! wraps every skill or tool invocation an agent attempts and returns a
//! [`Verdict`]:
//!
//! - exempt skills pass untouched;
//! - unknown skills and unregistered tools **fail open** and are recorded on
//!   the fail-open trail;
//! - everything else is checked by overlap and sovereignty, audited, counted
//!   on the [`HeatMap`], and on denial fed back into the drift loop.
//!
//! Persistence and hook failures are logged and never change a verdict.
//!
//! ```rust,no_run
//! use sov_interceptor::{EngineConfig, Interceptor, InterceptorBuilder};
//!
//! let config = EngineConfig::for_project(".");
//! let settings = config.load_settings().unwrap();
//! let mut gate: Interceptor = InterceptorBuilder::from_config(&config, &settings)
//!     .unwrap()
//!     .build();
//! if !gate.intercept_skill("git-push").is_allowed() {
//!     eprintln!("git push denied");
//! }
//! ```

pub mod config;
pub mod error;
pub mod heat;
pub mod hooks;
pub mod identity;
pub mod interceptor;

pub use config::{EngineConfig, InterceptorSettings};
pub use error::InterceptorError;
pub use heat::{HeatCell, HeatMap, HeatMapDocument, HeatState, HeatTransition};
pub use hooks::{DenialHook, DenialNotice, DriftNotice, DriftThresholdHook};
pub use identity::{IdentitySource, LoadedIdentity, ScoresFileSource, StaticIdentity};
pub use interceptor::{
    Interceptor, InterceptorBuilder, InterceptorStats, ReloadOutcome, Verdict,
    DEFAULT_DRIFT_DENIAL_LIMIT,
};
