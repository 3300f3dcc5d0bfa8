pub mod audit;
pub mod check;
pub mod heat;
pub mod identity;
pub mod registry;
pub mod sovereignty;
pub mod stability;

use serde::Serialize;
use sov_interceptor::{EngineConfig, IdentitySource, LoadedIdentity, ScoresFileSource};

/// Pretty-print any serializable value to stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// The identity the interceptor would load right now.
pub fn load_identity(config: &EngineConfig) -> anyhow::Result<LoadedIdentity> {
    let settings = config.load_settings()?;
    let source = ScoresFileSource::new(&config.scores_file, settings.user_id)
        .with_drift_log(&config.drift_log);
    Ok(source.load()?)
}
