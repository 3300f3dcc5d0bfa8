// check.rs — Run one invocation through the interceptor.

use sov_interceptor::{EngineConfig, Interceptor, InterceptorBuilder, ScoresFileSource, Verdict};

pub fn execute(
    config: &EngineConfig,
    name: &str,
    as_tool: bool,
    dry_run: bool,
    json: bool,
) -> anyhow::Result<()> {
    let settings = config.load_settings()?;
    let mut gate: Interceptor = if dry_run {
        // No trails: the verdict is computed and nothing is written.
        tracing::debug!(name, "dry run, no trails attached");
        Interceptor::builder()
            .registry(config.registry()?)
            .routing(settings.routing())
            .threshold(settings.overlap_threshold)
            .default_user(settings.user_id.clone())
            .identity_source(
                ScoresFileSource::new(&config.scores_file, settings.user_id.clone())
                    .with_drift_log(&config.drift_log),
            )
            .build()
    } else {
        InterceptorBuilder::from_config(config, &settings)?.build()
    };

    let verdict = if as_tool {
        gate.intercept_tool(name)
    } else {
        gate.intercept_skill(name)
    };

    if json {
        return super::print_json(&verdict);
    }

    match &verdict {
        Verdict::Exempt { skill_name } => {
            println!("ALLOW  {} (exempt, not checked)", skill_name);
        }
        Verdict::FailOpen {
            skill_name,
            tool_name,
            reason,
        } => {
            println!(
                "ALLOW  {} -> {} (fail-open: {})",
                skill_name,
                tool_name.as_deref().unwrap_or("?"),
                reason
            );
            if !dry_run {
                println!("       recorded in {}", config.fail_open_log.display());
            }
        }
        Verdict::Checked {
            skill_name,
            tool_name,
            cell_id,
            result,
        } => {
            let decision = if result.allowed { "ALLOW" } else { "DENY " };
            println!("{}  {} -> {} [{}]", decision, skill_name, tool_name, cell_id);
            println!(
                "       overlap     {:.3} (threshold {:.2})",
                result.overlap, result.threshold
            );
            println!(
                "       sovereignty {:.3} (required {:.2})",
                result.sovereignty, result.min_sovereignty
            );
            println!("       alignment   {:.3}", result.alignment);
            if !result.allowed {
                println!("       reason: {}", result.reason());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn dry_run_writes_nothing() {
        let dir = tempdir().unwrap();
        let config = EngineConfig::for_project(dir.path());

        execute(&config, "file-reader", false, true, true).unwrap();
        execute(&config, "teleport", false, true, true).unwrap();
        execute(&config, "git_push", true, true, true).unwrap();

        assert!(!config.audit_log.exists());
        assert!(!config.fail_open_log.exists());
        assert!(!config.heat_map.exists());
        assert!(!config.drift_log.exists());
    }

    #[test]
    fn real_check_records_audit_and_heat() {
        let dir = tempdir().unwrap();
        let config = EngineConfig::for_project(dir.path());

        // No scores artifact: permissive identity, and read_file has no minimums.
        execute(&config, "file-reader", false, false, true).unwrap();

        let records =
            sov_audit::query_file(&config.audit_log, &sov_audit::AuditFilter::new()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].tool_name, "read_file");
        assert!(config.heat_map.exists());
    }
}
