// audit.rs — Audit subcommands: query, stats, fail-open.

use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use sov_audit::{query_file, stats_file, AuditFilter, Decision, FailOpenLog};
use sov_interceptor::EngineConfig;

#[derive(Args)]
pub struct FilterArgs {
    /// Only ALLOW or DENY records.
    #[arg(long)]
    decision: Option<String>,
    #[arg(long)]
    tool: Option<String>,
    #[arg(long)]
    skill: Option<String>,
    #[arg(long)]
    user: Option<String>,
    #[arg(long)]
    session: Option<String>,
    /// RFC 3339 lower bound (inclusive).
    #[arg(long)]
    since: Option<DateTime<Utc>>,
    /// RFC 3339 upper bound (inclusive).
    #[arg(long)]
    until: Option<DateTime<Utc>>,
}

impl FilterArgs {
    fn to_filter(&self) -> anyhow::Result<AuditFilter> {
        let mut filter = AuditFilter::new();
        if let Some(d) = &self.decision {
            filter = filter.decision(match d.to_ascii_uppercase().as_str() {
                "ALLOW" => Decision::Allow,
                "DENY" => Decision::Deny,
                other => anyhow::bail!("unknown decision '{}' (expected ALLOW or DENY)", other),
            });
        }
        if let Some(t) = &self.tool {
            filter = filter.tool(t.clone());
        }
        if let Some(s) = &self.skill {
            filter = filter.skill(s.clone());
        }
        if let Some(u) = &self.user {
            filter = filter.user(u.clone());
        }
        if let Some(s) = &self.session {
            filter = filter.session(s.clone());
        }
        if let Some(since) = self.since {
            filter = filter.since(since);
        }
        if let Some(until) = self.until {
            filter = filter.until(until);
        }
        Ok(filter)
    }
}

#[derive(Subcommand)]
pub enum AuditCommands {
    /// Show matching audit records, newest last.
    Query {
        #[command(flatten)]
        filter: FilterArgs,
        /// Show at most this many of the most recent matches.
        #[arg(short, default_value = "20")]
        n: usize,
    },
    /// Aggregate statistics over matching records.
    Stats {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Show the fail-open trail.
    FailOpen {
        #[arg(short, default_value = "20")]
        n: usize,
    },
}

pub fn execute(cmd: &AuditCommands, config: &EngineConfig, json: bool) -> anyhow::Result<()> {
    match cmd {
        AuditCommands::Query { filter, n } => {
            let records = query_file(&config.audit_log, &filter.to_filter()?)?;
            let start = records.len().saturating_sub(*n);
            let recent = &records[start..];
            if json {
                return super::print_json(recent);
            }
            if recent.is_empty() {
                println!("No matching audit records.");
                return Ok(());
            }
            println!(
                "{:<20} {:<6} {:<22} {:<16} {:>7} {:>6}  FAILED",
                "TIMESTAMP", "DEC", "TOOL", "SKILL", "OVERLAP", "SOV"
            );
            println!("{}", "-".repeat(100));
            for r in recent {
                println!(
                    "{:<20} {:<6} {:<22} {:<16} {:>7.2} {:>6.3}  {}",
                    r.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    r.decision.to_string(),
                    r.tool_name,
                    r.skill_name,
                    r.overlap,
                    r.sovereignty,
                    if r.failed_categories.is_empty() {
                        "-".to_string()
                    } else {
                        r.failed_categories.join("; ")
                    }
                );
            }
            if start > 0 {
                println!("({} earlier record(s) not shown)", start);
            }
        }

        AuditCommands::Stats { filter } => {
            let stats = stats_file(&config.audit_log, &filter.to_filter()?)?;
            if json {
                return super::print_json(&stats);
            }
            println!("Decisions:     {}", stats.total);
            println!(
                "Allowed:       {} ({:.1}%)",
                stats.allowed,
                stats.allow_rate * 100.0
            );
            println!("Denied:        {} ({:.1}%)", stats.denied, stats.deny_rate * 100.0);
            println!("Avg overlap:   {:.3}", stats.average_overlap);
            println!("Avg sov:       {:.3}", stats.average_sovereignty);
            if !stats.top_denied_tools.is_empty() {
                println!("\nMost denied tools:");
                for d in &stats.top_denied_tools {
                    println!("  {:<24} {}", d.name, d.count);
                }
            }
            if !stats.top_denied_skills.is_empty() {
                println!("\nMost denied skills:");
                for d in &stats.top_denied_skills {
                    println!("  {:<24} {}", d.name, d.count);
                }
            }
        }

        AuditCommands::FailOpen { n } => {
            let records = FailOpenLog::read_all(&config.fail_open_log)?;
            let start = records.len().saturating_sub(*n);
            let recent = &records[start..];
            if json {
                return super::print_json(recent);
            }
            if recent.is_empty() {
                println!("No fail-open events.");
                return Ok(());
            }
            println!(
                "{:<20} {:<20} {:<22} {:>6}  REASON",
                "TIMESTAMP", "SKILL", "TOOL", "SOV"
            );
            println!("{}", "-".repeat(90));
            for r in recent {
                println!(
                    "{:<20} {:<20} {:<22} {:>6.3}  {}",
                    r.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    r.skill_name,
                    r.tool_name.as_deref().unwrap_or("-"),
                    r.sovereignty,
                    r.reason
                );
            }
        }
    }

    Ok(())
}
