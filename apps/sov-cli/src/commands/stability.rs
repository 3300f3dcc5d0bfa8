// stability.rs — Stability subcommands: check, report, export.

use std::fs::File;
use std::path::PathBuf;

use clap::Subcommand;
use sov_interceptor::EngineConfig;
use sov_stability::{export_csv, history_report, CheckOutcome, StabilityMonitor, REPORT_WINDOW};

#[derive(Subcommand)]
pub enum StabilityCommands {
    /// Record today's sovereignty and check for a 30-day milestone.
    Check {
        /// Analyze the existing history without recording a sample.
        #[arg(long)]
        no_record: bool,
    },
    /// Rolling history report.
    Report {
        /// Number of recent measurements to list.
        #[arg(long, default_value_t = REPORT_WINDOW)]
        window: usize,
    },
    /// Export the full measurement series as CSV.
    Export {
        /// Output file (defaults to stdout).
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

pub fn execute(cmd: &StabilityCommands, config: &EngineConfig, json: bool) -> anyhow::Result<()> {
    let monitor = StabilityMonitor::new(&config.stability_history, &config.milestones);

    match cmd {
        StabilityCommands::Check { no_record } => {
            let check = if *no_record {
                monitor.check_stability()?
            } else {
                let loaded = super::load_identity(config)?;
                let Some(calculation) = loaded.calculation else {
                    anyhow::bail!(
                        "no scores artifact at {}; nothing to record",
                        config.scores_file.display()
                    );
                };
                monitor.daily_check(&calculation, "daily-check")?
            };

            if json {
                return super::print_json(&check);
            }
            let a = &check.analysis;
            println!(
                "Stable days: {} / {} (trend {}, strength {:.2})",
                a.stable_days, a.required_days, a.trend.direction, a.trend.strength
            );
            match &check.outcome {
                CheckOutcome::NotStable => {
                    println!("Not yet stable: {} more day(s) needed.", a.days_remaining())
                }
                CheckOutcome::AlreadyRecorded { achieved_at } => println!(
                    "Stable. Milestone already recorded {}.",
                    achieved_at.format("%Y-%m-%d")
                ),
                CheckOutcome::MilestoneCreated { milestone } => println!(
                    "Milestone achieved at score {:.3} after {} stable days.",
                    milestone.score, milestone.stable_days
                ),
            }
        }

        StabilityCommands::Report { window } => {
            let series = monitor.history().load_newest_first()?;
            if json {
                let shown = &series[..(*window).min(series.len())];
                return super::print_json(&serde_json::json!({
                    "analysis": sov_stability::analyze(&series),
                    "measurements": shown,
                    "milestones": monitor.milestones().load()?,
                }));
            }
            print!("{}", history_report(&series, *window));
            if let Some(latest) = monitor.milestones().latest()? {
                println!(
                    "\nLatest milestone: {} (score {:.3}, {} days)",
                    latest.achieved_at.format("%Y-%m-%d"),
                    latest.score,
                    latest.stable_days
                );
            }
        }

        StabilityCommands::Export { output } => {
            let series = monitor.history().load()?;
            match output {
                Some(path) => {
                    export_csv(&series, File::create(path)?)?;
                    eprintln!("Exported {} measurement(s) to {}", series.len(), path.display());
                }
                None => export_csv(&series, std::io::stdout().lock())?,
            }
        }
    }

    Ok(())
}
