// heat.rs — Heat subcommands: show, review.

use clap::Subcommand;
use sov_interceptor::{EngineConfig, HeatMap};

#[derive(Subcommand)]
pub enum HeatCommands {
    /// Show every heat cell.
    Show,
    /// Reset a cell to Seed after human review (the only way out of Hot-blocked).
    Review { cell: String },
}

pub fn execute(cmd: &HeatCommands, config: &EngineConfig, json: bool) -> anyhow::Result<()> {
    let mut heat = HeatMap::load(&config.heat_map)?;

    match cmd {
        HeatCommands::Show => {
            if json {
                return super::print_json(heat.document());
            }
            if heat.cells().next().is_none() {
                println!("No heat cells recorded.");
                return Ok(());
            }
            println!(
                "{:<28} {:<12} {:>6} {:>8}  LAST UPDATE",
                "CELL", "STATE", "TASKS", "DENIALS"
            );
            println!("{}", "-".repeat(76));
            for (id, cell) in heat.cells() {
                println!(
                    "{:<28} {:<12} {:>6} {:>8}  {}",
                    id,
                    format!("{} ({})", cell.state.letter(), cell.state),
                    cell.task_count,
                    cell.denials,
                    cell.last_update.format("%Y-%m-%d %H:%M:%S")
                );
            }
            println!("\nSovereignty at last update: {:.3}", heat.document().sovereignty);
            let blocked = heat.hot_blocked();
            if !blocked.is_empty() {
                println!("Pending review: {}", blocked.join(", "));
            }
        }

        HeatCommands::Review { cell } => {
            let transition = heat.review(cell)?;
            heat.save()?;
            if json {
                return super::print_json(&serde_json::json!({
                    "cell": cell,
                    "from": transition.from,
                    "to": transition.to,
                }));
            }
            println!("{}: {} -> {}", cell, transition.from, transition.to);
        }
    }

    Ok(())
}
