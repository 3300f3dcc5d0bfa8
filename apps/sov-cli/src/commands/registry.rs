// registry.rs — Registry subcommands: list, show, requiring, permitted.

use clap::Subcommand;
use sov_interceptor::EngineConfig;
use sov_policy::{ActionRequirement, PermissionEngine, RiskTier};
use sov_vector::Category;

#[derive(Subcommand)]
pub enum RegistryCommands {
    /// List every registered tool.
    List {
        /// Only tools in this risk tier (low, medium, high, critical).
        #[arg(long)]
        tier: Option<String>,
    },
    /// Show one tool's requirement and the skills that route to it.
    Show { tool: String },
    /// Tools that set a minimum for a category.
    Requiring { category: String },
    /// Tools the current identity would be allowed to use.
    Permitted,
}

fn parse_tier(tier: &str) -> anyhow::Result<RiskTier> {
    match tier.to_ascii_lowercase().as_str() {
        "low" => Ok(RiskTier::Low),
        "medium" => Ok(RiskTier::Medium),
        "high" => Ok(RiskTier::High),
        "critical" => Ok(RiskTier::Critical),
        other => anyhow::bail!("unknown risk tier '{}'", other),
    }
}

fn print_table(requirements: &[&ActionRequirement]) {
    if requirements.is_empty() {
        println!("No matching tools.");
        return;
    }
    println!("{:<24} {:<9} {:>7}  CATEGORIES", "TOOL", "TIER", "MIN SOV");
    println!("{}", "-".repeat(80));
    for req in requirements {
        let categories: Vec<String> = req
            .required_scores
            .iter()
            .map(|(c, v)| format!("{}>={}", c, v))
            .collect();
        println!(
            "{:<24} {:<9} {:>7.2}  {}",
            req.tool_name,
            req.risk_tier(),
            req.min_sovereignty,
            if categories.is_empty() {
                "-".to_string()
            } else {
                categories.join(", ")
            }
        );
    }
}

pub fn execute(cmd: &RegistryCommands, config: &EngineConfig, json: bool) -> anyhow::Result<()> {
    let registry = config.registry()?;

    match cmd {
        RegistryCommands::List { tier } => {
            let entries: Vec<&ActionRequirement> = match tier {
                Some(t) => registry.tools_in_tier(parse_tier(t)?),
                None => registry.iter().collect(),
            };
            if json {
                return super::print_json(&entries);
            }
            print_table(&entries);
        }

        RegistryCommands::Show { tool } => {
            let Some(req) = registry.get(tool) else {
                anyhow::bail!("no requirement registered for tool '{}'", tool);
            };
            let settings = config.load_settings()?;
            let routing = settings.routing();
            let skills = routing.skills_for_tool(tool);
            if json {
                return super::print_json(&serde_json::json!({
                    "requirement": req,
                    "riskTier": req.risk_tier(),
                    "cellId": req.cell_id(),
                    "skills": skills,
                }));
            }
            println!("Tool:         {}", req.tool_name);
            if !req.description.is_empty() {
                println!("Description:  {}", req.description);
            }
            println!(
                "Risk tier:    {} ({})",
                req.risk_tier(),
                req.risk_tier().description()
            );
            println!("Min sov:      {:.2}", req.min_sovereignty);
            println!("Heat cell:    {}", req.cell_id());
            println!(
                "Skills:       {}",
                if skills.is_empty() {
                    "-".to_string()
                } else {
                    skills.join(", ")
                }
            );
            for (category, minimum) in &req.required_scores {
                println!("  {:<16} >= {:.2}", category, minimum);
            }
        }

        RegistryCommands::Requiring { category } => {
            let category: Category = category.parse()?;
            let entries = registry.tools_requiring(category);
            if json {
                return super::print_json(&entries);
            }
            print_table(&entries);
        }

        RegistryCommands::Permitted => {
            let settings = config.load_settings()?;
            let loaded = super::load_identity(config)?;
            let engine = PermissionEngine::new(settings.overlap_threshold);
            let entries = engine.permitted_tools(&registry, &loaded.identity);
            if json {
                return super::print_json(&entries);
            }
            println!(
                "{} of {} tools permitted at sovereignty {:.3}:",
                entries.len(),
                registry.len(),
                loaded.identity.sovereignty()
            );
            print_table(&entries);
        }
    }

    Ok(())
}
