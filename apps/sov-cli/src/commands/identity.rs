// identity.rs — Show the identity vector derived from the trust snapshot.

use serde::Serialize;
use sov_interceptor::EngineConfig;
use sov_vector::{Category, IdentityVector};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IdentityView<'a> {
    identity: &'a IdentityVector,
    sovereignty: f64,
    digest: Option<&'a str>,
    source: String,
    drift_events: Option<u64>,
}

pub fn execute(config: &EngineConfig, json: bool) -> anyhow::Result<()> {
    let loaded = super::load_identity(config)?;
    let identity = &loaded.identity;
    let source = if loaded.calculation.is_some() {
        config.scores_file.display().to_string()
    } else {
        "permissive default (no scores artifact)".to_string()
    };

    if json {
        return super::print_json(&IdentityView {
            identity,
            sovereignty: identity.sovereignty(),
            digest: loaded.digest.as_ref().map(|d| d.as_str()),
            source,
            drift_events: loaded.calculation.as_ref().map(|c| c.drift_events),
        });
    }

    println!("User:         {}", identity.user_id);
    println!("Source:       {}", source);
    if let Some(digest) = &loaded.digest {
        println!("Snapshot:     {}", digest.short());
    }
    println!("Sovereignty:  {:.3}", identity.sovereignty());
    if let Some(calc) = &loaded.calculation {
        println!(
            "Trust debt:   {} units, grade {}, {} drift event(s)",
            calc.trust_debt_units, calc.grade, calc.drift_events
        );
    }
    println!("Updated:      {}", identity.last_updated.format("%Y-%m-%d %H:%M:%S"));
    println!();
    println!("{:<16} SCORE", "CATEGORY");
    println!("{}", "-".repeat(24));
    for category in Category::ALL {
        println!("{:<16} {:.3}", category, identity.category_scores[category]);
    }
    Ok(())
}
