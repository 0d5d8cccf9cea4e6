use std::path::Path;

use anyhow::Result;
use stratum::domain::value_objects::Environment;
use stratum::{BuildDriver, BuildInput, FsModuleSource, NodeResolver};

pub fn cmd_check(context: &Path, json: bool) -> Result<()> {
    let (config, dir) = super::load_config(context)?;
    let input = BuildInput::from_config(&config, &dir);
    let driver = BuildDriver::new(NodeResolver::new(), FsModuleSource::new(), input);

    let synthesis = match driver.synthesize() {
        Ok(synthesis) => synthesis,
        Err(err) => {
            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "event": "check",
                        "success": false,
                        "error": err.to_string(),
                    })
                );
            }
            anyhow::bail!(err);
        }
    };

    let entries: Vec<_> = Environment::ALL
        .into_iter()
        .flat_map(|environment| synthesis.entries_for(environment).iter())
        .collect();

    if json {
        println!(
            "{}",
            serde_json::json!({
                "event": "check",
                "success": true,
                "mode": config.mode,
                "entries": entries,
                "rules": synthesis.rules.len(),
                "ssr": synthesis.has_ssr_layer(),
            })
        );
    } else {
        println!("Stratum Check ({})", config.mode);
        for entry in &entries {
            println!("  ✓ {} [{}] {}", entry.name, entry.layer.short_name(), entry.import);
        }
        println!();
        println!(
            "{} entries, {} rules, ssr layer {}",
            entries.len(),
            synthesis.rules.len(),
            if synthesis.has_ssr_layer() { "on" } else { "off" }
        );
    }
    Ok(())
}
