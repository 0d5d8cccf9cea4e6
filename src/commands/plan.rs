use std::path::Path;

use anyhow::Result;
use stratum::domain::value_objects::Environment;
use stratum::{BuildDriver, BuildInput, FsModuleSource, NodeResolver};

pub fn cmd_plan(context: &Path, json: bool) -> Result<()> {
    let (config, dir) = super::load_config(context)?;
    let input = BuildInput::from_config(&config, &dir);
    let manifest = BuildDriver::new(NodeResolver::new(), FsModuleSource::new(), input).run()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&manifest)?);
        return Ok(());
    }

    println!("Stratum Plan ({})", config.mode);
    for environment in Environment::ALL {
        let Some(env) = manifest.environment(environment) else {
            continue;
        };
        println!();
        println!("{} environment", environment);
        for entry in &env.entries {
            println!("  entry {} [{}] {}", entry.name, entry.layer.short_name(), entry.import);
        }
        println!("  modules: {}", env.modules.len());
        for id in &env.client_references {
            println!("  client reference {}", id);
        }
        for id in &env.server_references {
            println!("  server reference {}", id);
        }
        for id in &env.server_entries {
            println!("  server entry {}", id);
        }
    }

    if !manifest.warnings.is_empty() {
        println!();
        for warning in &manifest.warnings {
            println!("warning: {}", warning);
        }
    }
    println!();
    println!("Shape: {}", manifest.shape);
    Ok(())
}
