// fleetcheck/src/commands/mod.rs

pub mod checks;
pub mod rules;
pub mod run;

use anyhow::Context;
use std::path::Path;

use fleetcheck_core::domain::CheckRegistry;
use fleetcheck_core::infrastructure::plugins::PluginDiscovery;

/// Built-in checks, plus the plugin directory when one is given.
pub fn build_registry(plugins: Option<&Path>) -> anyhow::Result<CheckRegistry> {
    let mut registry = CheckRegistry::builtin();
    if let Some(dir) = plugins {
        PluginDiscovery::populate(&mut registry, dir)
            .with_context(|| format!("Failed to load plugin checks from {:?}", dir))?;
    }
    Ok(registry)
}
