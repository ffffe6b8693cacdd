// fleetcheck/src/commands/rules.rs
//
// USE CASE: Show the effective rule set of one instance.

use anyhow::Context;
use std::path::Path;

use fleetcheck_core::infrastructure::config::load_rules;

pub fn execute(rules: &Path, instance: &str) -> anyhow::Result<()> {
    let resolver = load_rules(rules).with_context(|| format!("Failed to load validation rules from {:?}", rules))?;
    let overridden = resolver.overridden_keys(instance);

    println!("🔍 Effective rules for {instance}");
    for (name, value) in resolver.resolve(instance) {
        let shown = value.map_or_else(|| "(unset)".to_string(), |v| v.to_string());
        let marker = if overridden.contains(&name) { "  (override)" } else { "" };
        println!("   {name:<36} {shown}{marker}");
    }
    Ok(())
}
