// fleetcheck/src/commands/checks.rs
//
// USE CASE: List the registered checks.

use std::path::Path;

pub fn execute(plugins: Option<&Path>) -> anyhow::Result<()> {
    let registry = super::build_registry(plugins)?;

    for (category, metas) in registry.by_category() {
        println!("\n📋 {category}");
        for meta in metas {
            println!("   {:<36} {:<28} {}", meta.name, meta.display_name, meta.description);
        }
    }
    println!("\n{} checks registered.", registry.len());
    Ok(())
}
