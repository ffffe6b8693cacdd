// fleetcheck/src/commands/run.rs
//
// USE CASE: Validate the fleet and report.

use anyhow::Context;
use std::path::PathBuf;
use std::sync::Arc;

use fleetcheck_core::application::{RunReport, ValidationEngine, validate_rules};
use fleetcheck_core::infrastructure::adapters::DuckDbProvider;
use fleetcheck_core::infrastructure::config::{load_inventory, load_rules};
use fleetcheck_core::infrastructure::report::{HtmlRenderer, render_console, write_json};

use crate::cli::ReportFormat;

pub struct RunOptions {
    pub inventory: PathBuf,
    pub rules: PathBuf,
    pub plugins: Option<PathBuf>,
    pub databases: Vec<String>,
    pub format: ReportFormat,
    pub output_dir: PathBuf,
}

/// Returns `false` when a check failed or an instance was unreachable.
pub async fn execute(options: RunOptions) -> anyhow::Result<bool> {
    let start = std::time::Instant::now();

    // A. Load the documents (Infra). Any error here is fatal.
    let resolver = load_rules(&options.rules)
        .with_context(|| format!("Failed to load validation rules from {:?}", options.rules))?;
    let inventory = load_inventory(&options.inventory)
        .with_context(|| format!("Failed to load inventory from {:?}", options.inventory))?;

    // B. Registry + preflight
    let registry = super::build_registry(options.plugins.as_deref())?;
    validate_rules(&registry, &resolver).context("Rule document rejected")?;

    let targets = inventory.select(&options.databases);
    if targets.is_empty() {
        anyhow::bail!("No instance selected (available: {})", inventory.names().join(", "));
    }

    // C. Run (Application Layer)
    let engine = ValidationEngine::new(Arc::new(registry), Arc::new(resolver));
    let provider = DuckDbProvider::new();
    let report = RunReport::new(engine.run(&provider, &targets).await);

    // D. Report
    println!("{}", render_console(&report));
    match options.format {
        ReportFormat::Table => {}
        ReportFormat::Json => {
            let path = write_json(&report, &options.output_dir)?;
            println!("📝 JSON report: {}", path.display());
        }
        ReportFormat::Html => {
            for path in HtmlRenderer::new().write_all(&report, &options.output_dir)? {
                println!("📝 HTML report: {}", path.display());
            }
        }
    }

    let summary = &report.summary;
    if summary.has_failures() {
        eprintln!(
            "\n❌ FAILURE. {} of {} checks failed across {} instance(s).",
            summary.total_failed(),
            summary.total_checks(),
            summary.instances.len()
        );
        return Ok(false);
    }
    println!("\n✨ SUCCESS! Fleet validated in {:.2?}", start.elapsed());
    Ok(true)
}
