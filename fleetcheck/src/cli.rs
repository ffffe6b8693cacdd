// fleetcheck/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fleetcheck")]
#[command(about = "Baseline validation for database fleets", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Debug logs (RUST_LOG still takes precedence)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Artifact written next to the console report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Table,
    Json,
    Html,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🚀 Validates the selected instances against the rule set
    Run {
        /// Inventory document (top-level `databases`)
        #[arg(long, env = "FLEETCHECK_INVENTORY", default_value = "databases.yaml")]
        inventory: PathBuf,

        /// Rule document (top-level `validation_rules`)
        #[arg(long, env = "FLEETCHECK_RULES", default_value = "validation_rules.yaml")]
        rules: PathBuf,

        /// Directory of plugin checks registered on top of the built-ins
        #[arg(long, env = "FLEETCHECK_PLUGINS")]
        plugins: Option<PathBuf>,

        /// Run only these instances (repeatable)
        #[arg(long = "database", short)]
        databases: Vec<String>,

        #[arg(long, value_enum, default_value_t = ReportFormat::Table)]
        format: ReportFormat,

        /// Where JSON / HTML reports are written
        #[arg(long, env = "FLEETCHECK_OUTPUT_DIR", default_value = "reports")]
        output_dir: PathBuf,
    },

    /// 📚 Lists the registered checks by category
    Checks {
        #[arg(long, env = "FLEETCHECK_PLUGINS")]
        plugins: Option<PathBuf>,
    },

    /// 🔍 Shows the effective rules of one instance
    Rules {
        #[arg(long, env = "FLEETCHECK_RULES", default_value = "validation_rules.yaml")]
        rules: PathBuf,

        #[arg(long)]
        instance: String,
    },
}
