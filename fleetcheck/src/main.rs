// fleetcheck/src/main.rs

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG=debug fleetcheck run ... pour voir les détails.
    // stdout reste réservé au rapport.
    let fallback = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        // --- USE CASE: VALIDATION RUN ---
        Commands::Run {
            inventory,
            rules,
            plugins,
            databases,
            format,
            output_dir,
        } => {
            let options = commands::run::RunOptions {
                inventory,
                rules,
                plugins,
                databases,
                format,
                output_dir,
            };
            if !commands::run::execute(options).await? {
                // Exit with error code for CI/CD
                std::process::exit(1);
            }
        }

        // --- USE CASE: CATALOG ---
        Commands::Checks { plugins } => commands::checks::execute(plugins.as_deref())?,

        // --- USE CASE: RULE INSPECTION ---
        Commands::Rules { rules, instance } => commands::rules::execute(&rules, &instance)?,
    }

    Ok(())
}
