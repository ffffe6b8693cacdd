// fleetcheck-core/src/lib.rs

#![allow(missing_docs)] // On autorise le manque de doc pour le moment

// Memory safety
#![deny(unsafe_code)]
// Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::perf)]

// --- MODULES HEXAGONAUX ---

// 1. Ports: what checks and the engine need from the outside (DataSource, SourceProvider).
pub mod ports;

// 2. Domain: checks, rules, registry, inventory model. Ne dépend ni de l'infra ni de l'app.
pub mod domain;

// 3. Infrastructure: YAML loaders, DuckDB adapter, plugins, report renderers.
pub mod infrastructure;

// 4. Application: engine, summaries, preflight.
pub mod application;

pub mod error;

#[cfg(test)]
pub(crate) mod testing;

// --- RE-EXPORTS (FACADE) ---
pub use error::FleetError;
