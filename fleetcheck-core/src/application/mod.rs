// fleetcheck-core/src/application/mod.rs

pub mod engine;
pub mod preflight;
pub mod report;
pub mod summary;

// --- RE-EXPORTS (FACADE PATTERN) ---
// Le CLI fait `use fleetcheck_core::application::{ValidationEngine, RunReport};`
// sans connaître la structure interne des fichiers.

pub use engine::{InstanceOutcome, InstanceState, RunOutcome, ValidationEngine};
pub use preflight::validate_rules;
pub use report::RunReport;
pub use summary::{HealthStatus, InstanceSummary, ResultAggregator, RunSummary};
