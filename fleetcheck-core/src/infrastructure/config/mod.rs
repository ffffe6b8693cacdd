// fleetcheck-core/src/infrastructure/config/mod.rs

pub mod inventory;
pub mod rules;

pub use inventory::{load_inventory, parse_inventory};
pub use rules::{load_rules, parse_rules};
