// fleetcheck-core/src/domain/mod.rs

pub mod check;
pub mod error;
pub mod inventory;
pub mod registry;
pub mod rules;

pub use check::{Category, Check, CheckMeta, CheckParams, CheckResult, ValueTransform};
pub use inventory::{AuthMode, DatabaseTarget, EngineKind, Inventory, Secret};
pub use registry::CheckRegistry;
pub use rules::{RuleMap, RuleResolver, RuleSet, RuleValue};
