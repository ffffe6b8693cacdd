// fleetcheck-core/src/domain/rules/mod.rs

pub mod resolver;
pub mod value;

pub use resolver::{RuleMap, RuleResolver, RuleSet};
pub use value::RuleValue;
