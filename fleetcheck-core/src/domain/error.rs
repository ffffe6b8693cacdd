// fleetcheck-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Check '{0}' not found in registry")]
    #[diagnostic(
        code(fleetcheck::domain::check_not_found),
        help("Run `fleetcheck checks` to list the registered checks.")
    )]
    CheckNotFound(String),

    #[error("Invalid check definition: {0}")]
    #[diagnostic(code(fleetcheck::domain::invalid_check))]
    InvalidCheck(String),

    #[error("Invalid value for rule '{rule}': {reason}")]
    #[diagnostic(code(fleetcheck::domain::invalid_rule))]
    InvalidRule { rule: String, reason: String },

    #[error("Rule set rejected ({count} invalid value(s)):\n{details}")]
    #[diagnostic(
        code(fleetcheck::domain::rules_rejected),
        help("Fix the listed rule values in validation_rules.yaml.")
    )]
    InvalidRules { count: usize, details: String },
}
