// fleetcheck-core/src/application/preflight.rs

// Vérifie toutes les valeurs de règles avant de toucher la moindre base.

use tracing::{debug, info, instrument};

use crate::domain::error::DomainError;
use crate::domain::registry::CheckRegistry;
use crate::domain::rules::RuleResolver;

/// Every rule value must fit the shape its check accepts. All offending
/// `scope.rule_name` entries are reported at once.
#[instrument(skip_all)]
pub fn validate_rules(registry: &CheckRegistry, resolver: &RuleResolver) -> Result<(), DomainError> {
    let mut failures = Vec::new();

    for (scope, rule_name, value) in resolver.entries() {
        let Ok(check) = registry.get(rule_name) else {
            debug!(scope = %scope, rule = rule_name, "Rule names no registered check");
            continue;
        };
        let Some(value) = value else {
            continue;
        };
        if let Err(e) = check.validate_rule(value) {
            let reason = match e {
                DomainError::InvalidRule { reason, .. } => reason,
                other => other.to_string(),
            };
            failures.push(format!("{scope}.{rule_name}: {reason}"));
        }
    }

    if failures.is_empty() {
        info!(rules = resolver.entries().len(), "✅ Rule values validated");
        return Ok(());
    }
    Err(DomainError::InvalidRules {
        count: failures.len(),
        details: failures.join("\n"),
    })
}
