// fleetcheck-core/src/domain/registry.rs

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use crate::domain::check::catalog::builtin_checks;
use crate::domain::check::{Category, Check, CheckMeta};
use crate::domain::error::DomainError;

/// Canonical set of checks, keyed by internal name.
///
/// Built once at startup and then shared read-only (behind an `Arc`) with the engine.
#[derive(Default, Clone)]
pub struct CheckRegistry {
    checks: BTreeMap<String, Arc<dyn Check>>,
}

impl CheckRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Static mode: every check shipped with the crate.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for check in builtin_checks() {
            // les noms du catalogue sont non vides, l'erreur est impossible ici
            if let Err(e) = registry.register(check) {
                debug!(error = %e, "Skipping built-in check");
            }
        }
        registry
    }

    /// Adds or replaces a check under its internal name.
    pub fn register(&mut self, check: Arc<dyn Check>) -> Result<(), DomainError> {
        let name = check.meta().name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::InvalidCheck(format!(
                "check '{}' has an empty name",
                check.meta().display_name
            )));
        }
        if self.checks.insert(name.clone(), check).is_some() {
            debug!(check = %name, "Replaced registered check");
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn Check>, DomainError> {
        self.checks
            .get(name)
            .cloned()
            .ok_or_else(|| DomainError::CheckNotFound(name.to_string()))
    }

    /// Snapshot: later registrations are not visible through it.
    pub fn all(&self) -> BTreeMap<String, Arc<dyn Check>> {
        self.checks.clone()
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Check identities grouped by category, in report order.
    pub fn by_category(&self) -> Vec<(Category, Vec<CheckMeta>)> {
        Category::ALL
            .iter()
            .filter_map(|category| {
                let metas: Vec<CheckMeta> = self
                    .checks
                    .values()
                    .map(|c| c.meta())
                    .filter(|m| m.category == *category)
                    .cloned()
                    .collect();
                (!metas.is_empty()).then_some((*category, metas))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::check::{ThresholdCheck, ValidationType};
    use anyhow::Result;

    fn probe(name: &str, display: &str) -> Arc<dyn Check> {
        Arc::new(ThresholdCheck::new(
            CheckMeta::new(name, display, Category::Storage, "Probe"),
            "SELECT 1",
            ValidationType::Minimum,
        ))
    }

    #[test]
    fn test_register_get_and_replace() -> Result<()> {
        let mut registry = CheckRegistry::new();
        registry.register(probe("probe", "PROBE_V1"))?;
        registry.register(probe("probe", "PROBE_V2"))?;
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("probe")?.meta().display_name, "PROBE_V2");
        Ok(())
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut registry = CheckRegistry::new();
        assert!(matches!(
            registry.register(probe("  ", "BLANK")),
            Err(DomainError::InvalidCheck(_))
        ));
    }

    #[test]
    fn test_missing_check_is_not_found() {
        let registry = CheckRegistry::builtin();
        assert!(matches!(
            registry.get("no_such_check"),
            Err(DomainError::CheckNotFound(name)) if name == "no_such_check"
        ));
        assert!(registry.get("sessions_min").is_ok());
    }

    #[test]
    fn test_all_is_a_snapshot() -> Result<()> {
        let mut registry = CheckRegistry::new();
        registry.register(probe("first", "FIRST"))?;
        let snapshot = registry.all();
        registry.register(probe("second", "SECOND"))?;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(registry.len(), 2);
        Ok(())
    }

    #[test]
    fn test_builtin_grouping() {
        let registry = CheckRegistry::builtin();
        let groups = registry.by_category();
        assert_eq!(groups.first().map(|(c, _)| *c), Some(Category::Memory));
        let total: usize = groups.iter().map(|(_, m)| m.len()).sum();
        assert_eq!(total, registry.len());
    }
}
