// fleetcheck-core/src/domain/rules/resolver.rs

use std::collections::{BTreeMap, BTreeSet};

use super::value::RuleValue;

/// rule_name -> value. `None` is an explicit "unset" from the document.
pub type RuleMap = BTreeMap<String, Option<RuleValue>>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    pub defaults: RuleMap,
    pub overrides: BTreeMap<String, RuleMap>,
}

/// Effective rules per instance: defaults, then the instance's overrides on top.
#[derive(Debug, Clone, Default)]
pub struct RuleResolver {
    rules: RuleSet,
}

impl RuleResolver {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    pub fn resolve(&self, instance: &str) -> RuleMap {
        let mut effective = self.rules.defaults.clone();
        if let Some(overrides) = self.rules.overrides.get(instance) {
            for (name, value) in overrides {
                effective.insert(name.clone(), value.clone());
            }
        }
        effective
    }

    pub fn overridden_keys(&self, instance: &str) -> BTreeSet<String> {
        self.rules
            .overrides
            .get(instance)
            .map(|o| o.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn defaults(&self) -> &RuleMap {
        &self.rules.defaults
    }

    pub fn overrides(&self) -> &BTreeMap<String, RuleMap> {
        &self.rules.overrides
    }

    /// Every (scope, rule_name, value) in the document. Scope is "defaults"
    /// or "overrides.<instance>".
    pub fn entries(&self) -> Vec<(String, &str, Option<&RuleValue>)> {
        let mut entries: Vec<_> = self
            .rules
            .defaults
            .iter()
            .map(|(k, v)| ("defaults".to_string(), k.as_str(), v.as_ref()))
            .collect();
        for (instance, overrides) in &self.rules.overrides {
            for (k, v) in overrides {
                entries.push((format!("overrides.{instance}"), k.as_str(), v.as_ref()));
            }
        }
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fleet_rules() -> RuleResolver {
        let mut defaults = RuleMap::new();
        defaults.insert("sessions_min".into(), Some(RuleValue::Int(1000)));
        defaults.insert("processes_min".into(), Some(RuleValue::Int(1000)));
        defaults.insert("memory_target_required".into(), None);

        let mut free = RuleMap::new();
        free.insert("sessions_min".into(), Some(RuleValue::Int(100)));
        free.insert("flashback_enabled".into(), Some(RuleValue::Bool(false)));

        let mut overrides = BTreeMap::new();
        overrides.insert("FREE".to_string(), free);

        RuleResolver::new(RuleSet { defaults, overrides })
    }

    #[test]
    fn test_override_wins() {
        let resolver = fleet_rules();
        let free = resolver.resolve("FREE");
        assert_eq!(free["sessions_min"], Some(RuleValue::Int(100)));
        assert_eq!(free["processes_min"], Some(RuleValue::Int(1000)));
        // override-only keys are added
        assert_eq!(free["flashback_enabled"], Some(RuleValue::Bool(false)));
    }

    #[test]
    fn test_unknown_instance_gets_defaults() {
        let resolver = fleet_rules();
        let other = resolver.resolve("OTHER");
        assert_eq!(&other, resolver.defaults());
        assert!(resolver.overridden_keys("OTHER").is_empty());
    }

    #[test]
    fn test_overridden_keys_are_exact() {
        let resolver = fleet_rules();
        let keys: Vec<_> = resolver.overridden_keys("FREE").into_iter().collect();
        assert_eq!(keys, vec!["flashback_enabled", "sessions_min"]);
    }

    #[test]
    fn test_single_rule_scenario() {
        let mut defaults = RuleMap::new();
        defaults.insert("sessions_min".into(), Some(RuleValue::Int(1000)));
        let mut free = RuleMap::new();
        free.insert("sessions_min".into(), Some(RuleValue::Int(100)));
        let resolver = RuleResolver::new(RuleSet {
            defaults,
            overrides: BTreeMap::from([("FREE".to_string(), free)]),
        });

        let expected_free = RuleMap::from([("sessions_min".to_string(), Some(RuleValue::Int(100)))]);
        let expected_other =
            RuleMap::from([("sessions_min".to_string(), Some(RuleValue::Int(1000)))]);
        assert_eq!(resolver.resolve("FREE"), expected_free);
        assert_eq!(resolver.resolve("OTHER"), expected_other);
    }

    #[test]
    fn test_entries_cover_every_scope() {
        let resolver = fleet_rules();
        let scopes: BTreeSet<_> = resolver.entries().into_iter().map(|(s, _, _)| s).collect();
        assert!(scopes.contains("defaults"));
        assert!(scopes.contains("overrides.FREE"));
        assert_eq!(resolver.entries().len(), 5);
    }
}
