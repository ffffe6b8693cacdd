// fleetcheck-core/src/infrastructure/config/rules.rs

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{info, instrument};

use crate::domain::rules::{RuleMap, RuleResolver, RuleSet};
use crate::infrastructure::error::InfrastructureError;

const ROOT_KEY: &str = "validation_rules";

#[derive(Deserialize)]
struct RawRules {
    #[serde(default)]
    defaults: Option<RuleMap>,
    #[serde(default)]
    overrides: Option<BTreeMap<String, Option<RuleMap>>>,
}

#[instrument]
pub fn load_rules(path: &Path) -> Result<RuleResolver, InfrastructureError> {
    if !path.exists() {
        return Err(InfrastructureError::ConfigNotFound(path.display().to_string()));
    }
    let content = fs::read_to_string(path)?;
    let resolver = parse_rules(&content)?;
    info!(
        path = ?path,
        defaults = resolver.defaults().len(),
        overrides = resolver.overrides().len(),
        "📏 Validation rules loaded"
    );
    Ok(resolver)
}

/// Rule document: `validation_rules.defaults` is mandatory, `overrides` optional.
pub fn parse_rules(content: &str) -> Result<RuleResolver, InfrastructureError> {
    let document: serde_yaml::Value = serde_yaml::from_str(content)?;

    let section = document.get(ROOT_KEY).ok_or_else(|| {
        InfrastructureError::ConfigError(format!("missing top-level '{ROOT_KEY}' section"))
    })?;
    if section.get("defaults").is_none() {
        return Err(InfrastructureError::ConfigError(format!(
            "'{ROOT_KEY}' has no 'defaults' section"
        )));
    }

    let raw: RawRules = serde_yaml::from_value(section.clone())?;
    let overrides = raw
        .overrides
        .unwrap_or_default()
        .into_iter()
        .map(|(instance, rules)| (instance, rules.unwrap_or_default()))
        .collect();

    Ok(RuleResolver::new(RuleSet {
        defaults: raw.defaults.unwrap_or_default(),
        overrides,
    }))
}
