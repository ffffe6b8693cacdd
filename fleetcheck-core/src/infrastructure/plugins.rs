// fleetcheck-core/src/infrastructure/plugins.rs

// Secondary registry mode: threshold checks declared as YAML units in a plugin
// directory. Every unit must match `PluginDefinition`; the rest is skipped.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use validator::{Validate, ValidationError};
use walkdir::WalkDir;

use crate::domain::check::{Category, Check, CheckMeta, Normalizer, ThresholdCheck, ValidationType};
use crate::domain::registry::CheckRegistry;
use crate::domain::rules::RuleValue;
use crate::infrastructure::error::InfrastructureError;

fn validate_check_name(name: &str) -> Result<(), ValidationError> {
    let valid = name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if valid && !name.starts_with('_') {
        Ok(())
    } else {
        Err(ValidationError::new("check_name")
            .with_message("use lowercase letters, digits and underscores".into()))
    }
}

/// The registration contract every plugin unit must satisfy.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PluginDefinition {
    #[validate(length(min = 1), custom(function = "validate_check_name"))]
    pub name: String,

    #[validate(length(min = 1))]
    pub display_name: String,

    pub category: Category,

    #[serde(default)]
    pub description: String,

    #[validate(length(min = 1))]
    pub query: String,

    pub validation: ValidationType,

    #[serde(default)]
    pub threshold: Option<RuleValue>,

    #[serde(default)]
    pub normalizer: Option<Normalizer>,
}

impl PluginDefinition {
    pub fn into_check(self) -> ThresholdCheck {
        let meta = CheckMeta::new(&self.name, &self.display_name, self.category, &self.description);
        let mut check = ThresholdCheck::new(meta, self.query, self.validation);
        if let Some(threshold) = self.threshold {
            check = check.with_threshold(threshold);
        }
        if let Some(normalizer) = self.normalizer {
            check = check.with_normalizer(normalizer);
        }
        check
    }
}

pub struct PluginDiscovery;

impl PluginDiscovery {
    /// Scans `dir` recursively for `*.yml` / `*.yaml` units. Units that fail to
    /// read, parse or validate are skipped.
    #[instrument]
    pub fn discover(dir: &Path) -> Result<Vec<Arc<dyn Check>>, InfrastructureError> {
        if !dir.is_dir() {
            return Err(InfrastructureError::ConfigNotFound(dir.display().to_string()));
        }

        let mut checks: Vec<Arc<dyn Check>> = Vec::new();
        let walker = WalkDir::new(dir).follow_links(true).sort_by_file_name();
        for entry in walker.into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            let is_yaml = path
                .extension()
                .is_some_and(|ext| ext == "yml" || ext == "yaml");
            if !entry.file_type().is_file() || !is_yaml {
                continue;
            }
            match Self::load_unit(path) {
                Ok(check) => {
                    debug!(path = ?path, check = %check.meta().name, "🔌 Plugin check loaded");
                    checks.push(Arc::new(check));
                }
                Err(reason) => debug!(path = ?path, %reason, "Skipping plugin unit"),
            }
        }
        Ok(checks)
    }

    fn load_unit(path: &Path) -> Result<ThresholdCheck, String> {
        let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
        let definition: PluginDefinition = serde_yaml::from_str(&content).map_err(|e| e.to_string())?;
        definition.validate().map_err(|e| e.to_string())?;
        Ok(definition.into_check())
    }

    /// Registers discovered checks on top of `registry`; same names replace built-ins.
    pub fn populate(registry: &mut CheckRegistry, dir: &Path) -> Result<usize, InfrastructureError> {
        let mut registered = 0;
        for check in Self::discover(dir)? {
            match registry.register(check) {
                Ok(()) => registered += 1,
                Err(e) => debug!(error = %e, "Skipping plugin check"),
            }
        }
        info!(dir = ?dir, registered, "🔌 Plugin checks registered");
        Ok(registered)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    const UNDO: &str = r#"
name: undo_retention_min
display_name: UNDO_RETENTION
category: performance
description: Checks the undo retention (seconds)
query: SELECT value FROM v$parameter WHERE name = 'undo_retention'
validation: minimum
threshold: 900
"#;

    #[test]
    fn test_discovery_skips_broken_units() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("undo.yml"), UNDO)?;
        fs::create_dir(dir.path().join("nested"))?;
        fs::write(
            dir.path().join("nested/recyclebin.yaml"),
            "name: recyclebin\ndisplay_name: RECYCLEBIN\ncategory: feature\nquery: SELECT value FROM v$parameter WHERE name = 'recyclebin'\nvalidation: equals\nthreshold: 'True'\nnormalizer: boolean\n",
        )?;
        fs::write(dir.path().join("broken.yml"), "name: [unclosed")?;
        fs::write(dir.path().join("bad_name.yml"), UNDO.replace("undo_retention_min", "Undo-Retention"))?;
        fs::write(dir.path().join("notes.txt"), "not a plugin")?;

        let checks = PluginDiscovery::discover(dir.path())?;
        let mut names: Vec<_> = checks.iter().map(|c| c.meta().name.clone()).collect();
        names.sort();
        assert_eq!(names, vec!["recyclebin", "undo_retention_min"]);
        Ok(())
    }

    #[test]
    fn test_populate_replaces_builtins() -> Result<()> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join("sessions.yml"),
            UNDO.replace("undo_retention_min", "sessions_min").replace("UNDO_RETENTION", "SESSIONS_CUSTOM"),
        )?;
        let mut registry = CheckRegistry::builtin();
        let before = registry.len();
        assert_eq!(PluginDiscovery::populate(&mut registry, dir.path())?, 1);
        assert_eq!(registry.len(), before);
        assert_eq!(registry.get("sessions_min")?.meta().display_name, "SESSIONS_CUSTOM");
        Ok(())
    }

    #[test]
    fn test_missing_directory() {
        let err = PluginDiscovery::discover(Path::new("/nonexistent/plugins")).err().unwrap();
        assert!(matches!(err, InfrastructureError::ConfigNotFound(_)));
    }
}
