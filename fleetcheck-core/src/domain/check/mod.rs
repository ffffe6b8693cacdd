// fleetcheck-core/src/domain/check/mod.rs

pub mod catalog;
pub mod custom;
pub mod normalizer;
pub mod result;
pub mod threshold;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::error::DomainError;
use crate::domain::rules::RuleValue;
use crate::ports::data_source::{DataSource, ScalarValue};

pub use normalizer::Normalizer;
pub use result::CheckResult;
pub use threshold::{ThresholdCheck, ValidationType};

/// Report grouping. Declaration order is report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Memory,
    Feature,
    DatabaseObjects,
    Security,
    BackupRecovery,
    Performance,
    Storage,
    HighAvailability,
    Licensing,
    Logging,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Memory,
        Category::Feature,
        Category::DatabaseObjects,
        Category::Security,
        Category::BackupRecovery,
        Category::Performance,
        Category::Storage,
        Category::HighAvailability,
        Category::Licensing,
        Category::Logging,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Memory => "Memory Configuration",
            Category::Feature => "Feature Configuration",
            Category::DatabaseObjects => "Database Objects",
            Category::Security => "Security & Auditing",
            Category::BackupRecovery => "Backup & Recovery",
            Category::Performance => "Performance & Tuning",
            Category::Storage => "Storage & Disk Management",
            Category::HighAvailability => "High Availability & Cluster",
            Category::Licensing => "Licensing & Options",
            Category::Logging => "Logging & Monitoring",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Identity of a check. Immutable once the check is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckMeta {
    /// Unique key, also the rule name in the rule document.
    pub name: String,
    pub display_name: String,
    pub category: Category,
    pub description: String,
}

impl CheckMeta {
    pub fn new(name: &str, display_name: &str, category: Category, description: &str) -> Self {
        Self {
            name: name.to_string(),
            display_name: display_name.to_string(),
            category,
            description: description.to_string(),
        }
    }
}

/// Caller-side unit conversion, applied after the check's own normalizer.
pub type ValueTransform = fn(&ScalarValue) -> Result<ScalarValue, String>;

/// Per-invocation parameters handed over by the engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckParams<'a> {
    /// Effective rule value for this instance. Takes precedence over any static threshold.
    pub rule: Option<&'a RuleValue>,
    pub transform: Option<ValueTransform>,
}

impl<'a> CheckParams<'a> {
    pub fn with_rule(rule: &'a RuleValue) -> Self {
        Self {
            rule: Some(rule),
            transform: None,
        }
    }
}

#[async_trait]
pub trait Check: Send + Sync {
    fn meta(&self) -> &CheckMeta;

    /// Load-time validation of the rule value this check will receive.
    fn validate_rule(&self, _rule: &RuleValue) -> Result<(), DomainError> {
        Ok(())
    }

    /// Whether the engine still runs this check when its rule is unset.
    fn reports_when_unset(&self) -> bool {
        false
    }

    /// Never fails: data access faults come back as a failing "ERROR" result.
    async fn execute(
        &self,
        source: &dyn DataSource,
        instance: &str,
        params: &CheckParams<'_>,
    ) -> CheckResult;
}

/// Builds the `InvalidRule` error for a check.
pub(crate) fn invalid_rule(meta: &CheckMeta, reason: impl Into<String>) -> DomainError {
    DomainError::InvalidRule {
        rule: meta.name.clone(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_serde_and_labels() {
        let parsed: Category = serde_yaml::from_str("performance").unwrap_or(Category::Memory);
        assert_eq!(parsed, Category::Performance);
        assert_eq!(Category::HighAvailability.to_string(), "High Availability & Cluster");
        assert_eq!(Category::ALL.len(), 10);
        assert!(Category::Memory < Category::Logging);
    }
}
