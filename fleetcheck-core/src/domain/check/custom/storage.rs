// fleetcheck-core/src/domain/check/custom/storage.rs

use async_trait::async_trait;

use super::{LIST_PREVIEW, cell, expect_switch, preview};
use crate::domain::check::{Category, Check, CheckMeta, CheckParams, CheckResult};
use crate::domain::error::DomainError;
use crate::domain::rules::{RuleValue, value::is_switched_off};
use crate::ports::data_source::DataSource;

/// Every file of a kind must live under one ASM disk group.
pub struct StorageLocationCheck {
    meta: CheckMeta,
    query: &'static str,
    prefix: &'static str,
    noun: &'static str,
}

impl StorageLocationCheck {
    pub fn datafiles() -> Self {
        Self {
            meta: CheckMeta::new(
                "datafiles_asm",
                "DATAFILES_ASM",
                Category::DatabaseObjects,
                "Checks that all datafiles are stored in the +DATA ASM disk group",
            ),
            query: "SELECT name FROM v$datafile ORDER BY name",
            prefix: "+DATA",
            noun: "datafiles",
        }
    }

    pub fn redo_logs() -> Self {
        Self {
            meta: CheckMeta::new(
                "recovery_logs_asm",
                "RECOVERY_LOGS_ASM",
                Category::DatabaseObjects,
                "Checks that all redo log members are stored in the +RECO ASM disk group",
            ),
            query: "SELECT member FROM v$logfile ORDER BY member",
            prefix: "+RECO",
            noun: "redo logs",
        }
    }
}

#[async_trait]
impl Check for StorageLocationCheck {
    fn meta(&self) -> &CheckMeta {
        &self.meta
    }

    fn validate_rule(&self, rule: &RuleValue) -> Result<(), DomainError> {
        expect_switch(&self.meta, rule)
    }

    async fn execute(
        &self,
        source: &dyn DataSource,
        instance: &str,
        params: &CheckParams<'_>,
    ) -> CheckResult {
        if is_switched_off(params.rule) {
            return CheckResult::not_required(&self.meta, instance);
        }

        let expected = format!("All {} in {}", self.noun, self.prefix);
        let rows = match source.fetch_all(self.query).await {
            Ok(rows) => rows,
            Err(e) => {
                return CheckResult::fault(
                    &self.meta,
                    instance,
                    expected,
                    format!("Error checking {} ASM location: {e}", self.noun),
                );
            }
        };

        if rows.is_empty() {
            return CheckResult::new(
                &self.meta,
                instance,
                false,
                "0",
                format!("{}/...", self.prefix),
                format!("No {} found", self.noun),
            );
        }

        // a NULL path is counted as elsewhere
        let total = rows.len();
        let (inside, outside): (Vec<String>, Vec<String>) = rows
            .iter()
            .map(|r| cell(r, 0).unwrap_or_else(|| "NULL".to_string()))
            .partition(|p| p.starts_with(self.prefix));

        if outside.is_empty() {
            let actual = format!("{total}/{total} {} in {}", self.noun, self.prefix);
            return CheckResult::new(&self.meta, instance, true, actual, expected, "");
        }

        let actual = format!(
            "{}/{total} in {}, {} elsewhere",
            inside.len(),
            self.prefix,
            outside.len()
        );
        let message = format!(
            "Found {} file(s) not in {}: {}",
            outside.len(),
            self.prefix,
            preview(&outside, LIST_PREVIEW)
        );
        CheckResult::new(&self.meta, instance, false, actual, expected, message)
    }
}
