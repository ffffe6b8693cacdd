// fleetcheck-core/src/domain/check/custom/multiplexing.rs

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::path::Path;

use super::{cell, expect_switch};
use crate::domain::check::{Category, Check, CheckMeta, CheckParams, CheckResult};
use crate::domain::error::DomainError;
use crate::domain::rules::{RuleValue, value::is_switched_off};
use crate::ports::data_source::DataSource;

const QUERY: &str = "SELECT name FROM v$controlfile ORDER BY name";
pub const MIN_GROUPS: usize = 2;

pub struct ControlFileMultiplexingCheck {
    meta: CheckMeta,
}

impl ControlFileMultiplexingCheck {
    pub fn new() -> Self {
        Self {
            meta: CheckMeta::new(
                "control_file_multiplexing",
                "CONTROL_FILE_MULTIPLEXING",
                Category::HighAvailability,
                "Checks that control files are multiplexed across at least two disk groups",
            ),
        }
    }
}

impl Default for ControlFileMultiplexingCheck {
    fn default() -> Self {
        Self::new()
    }
}

/// "+DATA/ORCL/control01.ctl" -> "DATA", "/u01/oradata/control01.ctl" -> "/u01/oradata".
fn group_of(path: &str) -> String {
    if let Some(asm) = path.strip_prefix('+') {
        return asm.split('/').next().unwrap_or(asm).to_string();
    }
    Path::new(path)
        .parent()
        .map(|p| p.display().to_string())
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| path.to_string())
}

#[async_trait]
impl Check for ControlFileMultiplexingCheck {
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

        let expected = format!(">= {MIN_GROUPS} disk groups");
        let rows = match source.fetch_all(QUERY).await {
            Ok(rows) => rows,
            Err(e) => {
                return CheckResult::fault(
                    &self.meta,
                    instance,
                    expected,
                    format!("Error checking control file multiplexing: {e}"),
                );
            }
        };

        let groups: BTreeSet<String> = rows
            .iter()
            .filter_map(|r| cell(r, 0))
            .map(|p| group_of(&p))
            .collect();
        let listed = groups.iter().cloned().collect::<Vec<_>>().join(", ");
        let actual = format!("{} disk group(s): {listed}", groups.len());

        if groups.len() >= MIN_GROUPS {
            return CheckResult::new(&self.meta, instance, true, actual, expected, "");
        }
        let message = format!(
            "Control files are not adequately multiplexed. Found {} disk group(s), need at least {MIN_GROUPS}.",
            groups.len()
        );
        CheckResult::new(&self.meta, instance, false, actual, expected, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockSource, text_row};

    #[test]
    fn test_group_keys() {
        assert_eq!(group_of("+DATA/ORCL/CONTROLFILE/current.261"), "DATA");
        assert_eq!(group_of("+FRA"), "FRA");
        assert_eq!(group_of("/u01/oradata/ORCL/control01.ctl"), "/u01/oradata/ORCL");
        assert_eq!(group_of("control01.ctl"), "control01.ctl");
    }

    #[tokio::test]
    async fn test_two_groups_pass() {
        let source = MockSource::new().with_rows(
            "v$controlfile",
            vec![
                text_row(&["+DATA/ORCL/control01.ctl"]),
                text_row(&["+FRA/ORCL/control02.ctl"]),
            ],
        );
        let rule = RuleValue::Bool(true);
        let result = ControlFileMultiplexingCheck::new()
            .execute(&source, "PROD", &CheckParams::with_rule(&rule))
            .await;
        assert!(result.passed);
        assert_eq!(result.actual_value, "2 disk group(s): DATA, FRA");
    }

    #[tokio::test]
    async fn test_same_group_fails() {
        let source = MockSource::new().with_rows(
            "v$controlfile",
            vec![
                text_row(&["+DATA/ORCL/control01.ctl"]),
                text_row(&["+DATA/ORCL/control02.ctl"]),
            ],
        );
        let rule = RuleValue::Bool(true);
        let result = ControlFileMultiplexingCheck::new()
            .execute(&source, "PROD", &CheckParams::with_rule(&rule))
            .await;
        assert!(!result.passed);
        assert!(result.message.contains("Found 1 disk group(s), need at least 2"));
    }
}
