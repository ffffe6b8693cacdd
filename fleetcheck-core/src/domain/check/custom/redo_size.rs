// fleetcheck-core/src/domain/check/custom/redo_size.rs

use async_trait::async_trait;

use super::{LIST_PREVIEW, cell, expect_switch, preview};
use crate::domain::check::{Category, Check, CheckMeta, CheckParams, CheckResult};
use crate::domain::error::DomainError;
use crate::domain::rules::{RuleValue, value::is_switched_off};
use crate::ports::data_source::{DataSource, Row};

const QUERY: &str = "SELECT group#, bytes FROM v$log ORDER BY group#";
pub const MIN_BYTES: i64 = 1_073_741_824;

pub struct RedoLogSizeCheck {
    meta: CheckMeta,
}

impl RedoLogSizeCheck {
    pub fn new() -> Self {
        Self {
            meta: CheckMeta::new(
                "redo_log_size",
                "REDO_LOG_SIZE",
                Category::Storage,
                "Checks that every online redo log group is at least 1GB",
            ),
        }
    }
}

impl Default for RedoLogSizeCheck {
    fn default() -> Self {
        Self::new()
    }
}

fn gb(bytes: i64) -> String {
    format!("{:.2}GB", bytes as f64 / MIN_BYTES as f64)
}

fn parse_groups(rows: &[Row]) -> Result<Vec<(String, i64)>, String> {
    rows.iter()
        .map(|row| {
            let group = cell(row, 0).unwrap_or_else(|| "?".to_string());
            let bytes = row
                .get(1)
                .and_then(|v| v.as_i64())
                .ok_or_else(|| format!("invalid size for group {group}"))?;
            Ok((group, bytes))
        })
        .collect()
}

#[async_trait]
impl Check for RedoLogSizeCheck {
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

        let expected = "All redo logs >= 1GB";
        let groups = match source.fetch_all(QUERY).await {
            Ok(rows) => parse_groups(&rows),
            Err(e) => Err(e.to_string()),
        };
        let groups = match groups {
            Ok(groups) => groups,
            Err(e) => {
                return CheckResult::fault(
                    &self.meta,
                    instance,
                    expected,
                    format!("Error checking redo log sizes: {e}"),
                );
            }
        };

        if groups.is_empty() {
            return CheckResult::new(&self.meta, instance, false, "0 redo logs", expected, "No redo log groups found");
        }

        let total = groups.len();
        let (small, large): (Vec<_>, Vec<_>) = groups.into_iter().partition(|(_, b)| *b < MIN_BYTES);

        if small.is_empty() {
            let min = large.iter().map(|(_, b)| *b).min().unwrap_or(MIN_BYTES);
            let actual = format!("All {total} redo logs >= 1GB (min: {})", gb(min));
            return CheckResult::new(&self.meta, instance, true, actual, expected, "");
        }

        let min = small.iter().map(|(_, b)| *b).min().unwrap_or(0);
        let actual = format!(
            "{}/{total} >= 1GB, {} below (min: {})",
            large.len(),
            small.len(),
            gb(min)
        );
        let offenders: Vec<String> = small.iter().map(|(g, b)| format!("Group {g}({})", gb(*b))).collect();
        let message = format!(
            "Found {} redo log(s) below 1GB: {}",
            small.len(),
            preview(&offenders, LIST_PREVIEW)
        );
        CheckResult::new(&self.meta, instance, false, actual, expected, message)
    }
}
