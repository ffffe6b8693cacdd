// fleetcheck-core/src/domain/check/custom/retention.rs

use async_trait::async_trait;

use super::{LIST_PREVIEW, cell, preview};
use crate::domain::check::{Category, Check, CheckMeta, CheckParams, CheckResult, invalid_rule};
use crate::domain::error::DomainError;
use crate::domain::rules::RuleValue;
use crate::ports::data_source::DataSource;

const GLOBAL_QUERY: &str =
    "SELECT value FROM dba_scheduler_global_attribute WHERE attribute_name = 'LOG_HISTORY'";
const CLASS_QUERY: &str =
    "SELECT job_class_name, log_history FROM dba_scheduler_job_classes ORDER BY job_class_name";

pub const DEFAULT_GLOBAL_DAYS: i64 = 30;
pub const DEFAULT_CLASS_DAYS: i64 = 1;

/// Minimum retention from the rule: a number of days, `true` for the
/// default, `false` or unset to skip.
fn min_days(rule: Option<&RuleValue>, default: i64) -> Option<i64> {
    match rule {
        None | Some(RuleValue::Bool(false)) => None,
        Some(RuleValue::Bool(true)) => Some(default),
        Some(other) => other.as_scalar().and_then(|v| v.as_i64()),
    }
}

fn validate_days(meta: &CheckMeta, rule: &RuleValue) -> Result<(), DomainError> {
    match rule {
        RuleValue::Bool(_) => Ok(()),
        other => match other.as_scalar().and_then(|v| v.as_i64()) {
            Some(days) if days >= 0 => Ok(()),
            _ => Err(invalid_rule(
                meta,
                format!("expects a number of days or true/false, got '{other}'"),
            )),
        },
    }
}

// --- SCHEDULER_LOG_RETENTION ---

pub struct SchedulerLogRetentionCheck {
    meta: CheckMeta,
}

impl SchedulerLogRetentionCheck {
    pub fn new() -> Self {
        Self {
            meta: CheckMeta::new(
                "scheduler_log_retention_days",
                "SCHEDULER_LOG_RETENTION",
                Category::Logging,
                "Checks the scheduler log history retention (days)",
            ),
        }
    }
}

impl Default for SchedulerLogRetentionCheck {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Check for SchedulerLogRetentionCheck {
    fn meta(&self) -> &CheckMeta {
        &self.meta
    }

    fn validate_rule(&self, rule: &RuleValue) -> Result<(), DomainError> {
        validate_days(&self.meta, rule)
    }

    async fn execute(
        &self,
        source: &dyn DataSource,
        instance: &str,
        params: &CheckParams<'_>,
    ) -> CheckResult {
        let Some(min) = min_days(params.rule, DEFAULT_GLOBAL_DAYS) else {
            return CheckResult::not_required(&self.meta, instance);
        };
        let expected = format!(">= {min} days");

        let value = match source.fetch_one(GLOBAL_QUERY).await {
            Ok(row) => row.and_then(|r| r.into_iter().next()),
            Err(e) => {
                return CheckResult::fault(
                    &self.meta,
                    instance,
                    expected,
                    format!("Error checking scheduler log retention: {e}"),
                );
            }
        };

        let Some(value) = value.filter(|v| !v.is_missing()) else {
            return CheckResult::new(
                &self.meta,
                instance,
                false,
                "Not set",
                expected,
                "Scheduler log history is not configured",
            );
        };
        let Some(days) = value.as_i64() else {
            return CheckResult::fault(
                &self.meta,
                instance,
                expected,
                format!("Error checking scheduler log retention: unexpected value '{value}'"),
            );
        };

        CheckResult::new(&self.meta, instance, days >= min, format!("{days} days"), expected, "")
    }
}

// --- JOB_CLASS_LOG_RETENTION ---

pub struct JobClassRetentionCheck {
    meta: CheckMeta,
}

impl JobClassRetentionCheck {
    pub fn new() -> Self {
        Self {
            meta: CheckMeta::new(
                "job_class_log_retention_days",
                "JOB_CLASS_LOG_RETENTION",
                Category::Logging,
                "Checks that every scheduler job class keeps its logs for the minimum number of days",
            ),
        }
    }
}

impl Default for JobClassRetentionCheck {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Check for JobClassRetentionCheck {
    fn meta(&self) -> &CheckMeta {
        &self.meta
    }

    fn validate_rule(&self, rule: &RuleValue) -> Result<(), DomainError> {
        validate_days(&self.meta, rule)
    }

    async fn execute(
        &self,
        source: &dyn DataSource,
        instance: &str,
        params: &CheckParams<'_>,
    ) -> CheckResult {
        let Some(min) = min_days(params.rule, DEFAULT_CLASS_DAYS) else {
            return CheckResult::not_required(&self.meta, instance);
        };
        let expected = format!("All job classes with log retention >= {min} day(s)");

        let rows = match source.fetch_all(CLASS_QUERY).await {
            Ok(rows) => rows,
            Err(e) => {
                return CheckResult::fault(
                    &self.meta,
                    instance,
                    expected,
                    format!("Error checking job class log retention: {e}"),
                );
            }
        };

        if rows.is_empty() {
            return CheckResult::new(&self.meta, instance, true, "No job classes found", expected, "");
        }

        // NULL log_history inherits the global setting: only acceptable when nothing is required.
        let offenders: Vec<String> = rows
            .iter()
            .filter(|row| match row.get(1).and_then(|v| v.as_i64()) {
                Some(days) => days < min,
                None => min > 0,
            })
            .map(|row| cell(row, 0).unwrap_or_default())
            .collect();

        if offenders.is_empty() {
            let actual = format!("All {} classes configured", rows.len());
            return CheckResult::new(&self.meta, instance, true, actual, expected, "");
        }

        let actual = format!(
            "{} class(es) without retention: {}",
            offenders.len(),
            preview(&offenders, LIST_PREVIEW)
        );
        CheckResult::new(&self.meta, instance, false, actual, expected, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::data_source::ScalarValue;
    use crate::testing::MockSource;

    #[tokio::test]
    async fn test_global_retention_uses_rule_days() {
        let source = MockSource::new().with_value("dba_scheduler_global_attribute", "14");
        let check = SchedulerLogRetentionCheck::new();

        let strict = RuleValue::Int(30);
        let result = check.execute(&source, "PROD", &CheckParams::with_rule(&strict)).await;
        assert!(!result.passed);
        assert_eq!(result.actual_value, "14 days");
        assert_eq!(result.expected_value, ">= 30 days");

        let relaxed = RuleValue::Int(7);
        let result = check.execute(&source, "FREE", &CheckParams::with_rule(&relaxed)).await;
        assert!(result.passed);
    }

    #[tokio::test]
    async fn test_global_retention_not_set() {
        let source = MockSource::new().with_rows("dba_scheduler_global_attribute", vec![]);
        let on = RuleValue::Bool(true);
        let result = SchedulerLogRetentionCheck::new()
            .execute(&source, "PROD", &CheckParams::with_rule(&on))
            .await;
        assert!(!result.passed);
        assert_eq!(result.actual_value, "Not set");
        assert_eq!(result.expected_value, ">= 30 days");
    }

    #[tokio::test]
    async fn test_job_classes() {
        let source = MockSource::new().with_rows(
            "dba_scheduler_job_classes",
            vec![
                vec![ScalarValue::from("DEFAULT_JOB_CLASS"), ScalarValue::Null],
                vec![ScalarValue::from("AUTO_TASKS"), ScalarValue::Int(30)],
            ],
        );
        let check = JobClassRetentionCheck::new();

        let one_day = RuleValue::Int(1);
        let result = check.execute(&source, "PROD", &CheckParams::with_rule(&one_day)).await;
        assert!(!result.passed);
        assert_eq!(result.actual_value, "1 class(es) without retention: DEFAULT_JOB_CLASS");

        let zero = RuleValue::Int(0);
        let result = check.execute(&source, "FREE", &CheckParams::with_rule(&zero)).await;
        assert!(result.passed);
        assert_eq!(result.actual_value, "All 2 classes configured");
    }

    #[tokio::test]
    async fn test_no_job_classes_pass_vacuously() {
        let source = MockSource::new().with_rows("dba_scheduler_job_classes", vec![]);
        let on = RuleValue::Bool(true);
        let result = JobClassRetentionCheck::new()
            .execute(&source, "PROD", &CheckParams::with_rule(&on))
            .await;
        assert!(result.passed);
        assert_eq!(result.expected_value, "All job classes with log retention >= 1 day(s)");
    }

    #[test]
    fn test_rule_shapes() {
        let check = JobClassRetentionCheck::new();
        assert!(check.validate_rule(&RuleValue::Int(0)).is_ok());
        assert!(check.validate_rule(&RuleValue::Bool(false)).is_ok());
        assert!(check.validate_rule(&RuleValue::Int(-1)).is_err());
        assert!(check.validate_rule(&RuleValue::from("forever")).is_err());
    }
}
