// fleetcheck-core/src/domain/check/custom/scheduler.rs

use async_trait::async_trait;

use super::{LIST_PREVIEW, cell, expect_switch, preview};
use crate::domain::check::{Category, Check, CheckMeta, CheckParams, CheckResult};
use crate::domain::error::DomainError;
use crate::domain::rules::{RuleValue, value::is_switched_off};
use crate::ports::data_source::DataSource;

const JOBS_QUERY: &str = "SELECT job_name, enabled FROM dba_scheduler_jobs ORDER BY job_name";

const PURGE_JOBS_QUERY: &str = "SELECT job_name, enabled FROM dba_scheduler_jobs \
     WHERE owner = 'SYS' AND (job_name LIKE '%AUDIT_TRAIL_PURGE%' \
     OR job_name LIKE '%PURGE%LOG%' OR job_name LIKE '%SCHEDULER%PURGE%') \
     ORDER BY job_name";

/// A disabled job whose name contains one of these is an alert.
const CRITICAL_KEYWORDS: [&str; 2] = ["purge", "cleanup"];

fn is_enabled(flag: Option<String>) -> bool {
    flag.is_some_and(|f| matches!(f.trim().to_uppercase().as_str(), "TRUE" | "Y" | "1"))
}

fn is_critical(job_name: &str) -> bool {
    let lower = job_name.to_lowercase();
    CRITICAL_KEYWORDS.iter().any(|k| lower.contains(k))
}

// --- SCHEDULER_JOBS_STATUS ---

/// Informational with alerting: always reports, whatever the rule says.
pub struct SchedulerJobsStatusCheck {
    meta: CheckMeta,
}

impl SchedulerJobsStatusCheck {
    pub fn new() -> Self {
        Self {
            meta: CheckMeta::new(
                "scheduler_jobs_status",
                "SCHEDULER_JOBS_STATUS",
                Category::DatabaseObjects,
                "Checks that no purge or cleanup scheduler job is disabled",
            ),
        }
    }
}

impl Default for SchedulerJobsStatusCheck {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Check for SchedulerJobsStatusCheck {
    fn meta(&self) -> &CheckMeta {
        &self.meta
    }

    fn reports_when_unset(&self) -> bool {
        true
    }

    async fn execute(
        &self,
        source: &dyn DataSource,
        instance: &str,
        _params: &CheckParams<'_>,
    ) -> CheckResult {
        let expected = "All purge/cleanup jobs enabled";
        let rows = match source.fetch_all(JOBS_QUERY).await {
            Ok(rows) => rows,
            Err(e) => {
                return CheckResult::fault(
                    &self.meta,
                    instance,
                    expected,
                    format!("Error checking scheduler jobs: {e}"),
                );
            }
        };

        if rows.is_empty() {
            return CheckResult::new(&self.meta, instance, true, "0 jobs", "N/A", "No scheduler jobs found");
        }

        let mut enabled = 0usize;
        let mut critical_disabled = Vec::new();
        for row in &rows {
            let name = cell(row, 0).unwrap_or_default();
            if is_enabled(cell(row, 1)) {
                enabled += 1;
            } else if is_critical(&name) {
                critical_disabled.push(name);
            }
        }
        let disabled = rows.len() - enabled;
        let actual = format!("{enabled} enabled, {disabled} disabled");

        if critical_disabled.is_empty() {
            let message = format!(
                "All scheduler jobs: {} total ({enabled} enabled, {disabled} disabled)",
                rows.len()
            );
            return CheckResult::new(&self.meta, instance, true, actual, expected, message);
        }

        let message = format!(
            "ALERT: Critical job(s) disabled: {}",
            preview(&critical_disabled, LIST_PREVIEW)
        );
        CheckResult::new(&self.meta, instance, false, actual, expected, message)
    }
}

// --- AUDIT_TRAIL_PURGE_JOB ---

pub struct AuditTrailPurgeJobCheck {
    meta: CheckMeta,
}

impl AuditTrailPurgeJobCheck {
    pub fn new() -> Self {
        Self {
            meta: CheckMeta::new(
                "audit_trail_purge_job",
                "AUDIT_TRAIL_PURGE_JOB",
                Category::Logging,
                "Checks that at least one audit trail or log purge job owned by SYS is enabled",
            ),
        }
    }
}

impl Default for AuditTrailPurgeJobCheck {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Check for AuditTrailPurgeJobCheck {
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

        let expected = "At least one enabled purge job";
        let rows = match source.fetch_all(PURGE_JOBS_QUERY).await {
            Ok(rows) => rows,
            Err(e) => {
                return CheckResult::fault(
                    &self.meta,
                    instance,
                    expected,
                    format!("Error checking audit trail purge jobs: {e}"),
                );
            }
        };

        let (enabled, disabled): (Vec<_>, Vec<_>) = rows
            .iter()
            .map(|r| (cell(r, 0).unwrap_or_default(), is_enabled(cell(r, 1))))
            .partition(|(_, on)| *on);
        let enabled: Vec<String> = enabled.into_iter().map(|(n, _)| n).collect();
        let disabled: Vec<String> = disabled.into_iter().map(|(n, _)| n).collect();

        if !enabled.is_empty() {
            let mut actual = enabled.iter().take(2).cloned().collect::<Vec<_>>().join(", ");
            if enabled.len() > 2 {
                actual.push_str(&format!(" (+{} more)", enabled.len() - 2));
            }
            return CheckResult::new(&self.meta, instance, true, actual, expected, "");
        }

        let actual = match disabled.first() {
            Some(first) => format!("{} job(s) found but disabled: {first}", disabled.len()),
            None => "No purge jobs found".to_string(),
        };
        CheckResult::new(&self.meta, instance, false, actual, expected, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockSource, text_row};

    #[test]
    fn test_jobs_status_is_a_database_object_check() {
        assert_eq!(SchedulerJobsStatusCheck::new().meta().category, Category::DatabaseObjects);
    }

    #[tokio::test]
    async fn test_disabled_purge_job_alerts() {
        let source = MockSource::new().with_rows(
            "dba_scheduler_jobs",
            vec![text_row(&["NIGHTLY_PURGE", "FALSE"]), text_row(&["REPORT_GEN", "TRUE"])],
        );
        let result = SchedulerJobsStatusCheck::new()
            .execute(&source, "PROD", &CheckParams::default())
            .await;
        assert!(!result.passed);
        assert_eq!(result.actual_value, "1 enabled, 1 disabled");
        assert_eq!(result.message, "ALERT: Critical job(s) disabled: NIGHTLY_PURGE");
    }

    #[tokio::test]
    async fn test_non_critical_disabled_jobs_pass() {
        let source = MockSource::new().with_rows(
            "dba_scheduler_jobs",
            vec![text_row(&["LOG_CLEANUP", "TRUE"]), text_row(&["REPORT_GEN", "FALSE"])],
        );
        let result = SchedulerJobsStatusCheck::new()
            .execute(&source, "PROD", &CheckParams::default())
            .await;
        assert!(result.passed);
        assert_eq!(result.message, "All scheduler jobs: 2 total (1 enabled, 1 disabled)");
    }

    #[tokio::test]
    async fn test_job_status_always_reports() {
        let check = SchedulerJobsStatusCheck::new();
        assert!(check.reports_when_unset());

        let empty = MockSource::new().with_rows("dba_scheduler_jobs", vec![]);
        let result = check.execute(&empty, "PROD", &CheckParams::default()).await;
        assert!(result.passed);
        assert_eq!(result.actual_value, "0 jobs");

        let broken = MockSource::new().with_fault("dba_scheduler_jobs", "ORA-00942");
        let result = check.execute(&broken, "PROD", &CheckParams::default()).await;
        assert!(result.is_error());
    }

    #[tokio::test]
    async fn test_purge_job_listing() {
        let rule = RuleValue::Bool(true);
        let source = MockSource::new().with_rows(
            "AUDIT_TRAIL_PURGE",
            vec![
                text_row(&["PURGE_LOG", "TRUE"]),
                text_row(&["STD_AUDIT_TRAIL_PURGE", "TRUE"]),
                text_row(&["FGA_AUDIT_TRAIL_PURGE", "Y"]),
            ],
        );
        let result = AuditTrailPurgeJobCheck::new()
            .execute(&source, "PROD", &CheckParams::with_rule(&rule))
            .await;
        assert!(result.passed);
        assert_eq!(result.actual_value, "PURGE_LOG, STD_AUDIT_TRAIL_PURGE (+1 more)");
    }

    #[tokio::test]
    async fn test_purge_jobs_disabled_or_missing() {
        let rule = RuleValue::Bool(true);
        let disabled = MockSource::new().with_rows(
            "AUDIT_TRAIL_PURGE",
            vec![text_row(&["PURGE_LOG", "FALSE"])],
        );
        let result = AuditTrailPurgeJobCheck::new()
            .execute(&disabled, "PROD", &CheckParams::with_rule(&rule))
            .await;
        assert!(!result.passed);
        assert_eq!(result.actual_value, "1 job(s) found but disabled: PURGE_LOG");
        // no explicit message: the description is used
        assert!(result.message.starts_with("Checks that at least one"));

        let none = MockSource::new().with_rows("AUDIT_TRAIL_PURGE", vec![]);
        let result = AuditTrailPurgeJobCheck::new()
            .execute(&none, "PROD", &CheckParams::with_rule(&rule))
            .await;
        assert_eq!(result.actual_value, "No purge jobs found");
    }
}
