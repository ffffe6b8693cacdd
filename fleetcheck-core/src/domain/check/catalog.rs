// fleetcheck-core/src/domain/check/catalog.rs

// Table statique des checks livrés avec le binaire.
// Adding a check = one line here; typos in rule names show up at preflight.

use std::sync::Arc;

use super::custom;
use super::{Category, Check, CheckMeta, Normalizer, ThresholdCheck, ValidationType};
use crate::domain::rules::RuleValue;

/// Static threshold as it can be written in a `const`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleValueLiteral {
    Int(i64),
    Text(&'static str),
}

impl RuleValueLiteral {
    pub fn to_rule_value(self) -> RuleValue {
        match self {
            RuleValueLiteral::Int(i) => RuleValue::Int(i),
            RuleValueLiteral::Text(s) => RuleValue::Text(s.to_string()),
        }
    }
}

/// Literal form of a threshold check, so the table can live in a `const`.
pub struct ThresholdSpec {
    pub name: &'static str,
    pub display_name: &'static str,
    pub category: Category,
    pub description: &'static str,
    pub query: &'static str,
    pub validation: ValidationType,
    pub threshold: Option<RuleValueLiteral>,
    pub normalizer: Option<Normalizer>,
}

impl ThresholdSpec {
    pub fn build(&self) -> ThresholdCheck {
        let meta = CheckMeta::new(self.name, self.display_name, self.category, self.description);
        let mut check = ThresholdCheck::new(meta, self.query, self.validation);
        if let Some(threshold) = self.threshold {
            check = check.with_threshold(threshold.to_rule_value());
        }
        if let Some(normalizer) = self.normalizer {
            check = check.with_normalizer(normalizer);
        }
        check
    }
}

const fn spec(
    name: &'static str,
    display_name: &'static str,
    category: Category,
    description: &'static str,
    query: &'static str,
    validation: ValidationType,
) -> ThresholdSpec {
    ThresholdSpec {
        name,
        display_name,
        category,
        description,
        query,
        validation,
        threshold: None,
        normalizer: None,
    }
}

const fn with(
    mut spec: ThresholdSpec,
    threshold: Option<RuleValueLiteral>,
    normalizer: Option<Normalizer>,
) -> ThresholdSpec {
    spec.threshold = threshold;
    spec.normalizer = normalizer;
    spec
}

use Category::*;
use RuleValueLiteral::{Int, Text};
use ValidationType::*;

pub const THRESHOLD_CHECKS: &[ThresholdSpec] = &[
    // --- Memory ---
    spec(
        "sga_target_min_gb",
        "SGA_TARGET_MIN",
        Memory,
        "Checks the minimum SGA target size (GB)",
        "SELECT value FROM v$parameter WHERE name = 'sga_target'",
        Minimum,
    ),
    spec(
        "sga_max_size_required",
        "SGA_MAX_SIZE",
        Memory,
        "Checks that sga_max_size is set",
        "SELECT value FROM v$parameter WHERE name = 'sga_max_size' AND value != '0'",
        Required,
    ),
    spec(
        "pga_aggregate_target_required",
        "PGA_AGGREGATE_TARGET",
        Memory,
        "Checks that pga_aggregate_target is set",
        "SELECT value FROM v$parameter WHERE name = 'pga_aggregate_target' AND value != '0'",
        Required,
    ),
    spec(
        "pga_aggregate_limit_required",
        "PGA_AGGREGATE_LIMIT",
        Memory,
        "Checks that pga_aggregate_limit is set",
        "SELECT value FROM v$parameter WHERE name = 'pga_aggregate_limit' AND value != '0'",
        Required,
    ),
    spec(
        "memory_target_required",
        "MEMORY_TARGET",
        Memory,
        "Checks that memory_target is set",
        "SELECT value FROM v$parameter WHERE name = 'memory_target' AND value != '0'",
        Required,
    ),
    with(
        spec(
            "dism_enabled",
            "DISM_ENABLED",
            Memory,
            "Checks whether Dynamic Intimate Shared Memory is in use (sga_target below sga_max_size)",
            "SELECT CASE WHEN t.value > 0 AND t.value < m.value THEN 'True' ELSE 'False' END \
             FROM (SELECT TO_NUMBER(value) AS value FROM v$parameter WHERE name = 'sga_target') t, \
             (SELECT TO_NUMBER(value) AS value FROM v$parameter WHERE name = 'sga_max_size') m",
            Equals,
        ),
        Some(Text("True")),
        None,
    ),
    // --- Performance & Tuning ---
    with(
        spec(
            "optimizer_mode",
            "OPTIMIZER_MODE",
            Performance,
            "Checks the optimizer mode",
            "SELECT value FROM v$parameter WHERE name = 'optimizer_mode'",
            Equals,
        ),
        Some(Text("all_rows")),
        Some(Normalizer::Lowercase),
    ),
    with(
        spec(
            "processes_min",
            "PROCESSES_MIN",
            Performance,
            "Checks the minimum number of processes",
            "SELECT value FROM v$parameter WHERE name = 'processes'",
            Minimum,
        ),
        Some(Int(1000)),
        None,
    ),
    with(
        spec(
            "db_files_min",
            "DB_FILES_MIN",
            Performance,
            "Checks the minimum db_files setting",
            "SELECT value FROM v$parameter WHERE name = 'db_files'",
            Minimum,
        ),
        Some(Int(2500)),
        None,
    ),
    with(
        spec(
            "sessions_min",
            "SESSIONS_MIN",
            Performance,
            "Checks the minimum number of sessions",
            "SELECT value FROM v$parameter WHERE name = 'sessions'",
            Minimum,
        ),
        Some(Int(1000)),
        None,
    ),
    with(
        spec(
            "open_cursors_min",
            "OPEN_CURSORS_MIN",
            Performance,
            "Checks the minimum number of open cursors",
            "SELECT value FROM v$parameter WHERE name = 'open_cursors'",
            Minimum,
        ),
        Some(Int(1000)),
        None,
    ),
    with(
        spec(
            "statistics_level",
            "STATISTICS_LEVEL",
            Performance,
            "Checks the statistics level",
            "SELECT value FROM v$parameter WHERE name = 'statistics_level'",
            Equals,
        ),
        Some(Text("TYPICAL")),
        Some(Normalizer::Uppercase),
    ),
    spec(
        "job_queue_processes_min",
        "JOB_QUEUE_PROCESSES",
        Performance,
        "Checks the minimum number of job queue processes",
        "SELECT value FROM v$parameter WHERE name = 'job_queue_processes'",
        Minimum,
    ),
    spec(
        "jobs_enabled_min",
        "JOBS_ENABLED",
        Performance,
        "Checks the minimum number of enabled scheduler jobs",
        "SELECT COUNT(*) FROM dba_scheduler_jobs WHERE enabled = 'TRUE'",
        Minimum,
    ),
    // --- Backup & Recovery ---
    with(
        spec(
            "archivelog_mode_enabled",
            "ARCHIVELOG_MODE",
            BackupRecovery,
            "Checks that the database runs in ARCHIVELOG mode",
            "SELECT log_mode FROM v$database",
            Equals,
        ),
        Some(Text("True")),
        Some(Normalizer::Archivelog),
    ),
    // --- Feature Configuration ---
    with(
        spec(
            "flashback_enabled",
            "FLASHBACK_ENABLED",
            Feature,
            "Checks that flashback database is enabled",
            "SELECT flashback_on FROM v$database",
            Equals,
        ),
        Some(Text("True")),
        Some(Normalizer::Boolean),
    ),
    with(
        spec(
            "force_logging_enabled",
            "FORCE_LOGGING",
            Feature,
            "Checks that force logging is enabled",
            "SELECT force_logging FROM v$database",
            Equals,
        ),
        Some(Text("True")),
        Some(Normalizer::ForceLogging),
    ),
    // --- Security & Auditing ---
    with(
        spec(
            "unified_auditing_enabled",
            "UNIFIED_AUDITING",
            Security,
            "Checks that auditing is enabled (audit_trail)",
            "SELECT value FROM v$parameter WHERE name = 'audit_trail'",
            Equals,
        ),
        Some(Text("True")),
        Some(Normalizer::AuditTrail),
    ),
    // --- Database Objects ---
    spec(
        "open_dblinks_max",
        "OPEN_DBLINKS",
        DatabaseObjects,
        "Checks the open_links setting",
        "SELECT value FROM v$parameter WHERE name = 'open_links'",
        Minimum,
    ),
];

pub type CheckFactory = fn() -> Arc<dyn Check>;

pub const CUSTOM_CHECKS: &[CheckFactory] = &[
    custom::datafiles_asm,
    custom::recovery_logs_asm,
    custom::control_file_multiplexing,
    custom::redo_log_size,
    custom::scheduler_jobs_status,
    custom::scheduler_log_retention_days,
    custom::job_class_log_retention_days,
    custom::audit_trail_purge_job,
    custom::pdb_save_state,
    custom::password_validation_function,
    custom::management_pack,
];

/// Every built-in check, threshold checks first.
pub fn builtin_checks() -> Vec<Arc<dyn Check>> {
    THRESHOLD_CHECKS
        .iter()
        .map(|spec| Arc::new(spec.build()) as Arc<dyn Check>)
        .chain(CUSTOM_CHECKS.iter().map(|factory| factory()))
        .collect()
}
