// fleetcheck-core/src/domain/check/custom/mod.rs

// Checks whose verdict needs several rows, aggregation or cross-referencing.
// Each one owns its own row logic; they share only the helpers below.

pub mod container;
pub mod multiplexing;
pub mod packs;
pub mod password;
pub mod redo_size;
pub mod retention;
pub mod scheduler;
pub mod storage;

use std::sync::Arc;

use super::{Check, CheckMeta, invalid_rule};
use crate::domain::error::DomainError;
use crate::domain::rules::RuleValue;
use crate::ports::data_source::Row;

pub use container::PdbSaveStateCheck;
pub use multiplexing::ControlFileMultiplexingCheck;
pub use packs::ManagementPackCheck;
pub use password::{PasswordPolicy, PasswordValidationCheck};
pub use redo_size::RedoLogSizeCheck;
pub use retention::{JobClassRetentionCheck, SchedulerLogRetentionCheck};
pub use scheduler::{AuditTrailPurgeJobCheck, SchedulerJobsStatusCheck};
pub use storage::StorageLocationCheck;

pub const LIST_PREVIEW: usize = 3;

/// "a, b, c... (+2 more)"
pub(crate) fn preview(items: &[String], limit: usize) -> String {
    let shown = items.iter().take(limit).cloned().collect::<Vec<_>>().join(", ");
    if items.len() > limit {
        format!("{shown}... (+{} more)", items.len() - limit)
    } else {
        shown
    }
}

/// Text of the cell at `index`, `None` for NULL or a short row.
pub(crate) fn cell(row: &Row, index: usize) -> Option<String> {
    row.get(index).and_then(|v| v.as_text())
}

/// Toggleable checks only take a boolean switch.
pub(crate) fn expect_switch(meta: &CheckMeta, rule: &RuleValue) -> Result<(), DomainError> {
    match rule {
        RuleValue::Bool(_) => Ok(()),
        other => Err(invalid_rule(meta, format!("expects true or false, got '{other}'"))),
    }
}

/// Quotes a value for an IN (...) list.
pub(crate) fn sql_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

pub fn datafiles_asm() -> Arc<dyn Check> {
    Arc::new(StorageLocationCheck::datafiles())
}

pub fn recovery_logs_asm() -> Arc<dyn Check> {
    Arc::new(StorageLocationCheck::redo_logs())
}

pub fn control_file_multiplexing() -> Arc<dyn Check> {
    Arc::new(ControlFileMultiplexingCheck::new())
}

pub fn redo_log_size() -> Arc<dyn Check> {
    Arc::new(RedoLogSizeCheck::new())
}

pub fn scheduler_jobs_status() -> Arc<dyn Check> {
    Arc::new(SchedulerJobsStatusCheck::new())
}

pub fn scheduler_log_retention_days() -> Arc<dyn Check> {
    Arc::new(SchedulerLogRetentionCheck::new())
}

pub fn job_class_log_retention_days() -> Arc<dyn Check> {
    Arc::new(JobClassRetentionCheck::new())
}

pub fn audit_trail_purge_job() -> Arc<dyn Check> {
    Arc::new(AuditTrailPurgeJobCheck::new())
}

pub fn pdb_save_state() -> Arc<dyn Check> {
    Arc::new(PdbSaveStateCheck::new())
}

pub fn password_validation_function() -> Arc<dyn Check> {
    Arc::new(PasswordValidationCheck::new())
}

pub fn management_pack() -> Arc<dyn Check> {
    Arc::new(ManagementPackCheck::new())
}
