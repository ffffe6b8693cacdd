// fleetcheck-core/src/domain/check/result.rs

use serde::Serialize;

use super::{Category, CheckMeta};

pub const ERROR_VALUE: &str = "ERROR";

/// Outcome of one check against one instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckResult {
    pub check_name: String,
    pub database: String,
    pub passed: bool,
    pub actual_value: String,
    pub expected_value: String,
    pub message: String,
    pub category: Category,
    /// Set by the engine once the check returns.
    pub is_override: bool,
}

impl CheckResult {
    /// A failing result without message falls back to the check description.
    pub fn new(
        meta: &CheckMeta,
        database: &str,
        passed: bool,
        actual: impl ToString,
        expected: impl ToString,
        message: impl Into<String>,
    ) -> Self {
        let mut message = message.into();
        if !passed && message.is_empty() {
            message = meta.description.clone();
        }
        Self {
            check_name: meta.display_name.clone(),
            database: database.to_string(),
            passed,
            actual_value: actual.to_string(),
            expected_value: expected.to_string(),
            message,
            category: meta.category,
            is_override: false,
        }
    }

    /// Failing result for a fault while fetching or evaluating.
    pub fn fault(
        meta: &CheckMeta,
        database: &str,
        expected: impl ToString,
        message: impl Into<String>,
    ) -> Self {
        Self::new(meta, database, false, ERROR_VALUE, expected, message)
    }

    /// The opt-out result: unset or disabled rule.
    pub fn not_required(meta: &CheckMeta, database: &str) -> Self {
        Self::new(meta, database, true, "N/A", "Not Required", "Check not required")
    }

    pub fn with_override(mut self, is_override: bool) -> Self {
        self.is_override = is_override;
        self
    }

    pub fn is_error(&self) -> bool {
        !self.passed && self.actual_value == ERROR_VALUE
    }

    pub fn status_label(&self) -> &'static str {
        if self.passed { "PASS" } else { "FAIL" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> CheckMeta {
        CheckMeta::new(
            "sessions_min",
            "SESSIONS_MIN",
            Category::Performance,
            "Checks the sessions parameter",
        )
    }

    #[test]
    fn test_failing_result_falls_back_to_description() {
        let result = CheckResult::new(&meta(), "PROD", false, 10, ">= 1000", "");
        assert_eq!(result.message, "Checks the sessions parameter");
        assert_eq!(result.check_name, "SESSIONS_MIN");
        assert_eq!(result.status_label(), "FAIL");
    }

    #[test]
    fn test_passing_result_keeps_empty_message() {
        let result = CheckResult::new(&meta(), "PROD", true, 1500, ">= 1000", "");
        assert!(result.message.is_empty());
        assert!(!result.is_override);
    }

    #[test]
    fn test_fault_and_override_flag() {
        let result = CheckResult::fault(&meta(), "PROD", ">= 1000", "Error executing check: boom")
            .with_override(true);
        assert!(result.is_error());
        assert!(result.is_override);
        assert_eq!(result.actual_value, "ERROR");
    }
}
