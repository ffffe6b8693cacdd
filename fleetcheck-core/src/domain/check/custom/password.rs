// fleetcheck-core/src/domain/check/custom/password.rs

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use validator::Validate;

use super::{cell, sql_literal};
use crate::domain::check::{Category, Check, CheckMeta, CheckParams, CheckResult, invalid_rule};
use crate::domain::error::DomainError;
use crate::domain::rules::RuleValue;
use crate::ports::data_source::DataSource;

/// One required verify function and the profiles that must use it.
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
pub struct PasswordPolicy {
    #[validate(length(min = 1, message = "validation_function cannot be empty"))]
    pub validation_function: String,

    #[validate(length(min = 1, message = "at least one profile is required"))]
    pub profiles: Vec<String>,
}

/// Accepts a single policy map or a list of them. `false` disables the check.
pub fn parse_policies(rule: &RuleValue) -> Result<Vec<PasswordPolicy>, String> {
    let policies = match rule {
        RuleValue::Bool(false) => return Ok(Vec::new()),
        RuleValue::Structured(value @ serde_yaml::Value::Sequence(_)) => {
            serde_yaml::from_value::<Vec<PasswordPolicy>>(value.clone()).map_err(|e| e.to_string())?
        }
        RuleValue::Structured(value @ serde_yaml::Value::Mapping(_)) => {
            vec![serde_yaml::from_value::<PasswordPolicy>(value.clone()).map_err(|e| e.to_string())?]
        }
        other => {
            return Err(format!(
                "expects {{validation_function, profiles}} or a list of them, got '{other}'"
            ));
        }
    };
    for policy in &policies {
        policy.validate().map_err(|e| e.to_string())?;
    }
    Ok(policies)
}

/// Verdict for one policy.
struct PolicyOutcome {
    passed: bool,
    actual: String,
    expected: String,
}

pub struct PasswordValidationCheck {
    meta: CheckMeta,
}

impl PasswordValidationCheck {
    pub fn new() -> Self {
        Self {
            meta: CheckMeta::new(
                "password_validation_function",
                "PASSWORD_VALIDATION_FUNCTION",
                Category::Security,
                "Checks that the required profiles use the expected password verify function",
            ),
        }
    }

    async fn evaluate(
        &self,
        source: &dyn DataSource,
        policy: &PasswordPolicy,
    ) -> Result<PolicyOutcome, String> {
        let wanted: Vec<String> = policy.profiles.iter().map(|p| p.to_uppercase()).collect();
        let in_list = wanted.iter().map(|p| sql_literal(p)).collect::<Vec<_>>().join(", ");
        let query = format!(
            "SELECT profile, limit FROM dba_profiles \
             WHERE resource_name = 'PASSWORD_VERIFY_FUNCTION' AND profile IN ({in_list})"
        );
        let rows = source.fetch_all(&query).await.map_err(|e| e.to_string())?;

        // profile -> configured function (None when NULL)
        let configured: BTreeMap<String, Option<String>> = rows
            .iter()
            .filter_map(|r| cell(r, 0).map(|profile| (profile.to_uppercase(), cell(r, 1))))
            .collect();

        let function = policy.validation_function.to_uppercase();
        let mut wrong = Vec::new();
        let mut without = Vec::new();
        for profile in &wanted {
            match configured.get(profile) {
                Some(Some(limit)) if limit.to_uppercase().contains(&function) => {}
                Some(Some(limit)) if !limit.eq_ignore_ascii_case("NULL") => {
                    wrong.push(format!("{profile}({limit})"));
                }
                _ => without.push(profile.clone()),
            }
        }

        let passed = wrong.is_empty() && without.is_empty();
        let actual = if passed {
            format!("All {} profile(s) configured", wanted.len())
        } else {
            let mut parts = Vec::new();
            if !wrong.is_empty() {
                parts.push(format!("Wrong function: {}", wrong.join(", ")));
            }
            if !without.is_empty() {
                parts.push(format!("Not configured: {}", without.join(", ")));
            }
            parts.join("; ")
        };
        Ok(PolicyOutcome {
            passed,
            actual,
            expected: format!("{} on {} profile(s)", policy.validation_function, wanted.len()),
        })
    }
}

impl Default for PasswordValidationCheck {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Check for PasswordValidationCheck {
    fn meta(&self) -> &CheckMeta {
        &self.meta
    }

    fn validate_rule(&self, rule: &RuleValue) -> Result<(), DomainError> {
        parse_policies(rule).map(|_| ()).map_err(|reason| invalid_rule(&self.meta, reason))
    }

    async fn execute(
        &self,
        source: &dyn DataSource,
        instance: &str,
        params: &CheckParams<'_>,
    ) -> CheckResult {
        let policies = match params.rule.map(parse_policies) {
            None => Vec::new(),
            Some(Ok(policies)) => policies,
            Some(Err(e)) => {
                return CheckResult::fault(&self.meta, instance, "N/A", format!("Invalid configuration: {e}"));
            }
        };
        if policies.is_empty() {
            return CheckResult::new(
                &self.meta,
                instance,
                true,
                "N/A",
                "N/A",
                "No password validation configuration specified",
            );
        }

        let mut outcomes = Vec::with_capacity(policies.len());
        for policy in &policies {
            match self.evaluate(source, policy).await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    let expected = format!("{} on {} profile(s)", policy.validation_function, policy.profiles.len());
                    return CheckResult::fault(
                        &self.meta,
                        instance,
                        expected,
                        format!("Error checking password validation function: {e}"),
                    );
                }
            }
        }

        let passed = outcomes.iter().all(|o| o.passed);
        let actual = outcomes.iter().map(|o| o.actual.as_str()).collect::<Vec<_>>().join(" | ");
        let expected = outcomes.iter().map(|o| o.expected.as_str()).collect::<Vec<_>>().join(" | ");
        CheckResult::new(&self.meta, instance, passed, actual, expected, "")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ports::data_source::ScalarValue;
    use crate::testing::{MockSource, text_row};

    fn rule(yaml: &str) -> RuleValue {
        RuleValue::Structured(serde_yaml::from_str(yaml).unwrap())
    }

    #[test]
    fn test_parse_single_and_list() {
        let single = rule("{validation_function: ORA12C_VERIFY_FUNCTION, profiles: [DEFAULT, APP]}");
        assert_eq!(parse_policies(&single).unwrap().len(), 1);

        let list = rule(
            "[{validation_function: F1, profiles: [DEFAULT]}, {validation_function: F2, profiles: [APP]}]",
        );
        assert_eq!(parse_policies(&list).unwrap().len(), 2);

        assert!(parse_policies(&RuleValue::Bool(false)).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_shapes_rejected_at_load() {
        let check = PasswordValidationCheck::new();
        assert!(check.validate_rule(&rule("{validation_function: F1, profiles: []}")).is_err());
        assert!(check.validate_rule(&rule("{profiles: [DEFAULT]}")).is_err());
        assert!(check.validate_rule(&RuleValue::from("F1")).is_err());
    }

    #[tokio::test]
    async fn test_profiles_classified() {
        let source = MockSource::new().with_rows(
            "dba_profiles",
            vec![
                text_row(&["DEFAULT", "ORA12C_VERIFY_FUNCTION"]),
                text_row(&["APP", "VERIFY_FUNCTION_11G"]),
                vec![ScalarValue::from("BATCH"), ScalarValue::Null],
            ],
        );
        let config = rule(
            "{validation_function: ora12c_verify_function, profiles: [DEFAULT, APP, BATCH, MISSING]}",
        );
        let result = PasswordValidationCheck::new()
            .execute(&source, "PROD", &CheckParams::with_rule(&config))
            .await;
        assert!(!result.passed);
        assert_eq!(
            result.actual_value,
            "Wrong function: APP(VERIFY_FUNCTION_11G); Not configured: BATCH, MISSING"
        );
        assert_eq!(result.expected_value, "ora12c_verify_function on 4 profile(s)");
        assert!(source.queries()[0].contains("IN ('DEFAULT', 'APP', 'BATCH', 'MISSING')"));
    }

    #[tokio::test]
    async fn test_all_profiles_configured() {
        let source = MockSource::new().with_rows(
            "dba_profiles",
            vec![text_row(&["DEFAULT", "ORA12C_STRONG_VERIFY_FUNCTION"])],
        );
        let config = rule("{validation_function: ORA12C_STRONG_VERIFY_FUNCTION, profiles: [default]}");
        let result = PasswordValidationCheck::new()
            .execute(&source, "PROD", &CheckParams::with_rule(&config))
            .await;
        assert!(result.passed);
        assert_eq!(result.actual_value, "All 1 profile(s) configured");
    }

    #[tokio::test]
    async fn test_disabled_config_passes() {
        let source = MockSource::new();
        let off = RuleValue::Bool(false);
        let result = PasswordValidationCheck::new()
            .execute(&source, "PROD", &CheckParams::with_rule(&off))
            .await;
        assert!(result.passed);
        assert_eq!(result.message, "No password validation configuration specified");
    }
}
