// fleetcheck-core/src/domain/check/threshold.rs

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

use super::{Category, Check, CheckMeta, CheckParams, CheckResult, Normalizer, ValueTransform, invalid_rule};
use crate::domain::error::DomainError;
use crate::domain::rules::{RuleValue, value::is_switched_off};
use crate::ports::data_source::{DataSource, ScalarValue};

pub const NOT_SET: &str = "NOT SET";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationType {
    /// Value must be present. Opt-in: an unset or false threshold means "not required".
    Required,
    #[serde(alias = "min")]
    Minimum,
    #[serde(alias = "max")]
    Maximum,
    /// Case-insensitive string equality.
    Equals,
}

/// Generic check: one scalar from one query, compared to a threshold.
#[derive(Debug, Clone)]
pub struct ThresholdCheck {
    meta: CheckMeta,
    query: String,
    validation: ValidationType,
    threshold: Option<RuleValue>,
    normalizer: Option<Normalizer>,
}

impl ThresholdCheck {
    pub fn new(meta: CheckMeta, query: impl Into<String>, validation: ValidationType) -> Self {
        Self {
            meta,
            query: query.into(),
            validation,
            threshold: None,
            normalizer: None,
        }
    }

    pub fn with_threshold(mut self, threshold: RuleValue) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = Some(normalizer);
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn validation(&self) -> ValidationType {
        self.validation
    }

    pub fn threshold(&self) -> Option<&RuleValue> {
        self.threshold.as_ref()
    }

    fn expected_value(&self, threshold: Option<&RuleValue>) -> String {
        let shown = threshold.map_or_else(|| "None".to_string(), ToString::to_string);
        match self.validation {
            ValidationType::Required => {
                if threshold.is_some_and(RuleValue::is_truthy) {
                    "Set/Enabled".to_string()
                } else {
                    "Not Required".to_string()
                }
            }
            ValidationType::Equals => shown,
            ValidationType::Minimum => format!(">= {shown}"),
            ValidationType::Maximum => format!("<= {shown}"),
        }
    }

    /// Fetch, canonicalise, convert. `None` means the value is not set.
    async fn fetch_value(
        &self,
        source: &dyn DataSource,
        transform: Option<ValueTransform>,
    ) -> Result<Option<ScalarValue>, String> {
        let row = source.fetch_one(&self.query).await.map_err(|e| e.to_string())?;
        let raw = row.and_then(|r| r.into_iter().next()).unwrap_or(ScalarValue::Null);
        if raw.is_missing() {
            return Ok(None);
        }

        let mut value = match self.normalizer {
            Some(normalizer) => normalizer.apply(&raw),
            None => raw,
        };
        if let Some(transform) = transform {
            value = transform(&value)?;
        }
        Ok(Some(value))
    }

    fn compare(&self, value: Option<&ScalarValue>, threshold: Option<&RuleValue>) -> bool {
        match self.validation {
            ValidationType::Required => {
                threshold.is_some_and(RuleValue::is_truthy) && value.is_some()
            }
            ValidationType::Equals => {
                let actual = value.map_or_else(|| NOT_SET.to_string(), ToString::to_string);
                let expected = threshold.map_or_else(|| "None".to_string(), ToString::to_string);
                actual.to_uppercase() == expected.to_uppercase()
            }
            ValidationType::Minimum => {
                numeric_order(value, threshold).is_some_and(|o| o != Ordering::Less)
            }
            ValidationType::Maximum => {
                numeric_order(value, threshold).is_some_and(|o| o != Ordering::Greater)
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Number {
    Int(i64),
    Float(f64),
}

/// Integers only from text; floats only from native floats.
fn as_number(value: &ScalarValue) -> Option<Number> {
    match value {
        ScalarValue::Int(i) => Some(Number::Int(*i)),
        ScalarValue::Float(f) => Some(Number::Float(*f)),
        ScalarValue::Text(s) => s.trim().parse().ok().map(Number::Int),
        _ => None,
    }
}

fn numeric_order(value: Option<&ScalarValue>, threshold: Option<&RuleValue>) -> Option<Ordering> {
    let left = as_number(value?)?;
    let right = as_number(&threshold?.as_scalar()?)?;
    match (left, right) {
        (Number::Int(a), Number::Int(b)) => Some(a.cmp(&b)),
        (Number::Int(a), Number::Float(b)) => (a as f64).partial_cmp(&b),
        (Number::Float(a), Number::Int(b)) => a.partial_cmp(&(b as f64)),
        (Number::Float(a), Number::Float(b)) => a.partial_cmp(&b),
    }
}

#[async_trait]
impl Check for ThresholdCheck {
    fn meta(&self) -> &CheckMeta {
        &self.meta
    }

    fn validate_rule(&self, rule: &RuleValue) -> Result<(), DomainError> {
        if matches!(rule, RuleValue::Structured(_)) {
            return Err(invalid_rule(&self.meta, "expects a scalar threshold"));
        }
        match self.validation {
            ValidationType::Minimum | ValidationType::Maximum if !rule.is_numeric() => Err(
                invalid_rule(&self.meta, format!("expects a number, got '{rule}'")),
            ),
            _ => Ok(()),
        }
    }

    fn reports_when_unset(&self) -> bool {
        self.validation == ValidationType::Required
    }

    async fn execute(
        &self,
        source: &dyn DataSource,
        instance: &str,
        params: &CheckParams<'_>,
    ) -> CheckResult {
        let threshold = params.rule.or(self.threshold.as_ref());

        // only None / false opt out; 0 and "" are real thresholds
        if self.validation == ValidationType::Required && is_switched_off(threshold) {
            return CheckResult::not_required(&self.meta, instance);
        }

        let expected = self.expected_value(threshold);
        let value = match self.fetch_value(source, params.transform).await {
            Ok(value) => value,
            Err(e) => {
                debug!(check = %self.meta.name, instance, error = %e, "Fetch failed");
                return CheckResult::fault(
                    &self.meta,
                    instance,
                    expected,
                    format!("Error executing check: {e}"),
                );
            }
        };

        let passed = match &value {
            None if is_switched_off(threshold) => true,
            _ => self.compare(value.as_ref(), threshold),
        };
        let actual = value.map_or_else(|| NOT_SET.to_string(), |v| v.to_string());
        CheckResult::new(&self.meta, instance, passed, actual, expected, "")
    }
}

/// bytes -> GiB, the unit `sga_target_min_gb` is written in.
pub fn bytes_to_gib(value: &ScalarValue) -> Result<ScalarValue, String> {
    let bytes = value
        .as_i64()
        .ok_or_else(|| format!("invalid literal for a byte count: '{value}'"))?;
    Ok(ScalarValue::Float(bytes as f64 / 1024_f64.powi(3)))
}
