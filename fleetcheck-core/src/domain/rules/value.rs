// fleetcheck-core/src/domain/rules/value.rs

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ports::data_source::ScalarValue;

/// A threshold or sub-configuration, as written in the rule document.
///
/// Structured values are kept opaque here: only the check that owns the
/// rule name knows their shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Structured(serde_yaml::Value),
}

impl RuleValue {
    pub fn is_truthy(&self) -> bool {
        match self {
            RuleValue::Bool(b) => *b,
            RuleValue::Int(i) => *i != 0,
            RuleValue::Float(f) => *f != 0.0,
            RuleValue::Text(s) => !s.is_empty(),
            RuleValue::Structured(v) => match v {
                serde_yaml::Value::Null => false,
                serde_yaml::Value::Sequence(seq) => !seq.is_empty(),
                serde_yaml::Value::Mapping(map) => !map.is_empty(),
                _ => true,
            },
        }
    }

    /// Scalar view, `None` for structured values.
    pub fn as_scalar(&self) -> Option<ScalarValue> {
        match self {
            RuleValue::Bool(b) => Some(ScalarValue::Bool(*b)),
            RuleValue::Int(i) => Some(ScalarValue::Int(*i)),
            RuleValue::Float(f) => Some(ScalarValue::Float(*f)),
            RuleValue::Text(s) => Some(ScalarValue::Text(s.clone())),
            RuleValue::Structured(_) => None,
        }
    }

    /// Integer or float, numeric strings included. Booleans are not numbers here.
    pub fn is_numeric(&self) -> bool {
        match self {
            RuleValue::Int(_) | RuleValue::Float(_) => true,
            RuleValue::Text(s) => s.trim().parse::<i64>().is_ok(),
            _ => false,
        }
    }
}

/// Unset and `false` both switch a toggleable check off.
pub fn is_switched_off(rule: Option<&RuleValue>) -> bool {
    matches!(rule, None | Some(RuleValue::Bool(false)))
}

impl fmt::Display for RuleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleValue::Structured(v) => {
                let rendered = serde_json::to_string(v).map_err(|_| fmt::Error)?;
                write!(f, "{rendered}")
            }
            scalar => match scalar.as_scalar() {
                Some(value) => write!(f, "{value}"),
                None => Ok(()),
            },
        }
    }
}

impl From<i64> for RuleValue {
    fn from(value: i64) -> Self {
        RuleValue::Int(value)
    }
}

impl From<bool> for RuleValue {
    fn from(value: bool) -> Self {
        RuleValue::Bool(value)
    }
}

impl From<&str> for RuleValue {
    fn from(value: &str) -> Self {
        RuleValue::Text(value.to_string())
    }
}
