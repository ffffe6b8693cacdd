// fleetcheck-core/src/ports/data_source.rs

// Ce fichier définit ce dont les checks ont besoin, sans savoir comment c'est fait.
// The checks hand over raw query text; only the adapter knows the SQL dialect.

use std::fmt;

use crate::error::FleetError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One scalar cell, independent of the underlying driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

/// An ordered row of scalars, as returned by the data source.
pub type Row = Vec<ScalarValue>;

impl ScalarValue {
    /// SQL NULL and empty strings both count as "not set".
    pub fn is_missing(&self) -> bool {
        match self {
            ScalarValue::Null => true,
            ScalarValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ScalarValue::Int(i) => Some(*i),
            ScalarValue::Float(f) if f.fract() == 0.0 && f.is_finite() => Some(*f as i64),
            ScalarValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ScalarValue::Int(i) => Some(*i as f64),
            ScalarValue::Float(f) => Some(*f),
            ScalarValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Text form used when a check reads names or flags out of a row.
    /// Returns `None` for NULL.
    pub fn as_text(&self) -> Option<String> {
        match self {
            ScalarValue::Null => None,
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Null => write!(f, "None"),
            ScalarValue::Bool(true) => write!(f, "True"),
            ScalarValue::Bool(false) => write!(f, "False"),
            ScalarValue::Int(i) => write!(f, "{i}"),
            // 8.0 reste "8.0" (et non "8") pour distinguer un flottant d'un entier
            ScalarValue::Float(v) if v.fract() == 0.0 && v.abs() < 1e16 => write!(f, "{v:.1}"),
            ScalarValue::Float(v) => write!(f, "{v}"),
            ScalarValue::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::Text(value.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        ScalarValue::Text(value)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Int(value)
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        ScalarValue::Float(value)
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        ScalarValue::Bool(value)
    }
}

impl<T: Into<ScalarValue>> From<Option<T>> for ScalarValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ScalarValue::Null, Into::into)
    }
}

#[async_trait]
pub trait DataSource: Send + Sync {
    /// First row of the result set, `None` when the query returns nothing.
    async fn fetch_one(&self, query: &str) -> Result<Option<Row>, FleetError>;

    async fn fetch_all(&self, query: &str) -> Result<Vec<Row>, FleetError>;
}
