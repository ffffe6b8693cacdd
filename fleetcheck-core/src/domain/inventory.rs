// fleetcheck-core/src/domain/inventory.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use tracing::warn;

pub const DEFAULT_PORT: u16 = 1521;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    #[default]
    Default,
    Sysdba,
    Sysoper,
}

/// Which adapter serves a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    #[default]
    Oracle,
    /// Offline snapshot of the catalog views, stored in a DuckDB file.
    #[serde(rename = "duckdb")]
    DuckDb,
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineKind::Oracle => write!(f, "oracle"),
            EngineKind::DuckDb => write!(f, "duckdb"),
        }
    }
}

/// Password holder that never shows up in logs.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(****)")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseTarget {
    pub name: String,
    pub hostname: String,
    pub port: u16,
    pub service_name: String,
    pub username: String,
    pub password: Secret,
    pub auth_mode: AuthMode,
    pub engine: EngineKind,
    pub path: Option<PathBuf>,
}

impl DatabaseTarget {
    /// Connect descriptor for network clients.
    pub fn connect_descriptor(&self) -> String {
        format!(
            "(DESCRIPTION=(ADDRESS=(PROTOCOL=TCP)(HOST={})(PORT={}))(CONNECT_DATA=(SERVICE_NAME={})))",
            self.hostname, self.port, self.service_name
        )
    }

    /// Short location used in logs and reports.
    pub fn endpoint(&self) -> String {
        match (&self.engine, &self.path) {
            (EngineKind::DuckDb, Some(path)) => path.display().to_string(),
            _ => format!("{}:{}/{}", self.hostname, self.port, self.service_name),
        }
    }
}

/// The fleet, in name order.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    targets: Vec<DatabaseTarget>,
}

impl Inventory {
    pub fn new(mut targets: Vec<DatabaseTarget>) -> Self {
        targets.sort_by(|a, b| a.name.cmp(&b.name));
        Self { targets }
    }

    pub fn names(&self) -> Vec<&str> {
        self.targets.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&DatabaseTarget> {
        self.targets.iter().find(|t| t.name == name)
    }

    pub fn targets(&self) -> &[DatabaseTarget] {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Keeps the requested instances, in inventory order. An empty filter
    /// selects everything.
    pub fn select(&self, names: &[String]) -> Vec<DatabaseTarget> {
        if names.is_empty() {
            return self.targets.clone();
        }
        for name in names {
            if self.get(name).is_none() {
                warn!(instance = %name, "⚠️  Unknown instance requested, ignoring");
            }
        }
        self.targets
            .iter()
            .filter(|t| names.iter().any(|n| n == &t.name))
            .cloned()
            .collect()
    }
}
