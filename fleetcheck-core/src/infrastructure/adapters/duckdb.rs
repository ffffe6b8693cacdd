// fleetcheck-core/src/infrastructure/adapters/duckdb.rs

// Snapshot adapter: a DuckDB file holding copies of the catalog views
// ("v$parameter", "v$datafile", ...) exported from a live instance.

use async_trait::async_trait;
use duckdb::types::Value;
use duckdb::{AccessMode, Config, Connection};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

// Imports Hexagonaux
use crate::domain::inventory::{DatabaseTarget, EngineKind};
use crate::error::FleetError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::data_source::{DataSource, Row, ScalarValue};
use crate::ports::provider::SourceProvider;

/// Cheap to clone: clones share the same connection.
#[derive(Clone)]
pub struct DuckDbSource {
    conn: Arc<Mutex<Connection>>,
}

impl DuckDbSource {
    pub fn in_memory() -> Result<Self, InfrastructureError> {
        let conn = Connection::open_in_memory_with_flags(Config::default())?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Opens an existing snapshot file, read-only.
    pub fn open_snapshot(path: &Path) -> Result<Self, InfrastructureError> {
        let config = Config::default().access_mode(AccessMode::ReadOnly)?;
        let conn = Connection::open_with_flags(path, config)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, FleetError> {
        self.conn.lock().map_err(|_| {
            FleetError::Infrastructure(InfrastructureError::Io(std::io::Error::other(
                "DuckDB Mutex Poisoned",
            )))
        })
    }

    /// Runs a statement without result set (seeding in-memory snapshots).
    pub fn execute_batch(&self, sql: &str) -> Result<(), FleetError> {
        let conn = self.lock()?;
        conn.execute_batch(sql)?;
        Ok(())
    }

    fn query_rows(&self, query: &str, limit: Option<usize>) -> Result<Vec<Row>, FleetError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(query)?;
        let mut rows = stmt.query([])?;

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let width = row.as_ref().column_count();
            let mut cells = Vec::with_capacity(width);
            for i in 0..width {
                cells.push(to_scalar(row.get::<_, Value>(i)?));
            }
            out.push(cells);
            if limit.is_some_and(|l| out.len() >= l) {
                break;
            }
        }
        Ok(out)
    }
}

fn to_scalar(value: Value) -> ScalarValue {
    match value {
        Value::Null => ScalarValue::Null,
        Value::Boolean(b) => ScalarValue::Bool(b),
        Value::TinyInt(i) => ScalarValue::Int(i.into()),
        Value::SmallInt(i) => ScalarValue::Int(i.into()),
        Value::Int(i) => ScalarValue::Int(i.into()),
        Value::BigInt(i) => ScalarValue::Int(i),
        Value::HugeInt(i) => i64::try_from(i)
            .map(ScalarValue::Int)
            .unwrap_or_else(|_| ScalarValue::Text(i.to_string())),
        Value::UTinyInt(u) => ScalarValue::Int(u.into()),
        Value::USmallInt(u) => ScalarValue::Int(u.into()),
        Value::UInt(u) => ScalarValue::Int(u.into()),
        Value::UBigInt(u) => i64::try_from(u)
            .map(ScalarValue::Int)
            .unwrap_or_else(|_| ScalarValue::Text(u.to_string())),
        Value::Float(f) => ScalarValue::Float(f.into()),
        Value::Double(f) => ScalarValue::Float(f),
        Value::Decimal(d) => {
            let text = d.to_string();
            text.parse::<f64>()
                .map(ScalarValue::Float)
                .unwrap_or(ScalarValue::Text(text))
        }
        Value::Text(s) => ScalarValue::Text(s),
        other => ScalarValue::Text(format!("{other:?}")),
    }
}

#[async_trait]
impl DataSource for DuckDbSource {
    async fn fetch_one(&self, query: &str) -> Result<Option<Row>, FleetError> {
        Ok(self.query_rows(query, Some(1))?.into_iter().next())
    }

    async fn fetch_all(&self, query: &str) -> Result<Vec<Row>, FleetError> {
        self.query_rows(query, None)
    }
}

/// Serves `engine: duckdb` targets. Connections are cached per snapshot path
/// and reused by later acquisitions.
#[derive(Default)]
pub struct DuckDbProvider {
    pool: Mutex<HashMap<PathBuf, DuckDbSource>>,
}

impl DuckDbProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn fault(target: &DatabaseTarget, reason: impl Into<String>) -> FleetError {
        InfrastructureError::ConnectionFault {
            instance: target.name.clone(),
            reason: reason.into(),
        }
        .into()
    }
}

#[async_trait]
impl SourceProvider for DuckDbProvider {
    async fn acquire(&self, target: &DatabaseTarget) -> Result<Box<dyn DataSource>, FleetError> {
        if target.engine != EngineKind::DuckDb {
            return Err(Self::fault(
                target,
                format!(
                    "no client for engine '{}' in this build, export a duckdb snapshot instead",
                    target.engine
                ),
            ));
        }
        let path = target
            .path
            .as_ref()
            .ok_or_else(|| Self::fault(target, "no snapshot path configured"))?;
        if !path.exists() {
            return Err(Self::fault(target, format!("snapshot {} not found", path.display())));
        }

        let mut pool = self
            .pool
            .lock()
            .map_err(|_| Self::fault(target, "connection pool poisoned"))?;
        if let Some(source) = pool.get(path) {
            debug!(instance = %target.name, "♻️  Reusing pooled snapshot connection");
            return Ok(Box::new(source.clone()));
        }

        let source = DuckDbSource::open_snapshot(path).map_err(|e| Self::fault(target, e.to_string()))?;
        pool.insert(path.clone(), source.clone());
        Ok(Box::new(source))
    }

    async fn release(&self, target: &DatabaseTarget, handle: Box<dyn DataSource>) {
        // the pooled clone keeps the connection open
        drop(handle);
        debug!(instance = %target.name, "Handle released");
    }
}
