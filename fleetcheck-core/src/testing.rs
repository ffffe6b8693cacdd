// fleetcheck-core/src/testing.rs

// Doubles partagés par les tests unitaires (checks, engine).
#![allow(clippy::unwrap_used)]

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::domain::inventory::{AuthMode, DatabaseTarget, EngineKind, Secret};
use crate::error::FleetError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::data_source::{DataSource, Row, ScalarValue};
use crate::ports::provider::SourceProvider;

/// Scripted data source: the first fragment contained in the query text wins.
#[derive(Default)]
pub struct MockSource {
    responses: Vec<(String, Result<Vec<Row>, String>)>,
    queries: Mutex<Vec<String>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(mut self, fragment: &str, rows: Vec<Row>) -> Self {
        self.responses.push((fragment.to_string(), Ok(rows)));
        self
    }

    pub fn with_value(self, fragment: &str, value: impl Into<ScalarValue>) -> Self {
        self.with_rows(fragment, vec![vec![value.into()]])
    }

    pub fn with_fault(mut self, fragment: &str, message: &str) -> Self {
        self.responses.push((fragment.to_string(), Err(message.to_string())));
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    fn lookup(&self, query: &str) -> Result<Vec<Row>, FleetError> {
        self.queries.lock().unwrap().push(query.to_string());
        let (_, response) = self
            .responses
            .iter()
            .find(|(fragment, _)| query.contains(fragment.as_str()))
            .ok_or_else(|| FleetError::InternalError(format!("no scripted response for: {query}")))?;
        response.clone().map_err(FleetError::InternalError)
    }
}

#[async_trait]
impl DataSource for MockSource {
    async fn fetch_one(&self, query: &str) -> Result<Option<Row>, FleetError> {
        Ok(self.lookup(query)?.into_iter().next())
    }

    async fn fetch_all(&self, query: &str) -> Result<Vec<Row>, FleetError> {
        self.lookup(query)
    }
}

/// Shorthand for a row of text cells.
pub fn text_row(cells: &[&str]) -> Row {
    cells.iter().map(|c| ScalarValue::from(*c)).collect()
}

struct SharedSource(Arc<MockSource>);

#[async_trait]
impl DataSource for SharedSource {
    async fn fetch_one(&self, query: &str) -> Result<Option<Row>, FleetError> {
        self.0.fetch_one(query).await
    }

    async fn fetch_all(&self, query: &str) -> Result<Vec<Row>, FleetError> {
        self.0.fetch_all(query).await
    }
}

/// Serves the same scripted source to every target, except the unreachable ones.
pub struct MockProvider {
    source: Arc<MockSource>,
    unreachable: BTreeSet<String>,
    pub acquired: AtomicUsize,
    pub released: AtomicUsize,
}

impl MockProvider {
    pub fn new(source: MockSource) -> Self {
        Self {
            source: Arc::new(source),
            unreachable: BTreeSet::new(),
            acquired: AtomicUsize::new(0),
            released: AtomicUsize::new(0),
        }
    }

    pub fn unreachable(mut self, instance: &str) -> Self {
        self.unreachable.insert(instance.to_string());
        self
    }

    pub fn balance(&self) -> (usize, usize) {
        (
            self.acquired.load(Ordering::SeqCst),
            self.released.load(Ordering::SeqCst),
        )
    }
}

#[async_trait]
impl SourceProvider for MockProvider {
    async fn acquire(&self, target: &DatabaseTarget) -> Result<Box<dyn DataSource>, FleetError> {
        if self.unreachable.contains(&target.name) {
            return Err(InfrastructureError::ConnectionFault {
                instance: target.name.clone(),
                reason: "ORA-12541: TNS:no listener".to_string(),
            }
            .into());
        }
        self.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(SharedSource(Arc::clone(&self.source))))
    }

    async fn release(&self, _target: &DatabaseTarget, _handle: Box<dyn DataSource>) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn target(name: &str) -> DatabaseTarget {
    DatabaseTarget {
        name: name.to_string(),
        hostname: "localhost".to_string(),
        port: 1521,
        service_name: name.to_lowercase(),
        username: "monitor".to_string(),
        password: Secret::new("secret"),
        auth_mode: AuthMode::Default,
        engine: EngineKind::Oracle,
        path: None,
    }
}
