// fleetcheck-core/src/ports/provider.rs

use crate::domain::inventory::DatabaseTarget;
use crate::error::FleetError;
use crate::ports::data_source::DataSource;
use async_trait::async_trait;

/// Hands out data-source handles for inventory targets.
///
/// Pooling is the provider's business. The engine only guarantees that every
/// handle it acquires is given back through `release` before it moves on.
#[async_trait]
pub trait SourceProvider: Send + Sync {
    async fn acquire(&self, target: &DatabaseTarget) -> Result<Box<dyn DataSource>, FleetError>;

    async fn release(&self, target: &DatabaseTarget, handle: Box<dyn DataSource>);
}
