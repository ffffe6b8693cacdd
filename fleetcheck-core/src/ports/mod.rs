// fleetcheck-core/src/ports/mod.rs

pub mod data_source;
pub mod provider;

pub use data_source::{DataSource, Row, ScalarValue};
pub use provider::SourceProvider;
