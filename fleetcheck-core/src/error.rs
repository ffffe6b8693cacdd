// fleetcheck-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FleetError {
    // --- ERREURS DU DOMAINE (Checks, Règles, Registry) ---
    #[error(transparent)]
    Domain(#[from] DomainError),

    // --- ERREURS D'INFRASTRUCTURE (IO, Parsing, Connexions) ---
    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),

    // --- ERREURS GÉNÉRIQUES / APPLICATIVES ---
    #[error("Internal Error: {0}")]
    InternalError(String),

    #[error("Unsafe path traversal detected: {0}")]
    UnsafePath(String),
}

// Manual implementation to avoid duplicate enum variant but keep ergonomics
impl From<std::io::Error> for FleetError {
    fn from(err: std::io::Error) -> Self {
        FleetError::Infrastructure(InfrastructureError::Io(err))
    }
}

impl From<duckdb::Error> for FleetError {
    fn from(err: duckdb::Error) -> Self {
        FleetError::Infrastructure(InfrastructureError::from(err))
    }
}

impl FleetError {
    /// True for faults that make a whole instance unreachable.
    pub fn is_connection_fault(&self) -> bool {
        matches!(
            self,
            FleetError::Infrastructure(InfrastructureError::ConnectionFault { .. })
        )
    }
}
