// btbphylo-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PhyloError {
    // --- DOMAIN ERRORS (filter, dedup and reconciliation rules) ---
    #[error(transparent)]
    Domain(#[from] DomainError),

    // --- INFRASTRUCTURE ERRORS (IO, parsing) ---
    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),

    // --- GENERIC / APPLICATION ERRORS ---
    #[error("Internal Error: {0}")]
    InternalError(String),
}

impl PhyloError {
    /// True when the error is the recoverable "too few samples survived" signal.
    pub fn is_insufficient_samples(&self) -> bool {
        matches!(
            self,
            PhyloError::Domain(DomainError::InsufficientSamples { .. })
        )
    }
}

// IO errors outside the CSV adapter (config files, directory walks)
impl From<std::io::Error> for PhyloError {
    fn from(err: std::io::Error) -> Self {
        PhyloError::Infrastructure(InfrastructureError::Io(err))
    }
}
