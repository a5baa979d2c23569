//! Errors surfaced by the roster engine and mutation coordinator.

use thiserror::Error;

use roster_core::DomainError;

use crate::StoreError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RosterError {
    /// A fetch failed. The previously displayed page is kept.
    #[error("failed to load roster data: {0}")]
    Query(StoreError),

    /// Rejected locally; nothing was sent to the store.
    #[error(transparent)]
    Validation(#[from] DomainError),

    /// The store rejected a write (wholly or, for batches, partially).
    #[error("{action}: {source}")]
    Mutation { action: String, source: StoreError },
}

impl RosterError {
    pub fn mutation(action: impl Into<String>, source: StoreError) -> Self {
        Self::Mutation {
            action: action.into(),
            source,
        }
    }

    /// Ids the store rejected, for partial batch failures.
    pub fn rejected_ids(&self) -> &[roster_core::EmployeeId] {
        match self {
            RosterError::Mutation {
                source: StoreError::PartialBatch { rejected, .. },
                ..
            } => rejected,
            _ => &[],
        }
    }
}
