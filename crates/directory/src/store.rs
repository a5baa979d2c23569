//! Remote store ports.
//!
//! The roster never owns employee or department data; it reads and writes
//! through these traits. Adapters live in `roster-infra`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use roster_core::{DepartmentId, EmployeeId};

use crate::{Department, DepartmentDraft, EmployeeDraft, EmployeePatch, EmployeeRecord, EmployeeStatus, RosterRequest};

/// Remote store failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached or timed out.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store refused the request (constraint, permission, bad input).
    #[error("rejected by store: {0}")]
    Rejected(String),

    #[error("record not found")]
    NotFound,

    /// A batch operation applied to some ids and not others.
    #[error("{message} ({} rejected)", rejected.len())]
    PartialBatch {
        message: String,
        rejected: Vec<EmployeeId>,
    },
}

/// One page of results plus the total number of filtered rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RosterPage {
    pub rows: Vec<EmployeeRecord>,
    pub total_count: u64,
}

/// Just enough of a record to compute roster statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeSummary {
    pub status: EmployeeStatus,
    pub department: Option<String>,
}

impl From<&EmployeeRecord> for EmployeeSummary {
    fn from(record: &EmployeeRecord) -> Self {
        Self {
            status: record.status,
            department: record.department.clone(),
        }
    }
}

#[async_trait]
pub trait RosterStore: Send + Sync {
    /// Filter, order and window the employee table.
    async fn query(&self, request: &RosterRequest) -> Result<RosterPage, StoreError>;

    async fn get_by_id(&self, id: EmployeeId) -> Result<Option<EmployeeRecord>, StoreError>;

    /// Insert and return the store-assigned id.
    async fn insert(&self, draft: EmployeeDraft) -> Result<EmployeeId, StoreError>;

    async fn update_by_id(&self, id: EmployeeId, patch: &EmployeePatch) -> Result<(), StoreError>;

    async fn delete_by_id(&self, id: EmployeeId) -> Result<(), StoreError>;

    async fn delete_by_ids(&self, ids: &[EmployeeId]) -> Result<(), StoreError>;

    async fn update_by_ids(&self, ids: &[EmployeeId], patch: &EmployeePatch) -> Result<(), StoreError>;

    async fn summaries(&self) -> Result<Vec<EmployeeSummary>, StoreError>;
}

#[async_trait]
pub trait DepartmentStore: Send + Sync {
    /// All departments ordered by name.
    async fn list(&self) -> Result<Vec<Department>, StoreError>;

    async fn member_count(&self, id: DepartmentId) -> Result<u64, StoreError>;

    async fn insert(&self, draft: DepartmentDraft) -> Result<DepartmentId, StoreError>;

    async fn update(&self, id: DepartmentId, draft: DepartmentDraft) -> Result<(), StoreError>;

    async fn delete(&self, id: DepartmentId) -> Result<(), StoreError>;
}
