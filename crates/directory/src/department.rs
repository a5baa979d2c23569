//! Departments and the catalog used by the departments screen.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use roster_core::{DepartmentId, DomainError, DomainResult, EmployeeId};

use crate::{DepartmentStore, Notice, RosterError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
    pub description: Option<String>,
    pub manager_id: Option<EmployeeId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DepartmentDraft {
    pub name: String,
    pub description: Option<String>,
    pub manager_id: Option<EmployeeId>,
}

impl DepartmentDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("department name is required"));
        }
        Ok(())
    }

    pub fn into_department(self, id: DepartmentId) -> Department {
        Department {
            id,
            name: self.name.trim().to_string(),
            description: self
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            manager_id: self.manager_id,
        }
    }
}

/// A department with the number of employees assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentListing {
    #[serde(flatten)]
    pub department: Department,
    pub member_count: u64,
}

pub struct DepartmentCatalog {
    store: Arc<dyn DepartmentStore>,
}

impl DepartmentCatalog {
    pub fn new(store: Arc<dyn DepartmentStore>) -> Self {
        Self { store }
    }

    /// Departments ordered by name. A member count that cannot be loaded is
    /// reported as zero.
    pub async fn list(&self) -> Result<Vec<DepartmentListing>, RosterError> {
        let departments = self.store.list().await.map_err(RosterError::Query)?;

        let mut listings = Vec::with_capacity(departments.len());
        for department in departments {
            let member_count = match self.store.member_count(department.id).await {
                Ok(count) => count,
                Err(err) => {
                    warn!(department_id = %department.id, error = %err, "member count unavailable");
                    0
                }
            };
            listings.push(DepartmentListing {
                department,
                member_count,
            });
        }
        Ok(listings)
    }

    pub async fn create(&self, draft: DepartmentDraft) -> Result<Notice, RosterError> {
        draft.validate()?;
        let id = self
            .store
            .insert(draft)
            .await
            .map_err(|source| RosterError::mutation("Failed to create department", source))?;
        info!(department_id = %id, "department created");
        Ok(Notice::new("Department created successfully"))
    }

    pub async fn update(&self, id: DepartmentId, draft: DepartmentDraft) -> Result<Notice, RosterError> {
        draft.validate()?;
        self.store
            .update(id, draft)
            .await
            .map_err(|source| RosterError::mutation("Failed to update department", source))?;
        info!(department_id = %id, "department updated");
        Ok(Notice::new("Department updated successfully"))
    }

    pub async fn delete(&self, id: DepartmentId) -> Result<Notice, RosterError> {
        self.store
            .delete(id)
            .await
            .map_err(|source| RosterError::mutation("Failed to delete department", source))?;
        info!(department_id = %id, "department deleted");
        Ok(Notice::new("Department deleted successfully"))
    }
}
