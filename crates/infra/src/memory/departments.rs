use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use roster_core::DepartmentId;
use roster_directory::{Department, DepartmentDraft, DepartmentStore, StoreError};

use super::{InMemoryRosterStore, poisoned};

/// In-memory department table. Member counts come from the linked roster
/// store, matching on department name.
#[derive(Debug, Default)]
pub struct InMemoryDepartmentStore {
    departments: RwLock<BTreeMap<DepartmentId, Department>>,
    roster: Option<Arc<InMemoryRosterStore>>,
}

impl InMemoryDepartmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_roster(roster: Arc<InMemoryRosterStore>) -> Self {
        Self {
            departments: RwLock::default(),
            roster: Some(roster),
        }
    }

    fn ensure_unique(
        departments: &BTreeMap<DepartmentId, Department>,
        name: &str,
        except: Option<DepartmentId>,
    ) -> Result<(), StoreError> {
        let taken = departments
            .values()
            .any(|d| Some(d.id) != except && d.name.eq_ignore_ascii_case(name.trim()));
        if taken {
            return Err(StoreError::Rejected(format!("department '{}' already exists", name.trim())));
        }
        Ok(())
    }
}

#[async_trait]
impl DepartmentStore for InMemoryDepartmentStore {
    async fn list(&self) -> Result<Vec<Department>, StoreError> {
        let departments = self.departments.read().map_err(poisoned)?;
        let mut list: Vec<Department> = departments.values().cloned().collect();
        list.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(list)
    }

    async fn member_count(&self, id: DepartmentId) -> Result<u64, StoreError> {
        let name = {
            let departments = self.departments.read().map_err(poisoned)?;
            departments.get(&id).map(|d| d.name.clone()).ok_or(StoreError::NotFound)?
        };
        Ok(self.roster.as_ref().map_or(0, |roster| roster.department_members(&name)))
    }

    async fn insert(&self, draft: DepartmentDraft) -> Result<DepartmentId, StoreError> {
        let mut departments = self.departments.write().map_err(poisoned)?;
        Self::ensure_unique(&departments, &draft.name, None)?;
        let id = DepartmentId::new();
        departments.insert(id, draft.into_department(id));
        Ok(id)
    }

    async fn update(&self, id: DepartmentId, draft: DepartmentDraft) -> Result<(), StoreError> {
        let mut departments = self.departments.write().map_err(poisoned)?;
        if !departments.contains_key(&id) {
            return Err(StoreError::NotFound);
        }
        Self::ensure_unique(&departments, &draft.name, Some(id))?;
        departments.insert(id, draft.into_department(id));
        Ok(())
    }

    async fn delete(&self, id: DepartmentId) -> Result<(), StoreError> {
        let mut departments = self.departments.write().map_err(poisoned)?;
        departments.remove(&id).map(|_| ()).ok_or(StoreError::NotFound)
    }
}
