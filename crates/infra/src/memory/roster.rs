use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::debug;

use roster_core::EmployeeId;
use roster_directory::{
    EmployeeDraft, EmployeePatch, EmployeeRecord, EmployeeSummary, RosterPage, RosterRequest, RosterStore, StoreError,
};

use super::poisoned;

/// In-memory employee table.
///
/// Batch writes apply to every id that exists and report the rest as a
/// partial failure.
#[derive(Debug, Default)]
pub struct InMemoryRosterStore {
    rows: RwLock<BTreeMap<EmployeeId, EmployeeRecord>>,
}

impl InMemoryRosterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: impl IntoIterator<Item = EmployeeRecord>) -> Self {
        let rows = records.into_iter().map(|r| (r.id, r)).collect();
        Self { rows: RwLock::new(rows) }
    }

    /// Insert directly, bypassing validation. Returns the new id.
    pub fn seed(&self, draft: EmployeeDraft) -> EmployeeId {
        let id = EmployeeId::new();
        if let Ok(mut rows) = self.rows.write() {
            rows.insert(id, draft.into_record(id));
        }
        id
    }

    pub fn len(&self) -> usize {
        self.rows.read().map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn record(&self, id: EmployeeId) -> Option<EmployeeRecord> {
        let rows = self.rows.read().ok()?;
        rows.get(&id).cloned()
    }

    /// Employees whose department matches `name`, ignoring case.
    pub fn department_members(&self, name: &str) -> u64 {
        let Ok(rows) = self.rows.read() else {
            return 0;
        };
        rows.values()
            .filter(|r| r.department.as_deref().is_some_and(|d| d.eq_ignore_ascii_case(name)))
            .count() as u64
    }

    fn apply_batch(
        &self,
        ids: &[EmployeeId],
        mut apply: impl FnMut(&mut BTreeMap<EmployeeId, EmployeeRecord>, EmployeeId) -> bool,
    ) -> Result<(), StoreError> {
        let mut rows = self.rows.write().map_err(poisoned)?;
        let rejected: Vec<EmployeeId> = ids.iter().copied().filter(|id| !apply(&mut rows, *id)).collect();
        if rejected.is_empty() {
            return Ok(());
        }
        debug!(requested = ids.len(), rejected = rejected.len(), "batch touched missing employees");
        Err(StoreError::PartialBatch {
            message: "some employees no longer exist".to_string(),
            rejected,
        })
    }
}

#[async_trait]
impl RosterStore for InMemoryRosterStore {
    async fn query(&self, request: &RosterRequest) -> Result<RosterPage, StoreError> {
        let rows = self.rows.read().map_err(poisoned)?;
        let mut matched: Vec<&EmployeeRecord> = rows.values().filter(|r| request.matches(r)).collect();
        matched.sort_by(|a, b| request.compare(a, b));

        let total_count = matched.len() as u64;
        let offset = usize::try_from(request.offset).unwrap_or(usize::MAX);
        let rows = matched
            .into_iter()
            .skip(offset)
            .take(request.limit as usize)
            .cloned()
            .collect();
        Ok(RosterPage { rows, total_count })
    }

    async fn get_by_id(&self, id: EmployeeId) -> Result<Option<EmployeeRecord>, StoreError> {
        let rows = self.rows.read().map_err(poisoned)?;
        Ok(rows.get(&id).cloned())
    }

    async fn insert(&self, draft: EmployeeDraft) -> Result<EmployeeId, StoreError> {
        let mut rows = self.rows.write().map_err(poisoned)?;
        if rows.values().any(|r| r.email.eq_ignore_ascii_case(&draft.email)) {
            return Err(StoreError::Rejected(format!("email '{}' is already in use", draft.email)));
        }
        let id = EmployeeId::new();
        rows.insert(id, draft.into_record(id));
        Ok(id)
    }

    async fn update_by_id(&self, id: EmployeeId, patch: &EmployeePatch) -> Result<(), StoreError> {
        let mut rows = self.rows.write().map_err(poisoned)?;
        let record = rows.get_mut(&id).ok_or(StoreError::NotFound)?;
        patch.apply_to(record);
        Ok(())
    }

    async fn delete_by_id(&self, id: EmployeeId) -> Result<(), StoreError> {
        let mut rows = self.rows.write().map_err(poisoned)?;
        rows.remove(&id).map(|_| ()).ok_or(StoreError::NotFound)
    }

    async fn delete_by_ids(&self, ids: &[EmployeeId]) -> Result<(), StoreError> {
        self.apply_batch(ids, |rows, id| rows.remove(&id).is_some())
    }

    async fn update_by_ids(&self, ids: &[EmployeeId], patch: &EmployeePatch) -> Result<(), StoreError> {
        self.apply_batch(ids, |rows, id| match rows.get_mut(&id) {
            Some(record) => {
                patch.apply_to(record);
                true
            }
            None => false,
        })
    }

    async fn summaries(&self) -> Result<Vec<EmployeeSummary>, StoreError> {
        let rows = self.rows.read().map_err(poisoned)?;
        Ok(rows.values().map(EmployeeSummary::from).collect())
    }
}
