//! In-crate fakes for the store ports.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::oneshot;

use roster_core::{DepartmentId, EmployeeId};

use crate::{
    Department, DepartmentDraft, DepartmentStore, EmployeeDraft, EmployeePatch, EmployeeRecord, EmployeeSummary, RosterPage,
    RosterRequest, RosterStore, StoreError,
};

#[derive(Default)]
pub(crate) struct FakeRoster {
    records: Mutex<Vec<EmployeeRecord>>,
    gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    write_gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
    rejected: Mutex<Vec<EmployeeId>>,
    fail_queries: AtomicBool,
    fail_writes: AtomicBool,
    queries: AtomicUsize,
}

impl FakeRoster {
    /// `count` records named "Employee 01", "Employee 02", ...
    pub(crate) fn seeded(count: usize) -> Self {
        let store = Self::default();
        {
            let mut records = store.records.lock().unwrap();
            for n in 1..=count {
                let draft = EmployeeDraft::new(format!("Employee {n:02}"), format!("e{n}@example.com"), "Engineer");
                records.push(draft.into_record(EmployeeId::new()));
            }
        }
        store
    }

    /// Hold queries whose search text equals `search` until the sender fires.
    pub(crate) fn gate(&self, search: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(search.to_string(), rx);
        tx
    }

    /// Hold the next write that reaches the store until the sender fires.
    /// Each call queues one more held write.
    pub(crate) fn hold_write(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.write_gates.lock().unwrap().push_back(rx);
        tx
    }

    pub(crate) fn fail_queries(&self, fail: bool) {
        self.fail_queries.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Batch writes touching `id` will leave it alone and report it.
    pub(crate) fn reject(&self, id: EmployeeId) {
        self.rejected.lock().unwrap().push(id);
    }

    pub(crate) fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub(crate) fn ids(&self) -> Vec<EmployeeId> {
        self.records.lock().unwrap().iter().map(|r| r.id).collect()
    }

    pub(crate) fn record(&self, id: EmployeeId) -> Option<EmployeeRecord> {
        self.records.lock().unwrap().iter().find(|r| r.id == id).cloned()
    }

    pub(crate) fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub(crate) fn remove(&self, id: EmployeeId) {
        self.records.lock().unwrap().retain(|r| r.id != id);
    }

    async fn check_writes(&self) -> Result<(), StoreError> {
        let gate = self.write_gates.lock().unwrap().pop_front();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("write timed out".to_string()));
        }
        Ok(())
    }

    fn split_rejected(&self, ids: &[EmployeeId]) -> (Vec<EmployeeId>, Vec<EmployeeId>) {
        let rejected = self.rejected.lock().unwrap();
        ids.iter().copied().partition(|id| !rejected.contains(id))
    }

    fn batch_result(rejected: Vec<EmployeeId>) -> Result<(), StoreError> {
        if rejected.is_empty() {
            Ok(())
        } else {
            Err(StoreError::PartialBatch {
                message: "row-level policy rejected some rows".to_string(),
                rejected,
            })
        }
    }
}

#[async_trait]
impl RosterStore for FakeRoster {
    async fn query(&self, request: &RosterRequest) -> Result<RosterPage, StoreError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let gate = request
            .search
            .as_ref()
            .and_then(|search| self.gates.lock().unwrap().remove(search));
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        if self.fail_queries.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("query timed out".to_string()));
        }

        let mut rows: Vec<EmployeeRecord> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| request.matches(r))
            .cloned()
            .collect();
        rows.sort_by(|a, b| request.compare(a, b));
        let total_count = rows.len() as u64;
        let rows = rows
            .into_iter()
            .skip(request.offset as usize)
            .take(request.limit as usize)
            .collect();
        Ok(RosterPage { rows, total_count })
    }

    async fn get_by_id(&self, id: EmployeeId) -> Result<Option<EmployeeRecord>, StoreError> {
        Ok(self.record(id))
    }

    async fn insert(&self, draft: EmployeeDraft) -> Result<EmployeeId, StoreError> {
        self.check_writes().await?;
        let id = EmployeeId::new();
        self.records.lock().unwrap().push(draft.into_record(id));
        Ok(id)
    }

    async fn update_by_id(&self, id: EmployeeId, patch: &EmployeePatch) -> Result<(), StoreError> {
        self.check_writes().await?;
        let mut records = self.records.lock().unwrap();
        let record = records.iter_mut().find(|r| r.id == id).ok_or(StoreError::NotFound)?;
        patch.apply_to(record);
        Ok(())
    }

    async fn delete_by_id(&self, id: EmployeeId) -> Result<(), StoreError> {
        self.check_writes().await?;
        self.remove(id);
        Ok(())
    }

    async fn delete_by_ids(&self, ids: &[EmployeeId]) -> Result<(), StoreError> {
        self.check_writes().await?;
        let (accepted, rejected) = self.split_rejected(ids);
        self.records.lock().unwrap().retain(|r| !accepted.contains(&r.id));
        Self::batch_result(rejected)
    }

    async fn update_by_ids(&self, ids: &[EmployeeId], patch: &EmployeePatch) -> Result<(), StoreError> {
        self.check_writes().await?;
        let (accepted, rejected) = self.split_rejected(ids);
        for record in self.records.lock().unwrap().iter_mut() {
            if accepted.contains(&record.id) {
                patch.apply_to(record);
            }
        }
        Self::batch_result(rejected)
    }

    async fn summaries(&self) -> Result<Vec<EmployeeSummary>, StoreError> {
        Ok(self.records.lock().unwrap().iter().map(EmployeeSummary::from).collect())
    }
}

#[derive(Default)]
pub(crate) struct FakeDepartments {
    departments: Mutex<Vec<Department>>,
    members: Mutex<HashMap<DepartmentId, u64>>,
    fail_counts: AtomicBool,
}

impl FakeDepartments {
    pub(crate) fn with(names: &[(&str, u64)]) -> Self {
        let store = Self::default();
        for (name, members) in names {
            let id = DepartmentId::new();
            store
                .departments
                .lock()
                .unwrap()
                .push(DepartmentDraft::new(*name).into_department(id));
            store.members.lock().unwrap().insert(id, *members);
        }
        store
    }

    pub(crate) fn fail_counts(&self, fail: bool) {
        self.fail_counts.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn names(&self) -> Vec<String> {
        self.departments.lock().unwrap().iter().map(|d| d.name.clone()).collect()
    }
}

#[async_trait]
impl DepartmentStore for FakeDepartments {
    async fn list(&self) -> Result<Vec<Department>, StoreError> {
        let mut departments = self.departments.lock().unwrap().clone();
        departments.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(departments)
    }

    async fn member_count(&self, id: DepartmentId) -> Result<u64, StoreError> {
        if self.fail_counts.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("count timed out".to_string()));
        }
        Ok(self.members.lock().unwrap().get(&id).copied().unwrap_or(0))
    }

    async fn insert(&self, draft: DepartmentDraft) -> Result<DepartmentId, StoreError> {
        let id = DepartmentId::new();
        self.departments.lock().unwrap().push(draft.into_department(id));
        Ok(id)
    }

    async fn update(&self, id: DepartmentId, draft: DepartmentDraft) -> Result<(), StoreError> {
        let mut departments = self.departments.lock().unwrap();
        let department = departments.iter_mut().find(|d| d.id == id).ok_or(StoreError::NotFound)?;
        *department = draft.into_department(id);
        Ok(())
    }

    async fn delete(&self, id: DepartmentId) -> Result<(), StoreError> {
        let mut departments = self.departments.lock().unwrap();
        let before = departments.len();
        departments.retain(|d| d.id != id);
        if departments.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
