//! Writes against the roster: single-record create/update/delete and bulk
//! operations over the selection.

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{info, warn};

use roster_core::{DomainError, EmployeeId};

use crate::{EmployeeDraft, EmployeePatch, EmployeeStatus, RosterEngine, RosterError, RosterStore, StoreError};

/// User-facing confirmation of a completed write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub message: String,
}

impl Notice {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationPhase {
    #[default]
    Idle,
    Submitting,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "message", rename_all = "snake_case")]
pub enum MutationOutcome {
    Succeeded(String),
    Failed(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MutationStatus {
    pub phase: MutationPhase,
    /// Writes dispatched and not yet finished.
    pub in_flight: usize,
    pub last_outcome: Option<MutationOutcome>,
}

/// Dispatches writes to the store and refreshes the roster afterwards.
///
/// Bulk operations clear the selection once they finish, whether every id
/// was accepted or not, and always refresh since a partial batch still
/// changed rows.
pub struct MutationCoordinator {
    store: Arc<dyn RosterStore>,
    engine: Arc<RosterEngine>,
    status: watch::Sender<MutationStatus>,
}

impl MutationCoordinator {
    pub fn new(store: Arc<dyn RosterStore>, engine: Arc<RosterEngine>) -> Self {
        let (status, _) = watch::channel(MutationStatus::default());
        Self { store, engine, status }
    }

    pub fn status(&self) -> MutationStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<MutationStatus> {
        self.status.subscribe()
    }

    pub async fn create(&self, draft: EmployeeDraft) -> Result<Notice, RosterError> {
        draft.validate().map_err(|err| self.invalid(err))?;
        let draft = draft.normalized();
        self.dispatch("Failed to add employee", "Employee added successfully".to_string(), async {
            let id = self.store.insert(draft).await?;
            info!(employee_id = %id, "employee created");
            Ok::<_, StoreError>(())
        })
        .await
    }

    pub async fn update(&self, id: EmployeeId, patch: EmployeePatch) -> Result<Notice, RosterError> {
        patch.validate().map_err(|err| self.invalid(err))?;
        self.dispatch("Failed to update employee", "Employee updated successfully".to_string(), async {
            self.store.update_by_id(id, &patch).await?;
            info!(employee_id = %id, "employee updated");
            Ok::<_, StoreError>(())
        })
        .await
    }

    pub async fn delete(&self, id: EmployeeId) -> Result<Notice, RosterError> {
        self.dispatch("Failed to delete employee", "Employee deleted successfully".to_string(), async {
            self.store.delete_by_id(id).await?;
            info!(employee_id = %id, "employee deleted");
            Ok::<_, StoreError>(())
        })
        .await
    }

    pub async fn bulk_delete(&self, ids: &[EmployeeId]) -> Result<Notice, RosterError> {
        self.require_ids(ids)?;
        let success = format!("{} employee(s) deleted successfully", ids.len());
        self.dispatch_batch("Failed to delete employees", success, self.store.delete_by_ids(ids))
            .await
    }

    pub async fn bulk_set_status(&self, ids: &[EmployeeId], status: EmployeeStatus) -> Result<Notice, RosterError> {
        self.require_ids(ids)?;
        let success = format!("{} employee(s) status updated to {status}", ids.len());
        let patch = EmployeePatch::status(status);
        self.dispatch_batch("Failed to update employee status", success, self.store.update_by_ids(ids, &patch))
            .await
    }

    /// [`Self::bulk_delete`] over the engine's current selection.
    pub async fn delete_selected(&self) -> Result<Notice, RosterError> {
        let ids = self.engine.selection().to_vec();
        self.bulk_delete(&ids).await
    }

    /// [`Self::bulk_set_status`] over the engine's current selection.
    pub async fn set_status_selected(&self, status: EmployeeStatus) -> Result<Notice, RosterError> {
        let ids = self.engine.selection().to_vec();
        self.bulk_set_status(&ids, status).await
    }

    async fn dispatch(
        &self,
        failure: &str,
        success: String,
        write: impl Future<Output = Result<(), StoreError>>,
    ) -> Result<Notice, RosterError> {
        self.begin();
        match write.await {
            Ok(()) => {
                self.refresh_roster().await;
                Ok(self.succeed(success))
            }
            Err(source) => {
                warn!(error = %source, "{failure}");
                Err(self.fail(RosterError::mutation(failure, source)))
            }
        }
    }

    async fn dispatch_batch(
        &self,
        failure: &str,
        success: String,
        write: impl Future<Output = Result<(), StoreError>>,
    ) -> Result<Notice, RosterError> {
        self.begin();
        let result = write.await;
        self.engine.clear_selection();
        self.refresh_roster().await;

        match result {
            Ok(()) => {
                info!("{success}");
                Ok(self.succeed(success))
            }
            Err(source) => {
                if let StoreError::PartialBatch { rejected, .. } = &source {
                    warn!(rejected = ?rejected, count = rejected.len(), "batch partially rejected");
                } else {
                    warn!(error = %source, "{failure}");
                }
                Err(self.fail(RosterError::mutation(failure, source)))
            }
        }
    }

    fn require_ids(&self, ids: &[EmployeeId]) -> Result<(), RosterError> {
        if ids.is_empty() {
            return Err(self.invalid(DomainError::validation("no employees selected")));
        }
        Ok(())
    }

    async fn refresh_roster(&self) {
        if let Err(err) = self.engine.refresh().await {
            warn!(error = %err, "roster refresh after write failed");
        }
    }

    fn begin(&self) {
        self.status.send_modify(|s| {
            s.in_flight += 1;
            s.phase = MutationPhase::Submitting;
        });
    }

    fn end(&self, outcome: MutationOutcome) {
        self.status.send_modify(|s| {
            s.in_flight = s.in_flight.saturating_sub(1);
            if s.in_flight == 0 {
                s.phase = MutationPhase::Idle;
            }
            s.last_outcome = Some(outcome);
        });
    }

    fn succeed(&self, message: String) -> Notice {
        self.end(MutationOutcome::Succeeded(message.clone()));
        Notice::new(message)
    }

    fn fail(&self, err: RosterError) -> RosterError {
        self.end(MutationOutcome::Failed(err.to_string()));
        err
    }

    fn invalid(&self, err: DomainError) -> RosterError {
        self.status.send_modify(|s| s.last_outcome = Some(MutationOutcome::Failed(err.to_string())));
        RosterError::Validation(err)
    }
}
