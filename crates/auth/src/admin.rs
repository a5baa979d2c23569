//! User role administration.
//!
//! Changing roles is an administrator action. A new role replaces the user's
//! assignments wholesale, mirroring how resolution replaces the role set.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use roster_core::UserId;

use crate::{Decision, Identity, Role, RoleAssignment, RoleResolutionError, RoleSet, Route, SessionStore};

/// Write side of the identity provider's role table.
#[async_trait]
pub trait RoleDirectory: Send + Sync {
    async fn replace_assignments(
        &self,
        user_id: UserId,
        assignments: Vec<RoleAssignment>,
    ) -> Result<(), RoleResolutionError>;

    /// Every known user with their stored assignments, possibly none.
    async fn list_users(&self) -> Result<Vec<DirectoryEntry>, RoleResolutionError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub identity: Identity,
    pub assignments: Vec<RoleAssignment>,
}

/// A user as shown on the user-management screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRole {
    pub user_id: UserId,
    pub email: String,
    pub role: Role,
}

impl From<DirectoryEntry> for UserRole {
    fn from(entry: DirectoryEntry) -> Self {
        Self {
            user_id: entry.identity.id,
            email: entry.identity.email,
            role: RoleSet::from_assignments(entry.assignments).highest(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoleAdminError {
    #[error("only administrators can manage user roles")]
    Forbidden,

    #[error("roles are still loading; try again")]
    Pending,

    #[error("failed to update user role: {0}")]
    Store(#[from] RoleResolutionError),
}

pub struct RoleAdministrator {
    directory: Arc<dyn RoleDirectory>,
    session: Arc<SessionStore>,
}

impl RoleAdministrator {
    pub fn new(directory: Arc<dyn RoleDirectory>, session: Arc<SessionStore>) -> Self {
        Self { directory, session }
    }

    /// Every user with their effective role, sorted by email. Users with no
    /// stored assignment show as employees.
    pub async fn list_users(&self) -> Result<Vec<UserRole>, RoleAdminError> {
        self.authorize()?;

        let mut users: Vec<UserRole> = self
            .directory
            .list_users()
            .await?
            .into_iter()
            .map(UserRole::from)
            .collect();
        users.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(users)
    }

    /// Replace `target`'s assignments with `assignment`.
    ///
    /// When the target is the signed-in user, the session re-resolves so the
    /// new role takes effect immediately.
    pub async fn set_role(&self, target: UserId, assignment: RoleAssignment) -> Result<(), RoleAdminError> {
        self.authorize()?;

        let role = assignment.role;
        self.directory.replace_assignments(target, vec![assignment]).await?;
        info!(user_id = %target, %role, "user role updated");

        if self.session.identity().map(|i| i.id) == Some(target) {
            self.session.refresh_roles().await;
        }

        Ok(())
    }

    fn authorize(&self) -> Result<(), RoleAdminError> {
        match Route::UserManagement.decide(&self.session.current()) {
            Decision::Allow => Ok(()),
            Decision::Pending => Err(RoleAdminError::Pending),
            Decision::Deny => Err(RoleAdminError::Forbidden),
        }
    }
}
