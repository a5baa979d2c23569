use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;

use roster_auth::{
    AuthEvent, DirectoryEntry, Identity, IdentityProvider, RoleAssignment, RoleDirectory, RoleResolutionError,
};
use roster_core::UserId;

/// In-memory identity provider with its role table.
///
/// `sign_in`/`sign_out` update the provider's session and return the event a
/// real provider would emit, for feeding into `SessionStore::handle_event`.
/// Anyone who has signed in, or was registered, is a known user.
#[derive(Debug, Default)]
pub struct InMemoryIdentityProvider {
    current: RwLock<Option<Identity>>,
    users: RwLock<BTreeMap<UserId, Identity>>,
    roles: RwLock<HashMap<UserId, Vec<RoleAssignment>>>,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, identity: Identity) {
        if let Ok(mut users) = self.users.write() {
            users.insert(identity.id, identity);
        }
    }

    pub fn sign_in(&self, identity: Identity) -> AuthEvent {
        self.register(identity.clone());
        if let Ok(mut current) = self.current.write() {
            *current = Some(identity.clone());
        }
        AuthEvent::signed_in(identity)
    }

    pub fn sign_out(&self) -> AuthEvent {
        if let Ok(mut current) = self.current.write() {
            *current = None;
        }
        AuthEvent::signed_out()
    }

    pub fn assign(&self, user_id: UserId, assignments: Vec<RoleAssignment>) {
        if let Ok(mut roles) = self.roles.write() {
            roles.insert(user_id, assignments);
        }
    }
}

fn unavailable<T>(_: T) -> RoleResolutionError {
    RoleResolutionError::Unavailable("identity store lock poisoned".to_string())
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn current_identity(&self) -> Result<Option<Identity>, RoleResolutionError> {
        let current = self.current.read().map_err(unavailable)?;
        Ok(current.clone())
    }

    async fn resolve_roles(&self, user_id: UserId) -> Result<Vec<RoleAssignment>, RoleResolutionError> {
        let roles = self.roles.read().map_err(unavailable)?;
        Ok(roles.get(&user_id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl RoleDirectory for InMemoryIdentityProvider {
    async fn replace_assignments(
        &self,
        user_id: UserId,
        assignments: Vec<RoleAssignment>,
    ) -> Result<(), RoleResolutionError> {
        let mut roles = self.roles.write().map_err(unavailable)?;
        roles.insert(user_id, assignments);
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<DirectoryEntry>, RoleResolutionError> {
        let users = self.users.read().map_err(unavailable)?;
        let roles = self.roles.read().map_err(unavailable)?;
        Ok(users
            .values()
            .map(|identity| DirectoryEntry {
                identity: identity.clone(),
                assignments: roles.get(&identity.id).cloned().unwrap_or_default(),
            })
            .collect())
    }
}
