//! Role resolution for an identity.

use std::sync::Arc;

use tracing::{debug, info, warn};

use roster_core::{Supersession, Ticket, UserId};

use crate::{IdentityProvider, RoleSet};

/// Resolves the role set governing a user.
///
/// - Output is never empty (no stored assignments → `{employee}`).
/// - Failures degrade to `{employee}`; resolution never fails open and never
///   leaves the caller waiting on an error.
/// - Callers bracket a resolution with [`Self::begin`] and [`Self::is_current`]
///   so overlapping cycles collapse to the most recently issued one.
pub struct RoleResolver {
    provider: Arc<dyn IdentityProvider>,
    generation: Supersession,
}

impl RoleResolver {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            provider,
            generation: Supersession::new(),
        }
    }

    pub fn provider(&self) -> &Arc<dyn IdentityProvider> {
        &self.provider
    }

    /// Start a new resolution cycle, superseding any in flight.
    pub fn begin(&self) -> Ticket {
        self.generation.issue()
    }

    /// Whether `ticket` is still the latest cycle.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generation.is_current(ticket)
    }

    /// Supersede every in-flight cycle (sign-out).
    pub fn cancel(&self) {
        self.generation.invalidate();
    }

    /// Fetch the role set for `user_id`, degrading failures to least privilege.
    pub async fn resolve(&self, user_id: UserId) -> RoleSet {
        match self.provider.resolve_roles(user_id).await {
            Ok(assignments) if assignments.is_empty() => {
                debug!(%user_id, "no stored role assignments; using default employee role");
                RoleSet::least_privilege()
            }
            Ok(assignments) => {
                let roles = RoleSet::from_assignments(assignments);
                info!(%user_id, highest = %roles.highest(), count = roles.assignments().len(), "roles resolved");
                roles
            }
            Err(err) => {
                warn!(%user_id, error = %err, "role resolution failed; falling back to least privilege");
                RoleSet::least_privilege()
            }
        }
    }
}
