//! Identity provider port.
//!
//! The provider owns credentials, tokens and the role table. The roster only
//! asks it who is signed in and which roles that user holds.

use async_trait::async_trait;
use thiserror::Error;

use roster_core::UserId;

use crate::{Identity, RoleAssignment};

/// Failure while talking to the identity provider or its role table.
///
/// Resolution failures never reach the caller as fatal errors; the resolver
/// degrades them to least privilege.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoleResolutionError {
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),

    #[error("role lookup failed: {0}")]
    Lookup(String),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The identity of the currently established session, if any.
    async fn current_identity(&self) -> Result<Option<Identity>, RoleResolutionError>;

    /// Every role assignment stored for `user_id` (department names joined in).
    async fn resolve_roles(&self, user_id: UserId) -> Result<Vec<RoleAssignment>, RoleResolutionError>;
}
