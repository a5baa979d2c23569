use serde::{Deserialize, Serialize};

use roster_core::UserId;

/// Authenticated identity as reported by the identity provider.
///
/// Read-only to the roster: its lifecycle is bound to the provider's session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    pub email: String,
}

impl Identity {
    pub fn new(id: UserId, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthEventKind {
    SignedIn,
    SignedOut,
    TokenRefreshed,
}

/// A session transition emitted by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthEvent {
    pub kind: AuthEventKind,
    pub identity: Option<Identity>,
}

impl AuthEvent {
    pub fn signed_in(identity: Identity) -> Self {
        Self {
            kind: AuthEventKind::SignedIn,
            identity: Some(identity),
        }
    }

    pub fn signed_out() -> Self {
        Self {
            kind: AuthEventKind::SignedOut,
            identity: None,
        }
    }

    pub fn token_refreshed(identity: Identity) -> Self {
        Self {
            kind: AuthEventKind::TokenRefreshed,
            identity: Some(identity),
        }
    }
}
