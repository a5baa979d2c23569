//! Session store: current identity + authorization state, with change
//! notification.
//!
//! The store is an explicit object handed to whatever needs identity or roles;
//! there is no process-global session.

use std::sync::{Arc, Mutex};

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use roster_core::Ticket;

use crate::{AuthEvent, AuthEventKind, Identity, IdentityProvider, RoleResolver, RoleSet};

/// Authorization state as seen by gates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "roles", rename_all = "snake_case")]
pub enum AuthorizationState {
    /// No authenticated identity.
    Anonymous,
    /// Identity known (or being restored) but roles not yet resolved.
    Unresolved,
    /// Roles resolved for the current identity.
    Resolved(RoleSet),
}

impl AuthorizationState {
    pub fn roles(&self) -> Option<&RoleSet> {
        match self {
            AuthorizationState::Resolved(roles) => Some(roles),
            _ => None,
        }
    }
}

/// Everything the session store publishes on each transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub identity: Option<Identity>,
    pub state: AuthorizationState,
}

type ChangeHandler = Arc<dyn Fn(&SessionSnapshot) + Send + Sync>;

/// Holds the authenticated identity and its resolved roles.
///
/// Every identity change triggers exactly one role-resolution cycle. When
/// identity changes overlap, the last identity wins: a slow resolution for a
/// previous user is discarded instead of overwriting a newer one.
pub struct SessionStore {
    resolver: RoleResolver,
    snapshot: watch::Sender<SessionSnapshot>,
    handlers: Mutex<Vec<ChangeHandler>>,
}

impl SessionStore {
    /// Create a store in the `Unresolved` state; call [`Self::restore`] to
    /// pick up an existing session.
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        let (snapshot, _) = watch::channel(SessionSnapshot {
            identity: None,
            state: AuthorizationState::Unresolved,
        });

        Self {
            resolver: RoleResolver::new(provider),
            snapshot,
            handlers: Mutex::new(Vec::new()),
        }
    }

    pub fn current(&self) -> AuthorizationState {
        self.snapshot.borrow().state.clone()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.snapshot.borrow().identity.clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Reactive view of the session.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot.subscribe()
    }

    /// Register a callback invoked after every transition.
    pub fn on_change<F>(&self, handler: F)
    where
        F: Fn(&SessionSnapshot) + Send + Sync + 'static,
    {
        if let Ok(mut handlers) = self.handlers.lock() {
            handlers.push(Arc::new(handler));
        }
    }

    /// Pick up an already-established session from the provider.
    ///
    /// An identity event or sign-out arriving while the provider is being
    /// asked supersedes the restore, which then leaves the session untouched.
    pub async fn restore(&self) -> AuthorizationState {
        let guard = self.resolver.begin();
        match self.resolver.provider().current_identity().await {
            Ok(Some(identity)) => self.establish(identity, false, Some(guard)).await,
            Ok(None) => self.sign_out(Some(guard)),
            Err(err) => {
                warn!(error = %err, "could not restore session; treating as signed out");
                self.sign_out(Some(guard));
            }
        }
        self.current()
    }

    /// Apply an identity-provider event.
    pub async fn handle_event(&self, event: AuthEvent) -> AuthorizationState {
        match (event.kind, event.identity) {
            (AuthEventKind::SignedOut, _) | (_, None) => self.sign_out(None),
            (AuthEventKind::TokenRefreshed, Some(identity)) => {
                let same_identity = self.identity().as_ref() == Some(&identity);
                self.establish(identity, same_identity, None).await;
            }
            (AuthEventKind::SignedIn, Some(identity)) => self.establish(identity, false, None).await,
        }
        self.current()
    }

    /// Re-resolve roles for the current identity without passing through
    /// `Unresolved` (e.g. after an administrator changed them).
    pub async fn refresh_roles(&self) -> AuthorizationState {
        if let Some(identity) = self.identity() {
            self.establish(identity, true, None).await;
        }
        self.current()
    }

    fn superseded(&self, guard: Option<Ticket>) -> bool {
        guard.is_some_and(|ticket| !self.resolver.is_current(ticket))
    }

    /// `guard`, when given, must still be current for the sign-out to apply.
    fn sign_out(&self, guard: Option<Ticket>) {
        let mut skipped = false;
        let changed = self.snapshot.send_if_modified(|snap| {
            if self.superseded(guard) {
                skipped = true;
                return false;
            }
            self.resolver.cancel();
            let changed = snap.identity.is_some() || snap.state != AuthorizationState::Anonymous;
            snap.identity = None;
            snap.state = AuthorizationState::Anonymous;
            changed
        });

        if skipped {
            debug!("restore superseded by a newer identity change");
        } else if changed {
            info!("signed out; roles cleared");
            self.notify();
        }
    }

    /// Start a resolution cycle for `identity`. `guard`, when given, must
    /// still be current for the identity to be applied at all.
    async fn establish(&self, identity: Identity, keep_roles: bool, guard: Option<Ticket>) {
        let mut ticket: Option<Ticket> = None;
        let changed = self.snapshot.send_if_modified(|snap| {
            if self.superseded(guard) {
                return false;
            }
            ticket = Some(self.resolver.begin());

            let next_state = match (&snap.state, keep_roles) {
                (AuthorizationState::Resolved(roles), true) => AuthorizationState::Resolved(roles.clone()),
                _ => AuthorizationState::Unresolved,
            };
            let changed = snap.identity.as_ref() != Some(&identity) || snap.state != next_state;
            snap.identity = Some(identity.clone());
            snap.state = next_state;
            changed
        });
        if changed {
            self.notify();
        }

        let Some(ticket) = ticket else {
            debug!(user_id = %identity.id, "restore superseded by a newer identity change");
            return;
        };

        debug!(user_id = %identity.id, generation = ticket.generation(), "resolving roles");
        let roles = self.resolver.resolve(identity.id).await;

        let mut superseded = false;
        let applied = self.snapshot.send_if_modified(|snap| {
            if !self.resolver.is_current(ticket) {
                superseded = true;
                return false;
            }
            let next = AuthorizationState::Resolved(roles);
            if snap.state == next {
                return false;
            }
            snap.state = next;
            true
        });

        if superseded {
            debug!(user_id = %identity.id, "discarding role resolution for superseded identity change");
        } else if applied {
            info!(user_id = %identity.id, email = %identity.email, "session roles applied");
            self.notify();
        }
    }

    fn notify(&self) {
        let snapshot = self.snapshot();
        let handlers = match self.handlers.lock() {
            Ok(handlers) => handlers.clone(),
            Err(_) => return,
        };
        for handler in &handlers {
            handler(&snapshot);
        }
    }
}
