//! `roster-auth`: session, role resolution and access decisions.
//!
//! This crate is decoupled from transport and storage: the identity provider
//! and its role table are reached through the [`IdentityProvider`] and
//! [`RoleDirectory`] ports.

pub mod admin;
pub mod assignment;
pub mod authorize;
pub mod identity;
pub mod provider;
pub mod resolver;
pub mod roles;
pub mod session;

pub use admin::{DirectoryEntry, RoleAdminError, RoleAdministrator, RoleDirectory, UserRole};
pub use assignment::{RoleAssignment, RoleSet};
pub use authorize::{Decision, DecisionExplanation, Route, decide, decide_exact, explain_decision, visible_routes};
pub use identity::{AuthEvent, AuthEventKind, Identity};
pub use provider::{IdentityProvider, RoleResolutionError};
pub use resolver::RoleResolver;
pub use roles::Role;
pub use session::{AuthorizationState, SessionSnapshot, SessionStore};
