//! `roster-core`: shared building blocks for the roster workspace.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, the domain error model, and the supersession counter used by
//! every "latest request wins" operation.

pub mod error;
pub mod id;
pub mod supersede;

pub use error::{DomainError, DomainResult};
pub use id::{DepartmentId, EmployeeId, UserId};
pub use supersede::{Supersession, Ticket};
