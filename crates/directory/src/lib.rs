//! `roster-directory`: the employee roster: records, paginated queries,
//! selection, writes and the department catalog.
//!
//! Persistence is abstracted behind [`RosterStore`] and [`DepartmentStore`];
//! this crate never talks to a database directly.

pub mod department;
pub mod employee;
pub mod engine;
pub mod error;
pub mod mutation;
pub mod query;
pub mod selection;
pub mod stats;
pub mod store;

#[cfg(test)]
mod testing;

pub use department::{Department, DepartmentCatalog, DepartmentDraft, DepartmentListing};
pub use employee::{EmployeeDraft, EmployeePatch, EmployeeRecord, EmployeeStatus};
pub use engine::{FetchOutcome, RosterEngine, RosterView};
pub use error::RosterError;
pub use mutation::{MutationCoordinator, MutationOutcome, MutationPhase, MutationStatus, Notice};
pub use query::{DEFAULT_PAGE_SIZE, OrderBy, OrderKey, RosterQuery, RosterRequest, SortColumn, SortDirection};
pub use selection::SelectionSet;
pub use stats::{RosterStats, UNASSIGNED_DEPARTMENT};
pub use store::{DepartmentStore, EmployeeSummary, RosterPage, RosterStore, StoreError};
