//! Infrastructure layer: configuration and in-memory adapters for the roster
//! ports.

pub mod config;
pub mod memory;

mod integration_tests;

pub use config::{RosterConfig, SortConfig};
pub use memory::{InMemoryDepartmentStore, InMemoryIdentityProvider, InMemoryRosterStore};
