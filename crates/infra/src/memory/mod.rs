//! In-memory adapters for the roster ports, for tests and local development.

pub mod departments;
pub mod identity;
pub mod roster;

pub use departments::InMemoryDepartmentStore;
pub use identity::InMemoryIdentityProvider;
pub use roster::InMemoryRosterStore;

use roster_directory::StoreError;

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Unavailable("store lock poisoned".to_string())
}
