//! Supersession: "only the most recently issued request may apply its result".
//!
//! Role resolution and roster fetches are both debounced by supersession. A
//! caller issues a [`Ticket`] before starting the asynchronous call and checks
//! it again after the call returns; if another ticket was issued (or the
//! counter was invalidated) in the meantime, the result is stale and must be
//! discarded.
//!
//! There is no explicit cancel API. Issuing a newer ticket is the only way an
//! in-flight operation is cancelled.

use core::sync::atomic::{AtomicU64, Ordering};

/// Proof that an operation was issued at a given generation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// Monotonic generation counter for one logical operation.
#[derive(Debug, Default)]
pub struct Supersession {
    latest: AtomicU64,
}

impl Supersession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket for a new operation, superseding every earlier ticket.
    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Supersede every outstanding ticket without starting a new operation.
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::AcqRel);
    }

    /// Whether `ticket` is still the latest issued.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.0
    }
}
