//! Selected employee ids.

use std::collections::BTreeSet;

use serde::Serialize;

use roster_core::EmployeeId;

/// Ids the user has selected for a bulk operation.
///
/// Always a subset of the currently displayed page; [`Self::retain_page`] is
/// applied whenever a new page lands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SelectionSet {
    ids: BTreeSet<EmployeeId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &EmployeeId) -> bool {
        self.ids.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EmployeeId> {
        self.ids.iter()
    }

    pub fn to_vec(&self) -> Vec<EmployeeId> {
        self.ids.iter().copied().collect()
    }

    /// Select or deselect `id`. Ids not on `page` are ignored.
    /// Returns whether the set changed.
    pub fn set(&mut self, id: EmployeeId, selected: bool, page: &[EmployeeId]) -> bool {
        if selected {
            page.contains(&id) && self.ids.insert(id)
        } else {
            self.ids.remove(&id)
        }
    }

    /// Select every id on `page`, or clear the set.
    pub fn set_all(&mut self, selected: bool, page: &[EmployeeId]) {
        self.ids.clear();
        if selected {
            self.ids.extend(page.iter().copied());
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drop ids that are not on `page`. Returns how many were dropped.
    pub fn retain_page(&mut self, page: &[EmployeeId]) -> usize {
        let before = self.ids.len();
        self.ids.retain(|id| page.contains(id));
        before - self.ids.len()
    }
}
