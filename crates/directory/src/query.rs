//! Roster query parameters and the request they translate into.

use core::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::EmployeeRecord;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Columns a roster can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    #[default]
    Name,
    Email,
    Position,
    Department,
    HireDate,
    Salary,
    Status,
}

impl SortColumn {
    /// Compare two records on this column, ascending. Missing values sort last.
    pub fn compare(self, a: &EmployeeRecord, b: &EmployeeRecord) -> Ordering {
        match self {
            SortColumn::Name => cmp_text(&a.name, &b.name),
            SortColumn::Email => cmp_text(&a.email, &b.email),
            SortColumn::Position => cmp_text(&a.position, &b.position),
            SortColumn::Department => cmp_missing_last(a.department.as_deref(), b.department.as_deref(), cmp_text),
            SortColumn::HireDate => cmp_missing_last(a.hire_date.as_ref(), b.hire_date.as_ref(), Ord::cmp),
            SortColumn::Salary => cmp_missing_last(a.salary.as_ref(), b.salary.as_ref(), Ord::cmp),
            SortColumn::Status => a.status.as_str().cmp(b.status.as_str()),
        }
    }
}

fn cmp_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

fn cmp_missing_last<T: ?Sized>(a: Option<&T>, b: Option<&T>, cmp: impl Fn(&T, &T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => cmp(a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// One sort key of a store request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderKey {
    Column(SortColumn),
    /// Record id; always the final key so pages are deterministic when column
    /// values tie.
    Id,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderBy {
    pub key: OrderKey,
    pub direction: SortDirection,
}

impl OrderBy {
    pub fn compare(&self, a: &EmployeeRecord, b: &EmployeeRecord) -> Ordering {
        let ordering = match self.key {
            OrderKey::Column(column) => column.compare(a, b),
            OrderKey::Id => a.id.cmp(&b.id),
        };
        self.direction.apply(ordering)
    }
}

/// What a store must evaluate: filter, ordering and the offset window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterRequest {
    /// Case-insensitive substring matched against the employee name.
    pub search: Option<String>,
    pub order: Vec<OrderBy>,
    pub offset: u64,
    pub limit: u32,
}

impl RosterRequest {
    pub fn matches(&self, record: &EmployeeRecord) -> bool {
        match &self.search {
            Some(needle) => record.name.to_lowercase().contains(&needle.to_lowercase()),
            None => true,
        }
    }

    pub fn compare(&self, a: &EmployeeRecord, b: &EmployeeRecord) -> Ordering {
        self.order
            .iter()
            .map(|order| order.compare(a, b))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

/// Parameters of one roster view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterQuery {
    pub search_text: String,
    pub sort_column: SortColumn,
    pub sort_direction: SortDirection,
    /// 1-based.
    pub page: u32,
    pub page_size: u32,
}

impl Default for RosterQuery {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl RosterQuery {
    pub fn new(page_size: u32) -> Self {
        Self {
            search_text: String::new(),
            sort_column: SortColumn::default(),
            sort_direction: SortDirection::default(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn sorted_by(mut self, column: SortColumn, direction: SortDirection) -> Self {
        self.sort_column = column;
        self.sort_direction = direction;
        self
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page.max(1) - 1) * u64::from(self.page_size)
    }

    pub fn limit(&self) -> u32 {
        self.page_size
    }

    /// `max(1, ceil(total / page_size))`.
    pub fn page_count(&self, total: u64) -> u32 {
        let size = u64::from(self.page_size.max(1));
        let pages = total.div_ceil(size).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Clamp `page` into `[1, page_count(total)]`. Returns whether it moved.
    pub fn clamp_page(&mut self, total: u64) -> bool {
        let clamped = self.page.clamp(1, self.page_count(total));
        let moved = clamped != self.page;
        self.page = clamped;
        moved
    }

    pub fn request(&self) -> RosterRequest {
        let search = self.search_text.trim();
        RosterRequest {
            search: (!search.is_empty()).then(|| search.to_string()),
            order: vec![
                OrderBy {
                    key: OrderKey::Column(self.sort_column),
                    direction: self.sort_direction,
                },
                OrderBy {
                    key: OrderKey::Id,
                    direction: SortDirection::Asc,
                },
            ],
            offset: self.offset(),
            limit: self.limit(),
        }
    }
}
