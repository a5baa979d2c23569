//! Roster query engine: owns the current query, the displayed page and the
//! selection, and keeps them consistent with the remote store.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, warn};

use roster_core::{EmployeeId, Supersession, Ticket};

use crate::{EmployeeRecord, RosterError, RosterPage, RosterQuery, RosterRequest, RosterStore, SelectionSet, SortColumn, SortDirection, StoreError};

/// Snapshot of everything a roster view renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterView {
    pub query: RosterQuery,
    pub rows: Vec<EmployeeRecord>,
    /// Filtered row count across all pages.
    pub total_count: u64,
    pub selection: SelectionSet,
    pub loading: bool,
    pub last_error: Option<String>,
    /// Query the displayed rows were fetched with; `None` until the first
    /// fetch lands.
    pub applied_query: Option<RosterQuery>,
}

impl RosterView {
    fn new(query: RosterQuery) -> Self {
        Self {
            query,
            rows: Vec::new(),
            total_count: 0,
            selection: SelectionSet::new(),
            loading: false,
            last_error: None,
            applied_query: None,
        }
    }

    pub fn page_count(&self) -> u32 {
        self.query.page_count(self.total_count)
    }

    pub fn page_ids(&self) -> Vec<EmployeeId> {
        self.rows.iter().map(|r| r.id).collect()
    }

    pub fn is_loaded(&self) -> bool {
        self.applied_query.is_some()
    }
}

/// How a fetch ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The result was applied to the view.
    Applied,
    /// A newer fetch was issued while this one was in flight; its result was
    /// dropped.
    Superseded,
}

enum Landing {
    Applied,
    Superseded,
    Reclamped,
    Failed(StoreError),
}

/// Drives paginated, filtered, sorted reads of the employee roster.
///
/// Every parameter change triggers one fetch. When fetches overlap, the last
/// query wins: an older response arriving late is discarded.
pub struct RosterEngine {
    store: Arc<dyn RosterStore>,
    view: watch::Sender<RosterView>,
    fetches: Supersession,
}

impl RosterEngine {
    /// Create an engine with `query` as its initial parameters. Nothing is
    /// fetched until [`Self::refresh`] or a setter is called.
    pub fn new(store: Arc<dyn RosterStore>, query: RosterQuery) -> Self {
        let (view, _) = watch::channel(RosterView::new(query));
        Self {
            store,
            view,
            fetches: Supersession::new(),
        }
    }

    pub fn view(&self) -> RosterView {
        self.view.borrow().clone()
    }

    pub fn query(&self) -> RosterQuery {
        self.view.borrow().query.clone()
    }

    pub fn selection(&self) -> SelectionSet {
        self.view.borrow().selection.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<RosterView> {
        self.view.subscribe()
    }

    /// Replace the name filter and go back to page 1.
    pub async fn set_filter(&self, text: impl Into<String>) -> Result<FetchOutcome, RosterError> {
        let text = text.into();
        self.apply(|v| {
            v.query.search_text = text;
            v.query.page = 1;
        })
        .await
    }

    /// Sort by `column` in `direction` and go back to page 1.
    pub async fn set_sort(&self, column: SortColumn, direction: SortDirection) -> Result<FetchOutcome, RosterError> {
        self.apply(|v| {
            v.query.sort_column = column;
            v.query.sort_direction = direction;
            v.query.page = 1;
        })
        .await
    }

    /// Flip the direction when `column` is already the sort column, otherwise
    /// sort ascending by it.
    pub async fn toggle_sort(&self, column: SortColumn) -> Result<FetchOutcome, RosterError> {
        self.apply(|v| {
            if v.query.sort_column == column {
                v.query.sort_direction = v.query.sort_direction.toggled();
            } else {
                v.query.sort_column = column;
                v.query.sort_direction = SortDirection::Asc;
            }
            v.query.page = 1;
        })
        .await
    }

    /// Move to `page`, clamped to the known page range.
    pub async fn set_page(&self, page: u32) -> Result<FetchOutcome, RosterError> {
        self.apply(|v| {
            v.query.page = page.max(1);
            if v.is_loaded() {
                v.query.clamp_page(v.total_count);
            }
        })
        .await
    }

    /// Re-run the current query, e.g. after a write.
    pub async fn refresh(&self) -> Result<FetchOutcome, RosterError> {
        self.apply(|_| {}).await
    }

    /// Select or deselect one row on the current page.
    pub fn select(&self, id: EmployeeId, selected: bool) -> bool {
        self.view.send_if_modified(|v| {
            let page = v.page_ids();
            v.selection.set(id, selected, &page)
        })
    }

    /// Select every row on the current page, or none.
    pub fn select_all(&self, selected: bool) {
        self.view.send_modify(|v| {
            let page = v.page_ids();
            v.selection.set_all(selected, &page);
        });
    }

    pub fn clear_selection(&self) {
        self.view.send_if_modified(|v| {
            let had_selection = !v.selection.is_empty();
            v.selection.clear();
            had_selection
        });
    }

    /// Load a single record for a detail view.
    pub async fn employee(&self, id: EmployeeId) -> Result<EmployeeRecord, RosterError> {
        self.store
            .get_by_id(id)
            .await
            .map_err(RosterError::Query)?
            .ok_or(RosterError::Query(StoreError::NotFound))
    }

    async fn apply(&self, change: impl FnOnce(&mut RosterView)) -> Result<FetchOutcome, RosterError> {
        let Some((mut ticket, mut request)) = self.begin(change) else {
            return Ok(FetchOutcome::Superseded);
        };
        loop {
            debug!(offset = request.offset, limit = request.limit, search = ?request.search, "fetching roster page");
            let result = self.store.query(&request).await;

            match self.land(ticket, result) {
                Landing::Applied => return Ok(FetchOutcome::Applied),
                Landing::Superseded => {
                    debug!(generation = ticket.generation(), "discarding superseded roster page");
                    return Ok(FetchOutcome::Superseded);
                }
                Landing::Failed(err) => {
                    warn!(error = %err, "roster fetch failed; keeping current page");
                    return Err(RosterError::Query(err));
                }
                // The page only ever moves down here, so this terminates.
                Landing::Reclamped => match self.begin(|_| {}) {
                    Some(next) => (ticket, request) = next,
                    None => return Ok(FetchOutcome::Superseded),
                },
            }
        }
    }

    /// The ticket and the request it stands for are taken under the same
    /// write as the query change, so the latest ticket always carries the
    /// latest query.
    fn begin(&self, change: impl FnOnce(&mut RosterView)) -> Option<(Ticket, RosterRequest)> {
        let mut issued = None;
        self.view.send_modify(|v| {
            change(v);
            v.loading = true;
            issued = Some((self.fetches.issue(), v.query.request()));
        });
        issued
    }

    fn land(&self, ticket: Ticket, result: Result<RosterPage, StoreError>) -> Landing {
        let mut landing = Landing::Superseded;
        self.view.send_if_modified(|v| {
            if !self.fetches.is_current(ticket) {
                return false;
            }
            match result {
                Ok(page) => {
                    if v.query.clamp_page(page.total_count) {
                        debug!(page = v.query.page, total = page.total_count, "page out of range; refetching");
                        landing = Landing::Reclamped;
                        return true;
                    }
                    v.total_count = page.total_count;
                    v.rows = page.rows;
                    let ids = v.page_ids();
                    v.selection.retain_page(&ids);
                    v.loading = false;
                    v.last_error = None;
                    v.applied_query = Some(v.query.clone());
                    landing = Landing::Applied;
                }
                Err(err) => {
                    if let Some(applied) = &v.applied_query {
                        v.query = applied.clone();
                    }
                    v.loading = false;
                    v.last_error = Some(err.to_string());
                    landing = Landing::Failed(err);
                }
            }
            true
        });
        landing
    }
}
