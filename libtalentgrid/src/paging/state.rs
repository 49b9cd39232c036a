//! Pagination state and its pure transitions
//!
//! Nothing in here performs I/O. The async store in `slice.rs` calls these
//! transitions inside single `watch` updates so every transition is atomic.

use crate::error::ApiError;

use super::filters::Filters;

/// Accumulated state of one paginated list
#[derive(Debug, Clone, PartialEq)]
pub struct PageState<T, F> {
    /// Rows of every page fetched in the current epoch
    pub items: Vec<T>,
    /// Next page to request, starting at 1
    pub page: u32,
    pub has_more: bool,
    pub is_loading: bool,
    pub filters: F,
    /// Filter generation; bumped by every reset
    pub epoch: u64,
    /// Rows per page when known; otherwise an empty page ends the list
    pub page_size: Option<usize>,
    /// User-visible message of the last failed fetch in this epoch
    pub last_error: Option<String>,
}

/// One page request, tagged with the epoch it was issued in
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest<F> {
    pub page: u32,
    pub filters: F,
    pub epoch: u64,
}

/// What a fetch attempt did to the state
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Guard refused: exhausted or already loading
    Skipped,
    /// Rows appended and page advanced
    Appended { count: usize, has_more: bool },
    /// Response belonged to an older epoch and was dropped
    Stale,
    /// Request failed; items and page are unchanged
    Failed(ApiError),
}

impl<T, F: Filters> PageState<T, F> {
    pub fn new(filters: F, page_size: Option<usize>) -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            has_more: true,
            is_loading: false,
            filters,
            epoch: 0,
            page_size,
            last_error: None,
        }
    }

    /// Start a fetch if the guard allows one
    ///
    /// Returns `None` without touching state when the list is exhausted or a
    /// fetch is already in flight.
    pub fn begin_fetch(&mut self) -> Option<PageRequest<F>> {
        if !self.has_more || self.is_loading {
            return None;
        }
        self.is_loading = true;
        Some(PageRequest {
            page: self.page,
            filters: self.filters.clone(),
            epoch: self.epoch,
        })
    }

    /// Apply a successful response
    pub fn complete_fetch(&mut self, request: &PageRequest<F>, rows: Vec<T>) -> FetchOutcome {
        if request.epoch != self.epoch {
            return FetchOutcome::Stale;
        }

        let count = rows.len();
        let more = match self.page_size {
            Some(size) => count >= size,
            None => count > 0,
        };

        self.items.extend(rows);
        self.has_more = self.has_more && more;
        self.page += 1;
        self.is_loading = false;
        self.last_error = None;

        FetchOutcome::Appended {
            count,
            has_more: self.has_more,
        }
    }

    /// Apply a failed response; only the loading flag and error change
    pub fn fail_fetch(
        &mut self,
        request: &PageRequest<F>,
        error: ApiError,
        message: String,
    ) -> FetchOutcome {
        if request.epoch != self.epoch {
            return FetchOutcome::Stale;
        }
        self.is_loading = false;
        self.last_error = Some(message);
        FetchOutcome::Failed(error)
    }

    /// Merge a filter patch and start a new epoch
    pub fn reset(&mut self, patch: F::Patch) {
        self.filters.merge(patch);
        self.items.clear();
        self.page = 1;
        self.has_more = true;
        self.is_loading = false;
        self.last_error = None;
        self.epoch += 1;
    }

    /// Drop rows matching `pred`; pagination is untouched
    pub fn remove_where(&mut self, pred: impl Fn(&T) -> bool) -> usize {
        let before = self.items.len();
        self.items.retain(|item| !pred(item));
        before - self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// No rows and nothing in flight
    pub fn shows_placeholder(&self) -> bool {
        self.items.is_empty() && !self.is_loading
    }
}
