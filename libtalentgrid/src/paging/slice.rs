//! The async page store
//!
//! `PageSlice` owns one `PageState` inside a `tokio::sync::watch` channel.
//! Every transition runs inside a single `send_modify`/`send_if_modified`
//! call, so subscribers only ever observe whole transitions: a reset is seen
//! as `{items: [], page: 1, has_more: true}` before the first page of the new
//! epoch lands, never as new filters over old rows.
//!
//! Network calls happen outside the channel. Each request carries the epoch
//! it was issued in and its response is dropped if the epoch moved on.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::api::auth::{fetch_with_refresh, SessionRefresher};
use crate::api::PageSource;
use crate::error::ApiError;
use crate::notices::{Notice, NoticeBus};

use super::filters::Filters;
use super::state::{FetchOutcome, PageState};
use super::Row;

/// Store slice for one paginated list
pub struct PageSlice<T, F> {
    name: String,
    state: watch::Sender<PageState<T, F>>,
    source: Arc<dyn PageSource<T, F>>,
    session: Option<Arc<dyn SessionRefresher>>,
    notices: Option<NoticeBus>,
    not_found_message: Option<String>,
}

impl<T, F> PageSlice<T, F>
where
    T: Row,
    F: Filters,
{
    /// Create a slice in its initial state (`page = 1`, nothing loaded)
    ///
    /// `name` identifies the view in logs and notices.
    pub fn new(
        name: impl Into<String>,
        source: Arc<dyn PageSource<T, F>>,
        filters: F,
        page_size: Option<usize>,
    ) -> Self {
        let (state, _) = watch::channel(PageState::new(filters, page_size));
        Self {
            name: name.into(),
            state,
            source,
            session: None,
            notices: None,
            not_found_message: None,
        }
    }

    /// Recover from 401 responses with this refresher
    pub fn with_session(mut self, session: Arc<dyn SessionRefresher>) -> Self {
        self.session = Some(session);
        self
    }

    /// Publish notices on this bus
    pub fn with_notices(mut self, notices: NoticeBus) -> Self {
        self.notices = Some(notices);
        self
    }

    /// Message shown instead of the generic one when the resource is missing
    pub fn with_not_found_message(mut self, message: impl Into<String>) -> Self {
        self.not_found_message = Some(message.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> PageState<T, F> {
        self.state.borrow().clone()
    }

    /// Receiver woken on every state change
    pub fn subscribe(&self) -> watch::Receiver<PageState<T, F>> {
        self.state.subscribe()
    }

    pub fn has_more(&self) -> bool {
        self.state.borrow().has_more
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    pub fn len(&self) -> usize {
        self.state.borrow().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().items.is_empty()
    }

    /// Fetch and append the next page
    ///
    /// A no-op returning `FetchOutcome::Skipped` when the list is exhausted
    /// or a fetch of the current epoch is in flight. Failures never escape:
    /// they clear the loading flag, record `last_error` and publish a notice.
    pub async fn fetch_data(&self) -> FetchOutcome {
        let mut request = None;
        self.state.send_if_modified(|state| {
            request = state.begin_fetch();
            request.is_some()
        });

        let Some(request) = request else {
            debug!(view = %self.name, "Fetch skipped: exhausted or already loading");
            return FetchOutcome::Skipped;
        };

        debug!(view = %self.name, page = request.page, epoch = request.epoch, "Fetching page");

        let result = fetch_with_refresh(
            self.source.as_ref(),
            self.session.as_deref(),
            &request,
        )
        .await;

        match result {
            Ok(rows) => {
                let mut outcome = FetchOutcome::Stale;
                self.state.send_if_modified(|state| {
                    outcome = state.complete_fetch(&request, rows);
                    outcome != FetchOutcome::Stale
                });

                match &outcome {
                    FetchOutcome::Appended { count, has_more } => {
                        info!(view = %self.name, page = request.page, count, has_more, "Page loaded");
                        self.emit(Notice::PageLoaded {
                            view: self.name.clone(),
                            page: request.page,
                            count: *count,
                            has_more: *has_more,
                        });
                    }
                    _ => {
                        debug!(view = %self.name, epoch = request.epoch, "Dropped response from a previous epoch");
                    }
                }
                outcome
            }
            Err(err) => {
                let message = self.message_for(&err);
                let mut outcome = FetchOutcome::Stale;
                self.state.send_if_modified(|state| {
                    outcome = state.fail_fetch(&request, err.clone(), message.clone());
                    outcome != FetchOutcome::Stale
                });

                if outcome == FetchOutcome::Stale {
                    debug!(view = %self.name, epoch = request.epoch, "Dropped failure from a previous epoch");
                    return outcome;
                }

                match err {
                    ApiError::SessionExpired => {
                        error!(view = %self.name, "Session expired while loading page {}", request.page);
                        self.emit(Notice::SessionExpired {
                            view: self.name.clone(),
                            message,
                        });
                    }
                    ref other => {
                        if other.is_transient() {
                            warn!(view = %self.name, "Failed to load page {}: {}", request.page, other);
                        } else {
                            error!(view = %self.name, "Failed to load page {}: {}", request.page, other);
                        }
                        self.emit(Notice::FetchFailed {
                            view: self.name.clone(),
                            message,
                            transient: other.is_transient(),
                        });
                    }
                }
                outcome
            }
        }
    }

    /// Merge a filter patch, restart pagination and fetch page 1
    ///
    /// The reset is published as one state change before the fetch starts.
    pub async fn set_filters(&self, patch: F::Patch) -> FetchOutcome {
        let mut epoch = 0;
        self.state.send_modify(|state| {
            state.reset(patch);
            epoch = state.epoch;
        });

        info!(view = %self.name, epoch, "Filters changed, pagination reset");
        self.emit(Notice::FiltersReset {
            view: self.name.clone(),
            epoch,
        });

        self.fetch_data().await
    }

    /// Remove rows by id; returns how many were removed
    pub fn remove_item(&self, id: &str) -> usize {
        let mut removed = 0;
        self.state.send_if_modified(|state| {
            removed = state.remove_where(|row| row.row_id() == id);
            removed > 0
        });

        if removed > 0 {
            debug!(view = %self.name, id, "Removed row");
            self.emit(Notice::RowsRemoved {
                view: self.name.clone(),
                count: removed,
            });
        }
        removed
    }

    fn message_for(&self, error: &ApiError) -> String {
        match (error, &self.not_found_message) {
            (ApiError::NotFound(_), Some(message)) => message.clone(),
            _ => error.user_message(),
        }
    }

    fn emit(&self, notice: Notice) {
        if let Some(bus) = &self.notices {
            bus.emit(notice);
        }
    }
}

impl<T, F> PageSlice<T, F>
where
    T: Row,
    F: Filters,
    F::Patch: Default,
{
    /// Reload from page 1 under the current filters
    pub async fn refresh(&self) -> FetchOutcome {
        self.set_filters(F::Patch::default()).await
    }
}
