//! User-visible notices
//!
//! Slices never return errors past `fetch_data()`; failures (and a few
//! informational milestones) are published here for whatever front-end is
//! listening.
//!
//! The bus uses `tokio::sync::broadcast` so several front-end components
//! can subscribe. Emitting with no subscribers drops the notice.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Notice receiver type alias
pub type NoticeReceiver = broadcast::Receiver<Notice>;

/// Broadcast bus for notices
#[derive(Clone)]
pub struct NoticeBus {
    sender: broadcast::Sender<Notice>,
}

impl NoticeBus {
    /// Create a bus buffering up to `capacity` notices per subscriber
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> NoticeReceiver {
        self.sender.subscribe()
    }

    /// Publish a notice; never blocks
    pub fn emit(&self, notice: Notice) {
        // send() fails only when nobody is listening
        let _ = self.sender.send(notice);
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for NoticeBus {
    fn default() -> Self {
        Self::new(100)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Notices published by page slices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notice {
    /// A page was appended
    PageLoaded {
        view: String,
        page: u32,
        count: usize,
        has_more: bool,
    },

    /// Filters changed and pagination restarted
    FiltersReset { view: String, epoch: u64 },

    /// A fetch failed; the list is unchanged and can be retried
    FetchFailed {
        view: String,
        message: String,
        transient: bool,
    },

    /// Refresh-and-retry did not recover the session
    SessionExpired { view: String, message: String },

    /// Rows were removed locally
    RowsRemoved { view: String, count: usize },
}

impl Notice {
    pub fn level(&self) -> NoticeLevel {
        match self {
            Notice::PageLoaded { .. } | Notice::FiltersReset { .. } | Notice::RowsRemoved { .. } => {
                NoticeLevel::Info
            }
            Notice::FetchFailed { transient: true, .. } => NoticeLevel::Warning,
            Notice::FetchFailed { .. } | Notice::SessionExpired { .. } => NoticeLevel::Error,
        }
    }

    /// View the notice concerns
    pub fn view(&self) -> &str {
        match self {
            Notice::PageLoaded { view, .. }
            | Notice::FiltersReset { view, .. }
            | Notice::FetchFailed { view, .. }
            | Notice::SessionExpired { view, .. }
            | Notice::RowsRemoved { view, .. } => view,
        }
    }

    /// One-line text for a status bar or overlay
    pub fn message(&self) -> String {
        match self {
            Notice::PageLoaded {
                page,
                count,
                has_more,
                ..
            } => {
                if *has_more {
                    format!("Loaded page {} ({} rows)", page, count)
                } else {
                    format!("Loaded page {} ({} rows), end of list", page, count)
                }
            }
            Notice::FiltersReset { .. } => "Filters applied".to_string(),
            Notice::FetchFailed { message, .. } | Notice::SessionExpired { message, .. } => {
                message.clone()
            }
            Notice::RowsRemoved { count, .. } => format!("Removed {} row(s)", count),
        }
    }
}
