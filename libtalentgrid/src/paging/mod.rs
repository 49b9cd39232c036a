//! Paginated collection loader
//!
//! Page-number based incremental loading for the dashboard lists:
//!
//! - `PageState`: accumulated rows, next page, loading/has-more flags,
//!   filters and the epoch that tags every request
//! - `Filters`: per-view filter selections and their query-string form
//! - `PageSlice`: the async store that owns one `PageState`, talks to a
//!   `PageSource` and publishes every change to its subscribers
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use libtalentgrid::api::memory::MemorySource;
//! use libtalentgrid::paging::PageSlice;
//! use libtalentgrid::views::{JobFilterPatch, JobFilters};
//! use libtalentgrid::types::JobStatus;
//!
//! # async fn example() {
//! let source = Arc::new(MemorySource::<_, JobFilters>::new(libtalentgrid::demo::jobs(12), 5));
//! let slice = PageSlice::new("jobs", source, JobFilters::default(), Some(5));
//!
//! slice.fetch_data().await;
//! assert_eq!(slice.snapshot().items.len(), 5);
//!
//! slice
//!     .set_filters(JobFilterPatch {
//!         status: Some(Some(JobStatus::Open)),
//!         ..Default::default()
//!     })
//!     .await;
//! # }
//! ```

pub mod filters;
pub mod slice;
pub mod state;

pub use filters::{query_pairs, Filters, NoFilters};
pub use slice::PageSlice;
pub use state::{FetchOutcome, PageRequest, PageState};

/// A row that can be addressed for explicit removal
pub trait Row: Clone + Send + Sync + 'static {
    fn row_id(&self) -> &str;
}
