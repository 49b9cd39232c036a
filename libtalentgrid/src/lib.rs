//! Talentgrid - paginated dashboards for a recruitment platform
//!
//! This library loads the jobs, applications, interviews and offers lists
//! page by page from the Talentgrid REST API, keeps each list in an
//! observable store slice and recovers expired sessions with one token
//! refresh.

pub mod api;
pub mod config;
pub mod dashboard;
pub mod demo;
pub mod error;
pub mod identity;
pub mod logging;
pub mod notices;
pub mod paging;
pub mod types;
pub mod views;

// Re-export commonly used types
pub use config::Config;
pub use dashboard::Dashboard;
pub use error::{ApiError, Result, TalentError};
pub use identity::{Identity, IdentityStore, Role};
pub use notices::{Notice, NoticeBus, NoticeLevel};
pub use paging::{FetchOutcome, PageSlice, PageState, Row};
pub use types::{Application, Interview, Job, Offer};
pub use views::{SortOrder, ViewKind};
