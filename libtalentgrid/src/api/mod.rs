//! Data sources for page slices
//!
//! A slice only knows the `PageSource` contract: give me page `n` under
//! these filters. Implementations:
//!
//! - `http::HttpPageSource`: `GET <resource>?page=n&...` against the REST API
//! - `memory::MemorySource`: in-memory rows, used by tests and demo mode
//!
//! Session recovery (one refresh, one retry on 401) sits between the slice
//! and the source in `auth`.

use async_trait::async_trait;

use crate::error::ApiError;
use crate::paging::{Filters, PageRequest};

pub mod auth;
pub mod http;
pub mod memory;

pub use auth::{fetch_with_refresh, SessionRefresher, TokenStore};
pub use http::{HttpClient, HttpPageSource};

/// Source of pages for one list
#[async_trait]
pub trait PageSource<T: Send, F: Filters>: Send + Sync {
    /// Fetch the rows of `request.page` under `request.filters`
    ///
    /// # Errors
    ///
    /// - `ApiError::Unauthorized` when the server rejects the credentials
    /// - `ApiError::BadRequest` / `ApiError::NotFound` / `ApiError::Rejected` for permanent client errors
    /// - `ApiError::Server` / `ApiError::Network` for transient failures
    /// - `ApiError::Decode` when the body is not a list of rows
    async fn fetch_page(&self, request: &PageRequest<F>) -> Result<Vec<T>, ApiError>;
}
