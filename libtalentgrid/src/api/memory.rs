//! In-memory page source
//!
//! Serves a fixed row set page by page. It can simulate latency and
//! scripted failures and records every request, which makes it the test
//! double for slice behavior and the backend of the demo mode.

use std::cmp::Ordering;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use crate::error::ApiError;
use crate::paging::{Filters, PageRequest};

use super::auth::SessionRefresher;
use super::PageSource;

type Matcher<T, F> = Box<dyn Fn(&T, &F) -> bool + Send + Sync>;
type Order<T, F> = Box<dyn Fn(&T, &T, &F) -> Ordering + Send + Sync>;

/// Page source over a `Vec` of rows
pub struct MemorySource<T, F> {
    rows: Vec<T>,
    page_size: usize,
    matcher: Matcher<T, F>,
    order: Option<Order<T, F>>,
    delay: Duration,

    /// Scripted failures, consumed one per request before serving rows
    failures: Arc<Mutex<VecDeque<ApiError>>>,

    /// Pages requested, in order (for verification)
    requests: Arc<Mutex<Vec<PageRequest<F>>>>,

    /// Requests currently being served
    in_flight: Arc<Mutex<usize>>,

    /// Highest number of simultaneous requests observed
    peak_in_flight: Arc<Mutex<usize>>,
}

impl<T, F> MemorySource<T, F>
where
    T: Clone + Send + Sync + 'static,
    F: Filters,
{
    /// Serve every row regardless of filters
    pub fn new(rows: Vec<T>, page_size: usize) -> Self {
        Self {
            rows,
            page_size,
            matcher: Box::new(|_, _| true),
            order: None,
            delay: Duration::from_millis(0),
            failures: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            in_flight: Arc::new(Mutex::new(0)),
            peak_in_flight: Arc::new(Mutex::new(0)),
        }
    }

    /// Only serve rows accepted by `matcher` under the request's filters
    pub fn with_matcher(mut self, matcher: impl Fn(&T, &F) -> bool + Send + Sync + 'static) -> Self {
        self.matcher = Box::new(matcher);
        self
    }

    /// Sort matching rows under the request's filters before paging
    pub fn with_order(
        mut self,
        order: impl Fn(&T, &T, &F) -> Ordering + Send + Sync + 'static,
    ) -> Self {
        self.order = Some(Box::new(order));
        self
    }

    /// Wait before answering each request
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Queue an error to be returned by the next unanswered request
    pub fn fail_next(&self, error: ApiError) {
        if let Ok(mut failures) = self.failures.lock() {
            failures.push_back(error);
        }
    }

    /// Number of requests served so far (including failed ones)
    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// Pages requested, in order
    pub fn requested_pages(&self) -> Vec<u32> {
        self.requests
            .lock()
            .map(|r| r.iter().map(|req| req.page).collect())
            .unwrap_or_default()
    }

    /// Every request received, in order
    pub fn requests(&self) -> Vec<PageRequest<F>> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Highest number of requests that were being served at the same time
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.lock().map(|p| *p).unwrap_or(0)
    }

    fn enter(&self) {
        if let (Ok(mut current), Ok(mut peak)) = (self.in_flight.lock(), self.peak_in_flight.lock()) {
            *current += 1;
            *peak = (*peak).max(*current);
        }
    }

    fn leave(&self) {
        if let Ok(mut current) = self.in_flight.lock() {
            *current = current.saturating_sub(1);
        }
    }

    fn page_rows(&self, request: &PageRequest<F>) -> Vec<T> {
        let skip = (request.page.saturating_sub(1) as usize) * self.page_size;
        let mut matching: Vec<&T> = self
            .rows
            .iter()
            .filter(|row| (self.matcher)(row, &request.filters))
            .collect();
        if let Some(order) = &self.order {
            matching.sort_by(|a, b| order(a, b, &request.filters));
        }
        matching
            .into_iter()
            .skip(skip)
            .take(self.page_size)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl<T, F> PageSource<T, F> for MemorySource<T, F>
where
    T: Clone + Send + Sync + 'static,
    F: Filters,
{
    async fn fetch_page(&self, request: &PageRequest<F>) -> Result<Vec<T>, ApiError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        self.enter();

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        let failure = self.failures.lock().ok().and_then(|mut f| f.pop_front());
        let result = match failure {
            Some(error) => Err(error),
            None => Ok(self.page_rows(request)),
        };

        self.leave();
        result
    }
}

/// Session refresher with a scripted answer
#[derive(Clone)]
pub struct MockSession {
    succeeds: bool,
    refresh_count: Arc<Mutex<usize>>,
}

impl MockSession {
    pub fn succeeding() -> Self {
        Self {
            succeeds: true,
            refresh_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            succeeds: false,
            refresh_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn refresh_count(&self) -> usize {
        self.refresh_count.lock().map(|c| *c).unwrap_or(0)
    }
}

#[async_trait]
impl SessionRefresher for MockSession {
    async fn refresh(&self) -> Result<(), ApiError> {
        if let Ok(mut count) = self.refresh_count.lock() {
            *count += 1;
        }
        if self.succeeds {
            Ok(())
        } else {
            Err(ApiError::Unauthorized)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paging::NoFilters;

    fn request(page: u32) -> PageRequest<NoFilters> {
        PageRequest {
            page,
            filters: NoFilters,
            epoch: 0,
        }
    }

    #[tokio::test]
    async fn test_pages_are_sliced() {
        let source: MemorySource<u32, NoFilters> = MemorySource::new((1..=12).collect(), 5);

        assert_eq!(source.fetch_page(&request(1)).await.unwrap(), vec![1, 2, 3, 4, 5]);
        assert_eq!(source.fetch_page(&request(3)).await.unwrap(), vec![11, 12]);
        assert!(source.fetch_page(&request(4)).await.unwrap().is_empty());
        assert_eq!(source.requested_pages(), vec![1, 3, 4]);
    }

    #[tokio::test]
    async fn test_scripted_failure_consumed_once() {
        let source: MemorySource<u32, NoFilters> = MemorySource::new(vec![1, 2], 5);
        source.fail_next(ApiError::Network("down".to_string()));

        assert!(source.fetch_page(&request(1)).await.is_err());
        assert_eq!(source.fetch_page(&request(1)).await.unwrap(), vec![1, 2]);
        assert_eq!(source.call_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_session_counts_refreshes() {
        let session = MockSession::failing();
        assert!(session.refresh().await.is_err());
        assert_eq!(session.refresh_count(), 1);
    }
}
