//! End-to-end behavior of page slices over an in-memory source

use std::sync::Arc;
use std::time::Duration;

use libtalentgrid::api::memory::{MemorySource, MockSession};
use libtalentgrid::demo;
use libtalentgrid::error::ApiError;
use libtalentgrid::notices::{Notice, NoticeBus};
use libtalentgrid::paging::{FetchOutcome, PageSlice};
use libtalentgrid::types::{Application, ApplicationStatus, Job};
use libtalentgrid::views::{ApplicationFilterPatch, ApplicationFilters, JobFilters};

fn job_source(rows: usize) -> Arc<MemorySource<Job, JobFilters>> {
    Arc::new(MemorySource::new(demo::jobs(rows), 5).with_matcher(demo::job_matches))
}

fn application_source(delay: Duration) -> Arc<MemorySource<Application, ApplicationFilters>> {
    Arc::new(
        MemorySource::new(demo::applications(12), 5)
            .with_matcher(demo::application_matches)
            .with_delay(delay),
    )
}

#[tokio::test]
async fn test_twelve_rows_load_in_three_pages() {
    let source = job_source(12);
    let slice = PageSlice::new("jobs", source.clone(), JobFilters::default(), Some(5));

    assert_eq!(
        slice.fetch_data().await,
        FetchOutcome::Appended {
            count: 5,
            has_more: true
        }
    );
    assert_eq!(slice.snapshot().page, 2);

    slice.fetch_data().await;
    assert_eq!(slice.len(), 10);
    assert!(slice.has_more());

    assert_eq!(
        slice.fetch_data().await,
        FetchOutcome::Appended {
            count: 2,
            has_more: false
        }
    );

    let state = slice.snapshot();
    assert_eq!(state.items.len(), 12);
    assert_eq!(state.page, 4);
    assert!(!state.has_more);
    assert!(!state.is_loading);

    let ids: Vec<&str> = state.items.iter().map(|j| j.id.as_str()).collect();
    assert_eq!(ids[0], "job-001");
    assert_eq!(ids[11], "job-012");

    // Exhausted: no further requests
    assert_eq!(slice.fetch_data().await, FetchOutcome::Skipped);
    assert_eq!(source.requested_pages(), vec![1, 2, 3]);
}

#[tokio::test]
async fn test_full_last_page_needs_one_empty_page() {
    let source = job_source(10);
    let slice = PageSlice::new("jobs", source.clone(), JobFilters::default(), Some(5));

    slice.fetch_data().await;
    slice.fetch_data().await;
    assert!(slice.has_more());

    assert_eq!(
        slice.fetch_data().await,
        FetchOutcome::Appended {
            count: 0,
            has_more: false
        }
    );
    assert_eq!(slice.len(), 10);
    assert_eq!(source.call_count(), 3);
}

#[tokio::test]
async fn test_concurrent_fetches_issue_one_request() {
    let source = application_source(Duration::from_millis(50));
    let slice = PageSlice::new(
        "applications",
        source.clone(),
        ApplicationFilters::default(),
        Some(5),
    );

    let (first, second) = tokio::join!(slice.fetch_data(), slice.fetch_data());

    let outcomes = [first, second];
    assert_eq!(
        outcomes
            .iter()
            .filter(|o| matches!(o, FetchOutcome::Appended { .. }))
            .count(),
        1
    );
    assert!(outcomes.contains(&FetchOutcome::Skipped));
    assert_eq!(source.call_count(), 1);
    assert_eq!(source.peak_in_flight(), 1);
    assert_eq!(slice.len(), 5);
}

#[tokio::test]
async fn test_set_filters_restarts_from_page_one() {
    let source = application_source(Duration::ZERO);
    let slice = PageSlice::new(
        "applications",
        source.clone(),
        ApplicationFilters::default(),
        Some(5),
    );

    slice.fetch_data().await;
    slice.fetch_data().await;
    assert_eq!(slice.snapshot().page, 3);

    let outcome = slice
        .set_filters(ApplicationFilterPatch {
            status: Some(Some(ApplicationStatus::Accepted)),
            ..Default::default()
        })
        .await;

    assert_eq!(
        outcome,
        FetchOutcome::Appended {
            count: 3,
            has_more: false
        }
    );

    let state = slice.snapshot();
    assert_eq!(state.epoch, 1);
    assert_eq!(state.page, 2);
    assert!(state
        .items
        .iter()
        .all(|a| a.status == ApplicationStatus::Accepted));

    let last = source.requests().pop().unwrap();
    assert_eq!(last.page, 1);
    assert_eq!(last.filters.status, Some(ApplicationStatus::Accepted));
}

#[tokio::test]
async fn test_response_from_previous_filters_is_dropped() {
    let source = application_source(Duration::from_millis(100));
    let slice = Arc::new(PageSlice::new(
        "applications",
        source.clone(),
        ApplicationFilters::default(),
        Some(5),
    ));

    let in_flight = {
        let slice = slice.clone();
        tokio::spawn(async move { slice.fetch_data().await })
    };

    tokio::time::sleep(Duration::from_millis(20)).await;
    let filtered = slice
        .set_filters(ApplicationFilterPatch {
            status: Some(Some(ApplicationStatus::Accepted)),
            ..Default::default()
        })
        .await;

    assert_eq!(in_flight.await.unwrap(), FetchOutcome::Stale);
    assert!(matches!(filtered, FetchOutcome::Appended { count: 3, .. }));

    let state = slice.snapshot();
    assert_eq!(state.items.len(), 3);
    assert!(state
        .items
        .iter()
        .all(|a| a.status == ApplicationStatus::Accepted));
    assert!(!state.is_loading);
    assert_eq!(source.call_count(), 2);
}

#[tokio::test]
async fn test_subscriber_sees_reset_before_new_rows() {
    let source = application_source(Duration::from_millis(30));
    let slice = Arc::new(PageSlice::new(
        "applications",
        source,
        ApplicationFilters::default(),
        Some(5),
    ));
    slice.fetch_data().await;

    let mut rx = slice.subscribe();
    rx.borrow_and_update();

    let task = {
        let slice = slice.clone();
        tokio::spawn(async move {
            slice
                .set_filters(ApplicationFilterPatch {
                    status: Some(Some(ApplicationStatus::Rejected)),
                    ..Default::default()
                })
                .await
        })
    };

    rx.changed().await.unwrap();
    {
        let state = rx.borrow_and_update();
        assert!(state.items.is_empty());
        assert_eq!(state.page, 1);
        assert_eq!(state.filters.status, Some(ApplicationStatus::Rejected));
    }

    task.await.unwrap();
    assert!(slice
        .snapshot()
        .items
        .iter()
        .all(|a| a.status == ApplicationStatus::Rejected));
}

#[tokio::test]
async fn test_unauthorized_refreshes_and_retries_once() {
    let source = job_source(12);
    source.fail_next(ApiError::Unauthorized);
    let session = Arc::new(MockSession::succeeding());
    let slice = PageSlice::new("jobs", source.clone(), JobFilters::default(), Some(5))
        .with_session(session.clone());

    let outcome = slice.fetch_data().await;

    assert!(matches!(outcome, FetchOutcome::Appended { count: 5, .. }));
    assert_eq!(session.refresh_count(), 1);
    assert_eq!(source.requested_pages(), vec![1, 1]);
}

#[tokio::test]
async fn test_second_unauthorized_expires_session() {
    let source = job_source(12);
    source.fail_next(ApiError::Unauthorized);
    source.fail_next(ApiError::Unauthorized);
    let session = Arc::new(MockSession::succeeding());
    let notices = NoticeBus::default();
    let mut rx = notices.subscribe();
    let slice = PageSlice::new("jobs", source.clone(), JobFilters::default(), Some(5))
        .with_session(session.clone())
        .with_notices(notices);

    let outcome = slice.fetch_data().await;

    assert_eq!(outcome, FetchOutcome::Failed(ApiError::SessionExpired));
    assert_eq!(session.refresh_count(), 1);
    assert_eq!(source.call_count(), 2);

    let state = slice.snapshot();
    assert!(state.items.is_empty());
    assert!(!state.is_loading);
    assert!(state.last_error.unwrap().contains("session has expired"));

    match rx.recv().await.unwrap() {
        Notice::SessionExpired { view, .. } => assert_eq!(view, "jobs"),
        other => panic!("unexpected notice: {:?}", other),
    }
}

#[tokio::test]
async fn test_failed_refresh_skips_retry() {
    let source = job_source(12);
    source.fail_next(ApiError::Unauthorized);
    let session = Arc::new(MockSession::failing());
    let slice = PageSlice::new("jobs", source.clone(), JobFilters::default(), Some(5))
        .with_session(session.clone());

    assert_eq!(
        slice.fetch_data().await,
        FetchOutcome::Failed(ApiError::SessionExpired)
    );
    assert_eq!(session.refresh_count(), 1);
    assert_eq!(source.call_count(), 1);
}

#[tokio::test]
async fn test_transient_failure_can_be_retried() {
    let source = job_source(12);
    source.fail_next(ApiError::Network("connection reset".to_string()));
    let notices = NoticeBus::default();
    let mut rx = notices.subscribe();
    let slice =
        PageSlice::new("jobs", source.clone(), JobFilters::default(), Some(5)).with_notices(notices);

    assert!(matches!(
        slice.fetch_data().await,
        FetchOutcome::Failed(ApiError::Network(_))
    ));
    assert_eq!(slice.snapshot().page, 1);
    assert!(slice.has_more());

    match rx.recv().await.unwrap() {
        Notice::FetchFailed { transient, .. } => assert!(transient),
        other => panic!("unexpected notice: {:?}", other),
    }

    assert!(matches!(
        slice.fetch_data().await,
        FetchOutcome::Appended { count: 5, .. }
    ));
    assert!(slice.snapshot().last_error.is_none());
    assert_eq!(source.requested_pages(), vec![1, 1]);
}

#[tokio::test]
async fn test_remove_item_keeps_pagination() {
    let source = job_source(12);
    let slice = PageSlice::new("jobs", source.clone(), JobFilters::default(), Some(5));
    slice.fetch_data().await;

    assert_eq!(slice.remove_item("job-003"), 1);

    slice.fetch_data().await;
    let state = slice.snapshot();
    assert_eq!(state.items.len(), 9);
    assert!(!state.items.iter().any(|j| j.id == "job-003"));
    assert_eq!(source.requested_pages(), vec![1, 2]);
}

#[tokio::test]
async fn test_refresh_reloads_under_current_filters() {
    let source = application_source(Duration::ZERO);
    let slice = PageSlice::new(
        "applications",
        source.clone(),
        ApplicationFilters {
            status: Some(ApplicationStatus::Pending),
            ..Default::default()
        },
        Some(5),
    );
    slice.fetch_data().await;

    slice.refresh().await;

    let state = slice.snapshot();
    assert_eq!(state.epoch, 1);
    assert_eq!(state.filters.status, Some(ApplicationStatus::Pending));
    assert_eq!(state.items.len(), 3);
    assert_eq!(source.requested_pages(), vec![1, 1]);
}
