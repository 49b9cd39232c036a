//! Wiring of the four dashboard slices
//!
//! `Dashboard::http` talks to the configured REST API through one shared
//! client, so every view uses the same cookie jar and token refresh.
//! `Dashboard::demo` serves generated rows from memory.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::api::memory::MemorySource;
use crate::api::{HttpClient, HttpPageSource, PageSource, SessionRefresher, TokenStore};
use crate::config::Config;
use crate::demo;
use crate::error::Result;
use crate::notices::NoticeBus;
use crate::paging::{Filters, PageSlice, Row};
use crate::types::{Application, Interview, Job, Offer};
use crate::views::{ApplicationFilters, InterviewFilters, JobFilters, OfferFilters, ViewKind};

/// Rows generated per view in demo mode
pub const DEMO_ROWS: usize = 23;

pub type JobsSlice = PageSlice<Job, JobFilters>;
pub type ApplicationsSlice = PageSlice<Application, ApplicationFilters>;
pub type InterviewsSlice = PageSlice<Interview, InterviewFilters>;
pub type OffersSlice = PageSlice<Offer, OfferFilters>;

/// The paginated lists of the recruitment dashboards
#[derive(Clone)]
pub struct Dashboard {
    pub jobs: Arc<JobsSlice>,
    pub applications: Arc<ApplicationsSlice>,
    pub interviews: Arc<InterviewsSlice>,
    pub offers: Arc<OffersSlice>,
    notices: NoticeBus,
}

impl Dashboard {
    /// Slices backed by the REST API
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built from `config.api`.
    pub fn http(config: &Config, notices: NoticeBus) -> Result<Self> {
        Self::http_with_tokens(config, notices, Arc::new(TokenStore::new()))
    }

    /// Slices backed by the REST API, sharing an existing token store
    pub fn http_with_tokens(
        config: &Config,
        notices: NoticeBus,
        tokens: Arc<TokenStore>,
    ) -> Result<Self> {
        let client = Arc::new(HttpClient::new(&config.api, tokens)?);
        let session: Arc<dyn SessionRefresher> = client.clone();
        let page_size = Some(config.paging.page_size);

        info!("Dashboard connected to {}", config.api.base_url);

        Ok(Self {
            jobs: build::<Job, JobFilters>(
                ViewKind::Jobs,
                http_source(&client, config, ViewKind::Jobs),
                page_size,
                &notices,
                Some(session.clone()),
            ),
            applications: build::<Application, ApplicationFilters>(
                ViewKind::Applications,
                http_source(&client, config, ViewKind::Applications),
                page_size,
                &notices,
                Some(session.clone()),
            ),
            interviews: build::<Interview, InterviewFilters>(
                ViewKind::Interviews,
                http_source(&client, config, ViewKind::Interviews),
                page_size,
                &notices,
                Some(session.clone()),
            ),
            offers: build::<Offer, OfferFilters>(
                ViewKind::Offers,
                http_source(&client, config, ViewKind::Offers),
                page_size,
                &notices,
                Some(session),
            ),
            notices,
        })
    }

    /// Slices over generated rows, answering after `latency`
    pub fn demo(config: &Config, notices: NoticeBus, latency: Duration) -> Self {
        let size = config.paging.page_size;
        let page_size = Some(size);

        let jobs = MemorySource::new(demo::jobs(DEMO_ROWS), size)
            .with_matcher(demo::job_matches)
            .with_order(|a: &Job, b: &Job, f: &JobFilters| {
                demo::by_date(&a.posted_at, &b.posted_at, f.sort)
            })
            .with_delay(latency);
        let applications = MemorySource::new(demo::applications(DEMO_ROWS), size)
            .with_matcher(demo::application_matches)
            .with_order(|a: &Application, b: &Application, f: &ApplicationFilters| {
                demo::by_date(&a.applied_at, &b.applied_at, f.sort)
            })
            .with_delay(latency);
        let interviews = MemorySource::new(demo::interviews(DEMO_ROWS), size)
            .with_matcher(demo::interview_matches)
            .with_order(|a: &Interview, b: &Interview, f: &InterviewFilters| {
                demo::by_date(&a.scheduled_at, &b.scheduled_at, f.sort)
            })
            .with_delay(latency);
        let offers = MemorySource::new(demo::offers(DEMO_ROWS), size)
            .with_matcher(demo::offer_matches)
            .with_order(|a: &Offer, b: &Offer, f: &OfferFilters| {
                demo::by_date(&a.expires_at, &b.expires_at, f.sort)
            })
            .with_delay(latency);

        info!("Dashboard running on demo data");

        Self {
            jobs: build::<Job, JobFilters>(
                ViewKind::Jobs,
                Arc::new(jobs),
                page_size,
                &notices,
                None,
            ),
            applications: build::<Application, ApplicationFilters>(
                ViewKind::Applications,
                Arc::new(applications),
                page_size,
                &notices,
                None,
            ),
            interviews: build::<Interview, InterviewFilters>(
                ViewKind::Interviews,
                Arc::new(interviews),
                page_size,
                &notices,
                None,
            ),
            offers: build::<Offer, OfferFilters>(
                ViewKind::Offers,
                Arc::new(offers),
                page_size,
                &notices,
                None,
            ),
            notices,
        }
    }

    pub fn notices(&self) -> &NoticeBus {
        &self.notices
    }
}

fn http_source<T, F>(
    client: &Arc<HttpClient>,
    config: &Config,
    view: ViewKind,
) -> Arc<dyn PageSource<T, F>>
where
    T: Row,
    F: Filters,
    HttpPageSource<T>: PageSource<T, F>,
{
    Arc::new(HttpPageSource::new(client.clone(), config.views.resource(view)))
}

fn build<T, F>(
    view: ViewKind,
    source: Arc<dyn PageSource<T, F>>,
    page_size: Option<usize>,
    notices: &NoticeBus,
    session: Option<Arc<dyn SessionRefresher>>,
) -> Arc<PageSlice<T, F>>
where
    T: Row,
    F: Filters,
{
    let mut slice = PageSlice::new(view.name(), source, F::default(), page_size)
        .with_notices(notices.clone());
    if let Some(session) = session {
        slice = slice.with_session(session);
    }
    if let Some(message) = view.not_found_message() {
        slice = slice.with_not_found_message(message);
    }
    Arc::new(slice)
}
