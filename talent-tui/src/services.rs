//! Bridge between the async page slices and the synchronous event loop
//!
//! `ServiceHandle` owns a tokio runtime and the dashboard slices. Every
//! slice state change and every notice is forwarded over one crossbeam
//! channel as an `Action`, which the event loop drains between frames.
//! Effects queued by the reducer are spawned on the runtime.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use libtalentgrid::{Config, Dashboard, NoticeBus};
//! use libtalentgrid::views::ViewKind;
//! use talent_tui::app::Effect;
//! use talent_tui::services::ServiceHandle;
//!
//! # fn example() -> talent_tui::error::Result<()> {
//! let dashboard = Dashboard::demo(&Config::default(), NoticeBus::default(), Duration::ZERO);
//! let services = ServiceHandle::new(dashboard)?;
//! let updates = services.subscribe();
//!
//! services.execute(Effect::Fetch(ViewKind::Jobs));
//! while let Ok(action) = updates.try_recv() {
//!     // reduce(state, action)
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};
use libtalentgrid::paging::{Filters, PageSlice, PageState, Row};
use libtalentgrid::views::ViewKind;
use libtalentgrid::Dashboard;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::app::{Action, Effect, FilterChange};
use crate::error::Result;

pub struct ServiceHandle {
    dashboard: Dashboard,
    runtime: tokio::runtime::Runtime,
    tx: Sender<Action>,
    rx: Receiver<Action>,
}

impl ServiceHandle {
    /// Start the runtime and begin forwarding slice updates and notices
    ///
    /// # Errors
    ///
    /// Returns an error if the tokio runtime cannot be created.
    pub fn new(dashboard: Dashboard) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;

        let (tx, rx) = unbounded();
        let handle = Self {
            dashboard,
            runtime,
            tx,
            rx,
        };

        handle.forward(&handle.dashboard.jobs, Action::JobsUpdated);
        handle.forward(&handle.dashboard.applications, Action::ApplicationsUpdated);
        handle.forward(&handle.dashboard.interviews, Action::InterviewsUpdated);
        handle.forward(&handle.dashboard.offers, Action::OffersUpdated);
        handle.forward_notices();

        Ok(handle)
    }

    /// Receiver of slice updates and notices, as actions
    pub fn subscribe(&self) -> Receiver<Action> {
        self.rx.clone()
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    /// Perform one reducer effect
    ///
    /// Fetches run on the runtime and report back through the update
    /// channel; removal is synchronous.
    pub fn execute(&self, effect: Effect) {
        debug!("Executing {:?}", effect);
        let dashboard = &self.dashboard;

        match effect {
            Effect::Fetch(view) => match view {
                ViewKind::Jobs => self.spawn_fetch(&dashboard.jobs),
                ViewKind::Applications => self.spawn_fetch(&dashboard.applications),
                ViewKind::Interviews => self.spawn_fetch(&dashboard.interviews),
                ViewKind::Offers => self.spawn_fetch(&dashboard.offers),
            },
            Effect::Refresh(view) => match view {
                ViewKind::Jobs => self.spawn_refresh(&dashboard.jobs),
                ViewKind::Applications => self.spawn_refresh(&dashboard.applications),
                ViewKind::Interviews => self.spawn_refresh(&dashboard.interviews),
                ViewKind::Offers => self.spawn_refresh(&dashboard.offers),
            },
            Effect::SetFilters(change) => match change {
                FilterChange::Jobs(patch) => self.spawn_filters(&dashboard.jobs, patch),
                FilterChange::Applications(patch) => {
                    self.spawn_filters(&dashboard.applications, patch)
                }
                FilterChange::Interviews(patch) => self.spawn_filters(&dashboard.interviews, patch),
                FilterChange::Offers(patch) => self.spawn_filters(&dashboard.offers, patch),
            },
            Effect::Remove { view, id } => {
                let removed = match view {
                    ViewKind::Jobs => dashboard.jobs.remove_item(&id),
                    ViewKind::Applications => dashboard.applications.remove_item(&id),
                    ViewKind::Interviews => dashboard.interviews.remove_item(&id),
                    ViewKind::Offers => dashboard.offers.remove_item(&id),
                };
                debug!("Removed {} row(s) with id {} from {}", removed, id, view);
            }
        }
    }

    fn spawn_fetch<T: Row, F: Filters>(&self, slice: &Arc<PageSlice<T, F>>) {
        let slice = Arc::clone(slice);
        self.runtime.spawn(async move {
            slice.fetch_data().await;
        });
    }

    fn spawn_refresh<T: Row, F: Filters>(&self, slice: &Arc<PageSlice<T, F>>)
    where
        F::Patch: Default,
    {
        let slice = Arc::clone(slice);
        self.runtime.spawn(async move {
            slice.refresh().await;
        });
    }

    fn spawn_filters<T: Row, F: Filters>(&self, slice: &Arc<PageSlice<T, F>>, patch: F::Patch)
    where
        F::Patch: 'static,
    {
        let slice = Arc::clone(slice);
        self.runtime.spawn(async move {
            slice.set_filters(patch).await;
        });
    }

    /// Push every state change of `slice` into the update channel
    fn forward<T: Row, F: Filters>(
        &self,
        slice: &Arc<PageSlice<T, F>>,
        wrap: fn(PageState<T, F>) -> Action,
    ) {
        let mut rx = slice.subscribe();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            while rx.changed().await.is_ok() {
                let snapshot = rx.borrow_and_update().clone();
                if tx.send(wrap(snapshot)).is_err() {
                    break;
                }
            }
        });
    }

    fn forward_notices(&self) {
        let mut notices = self.dashboard.notices().subscribe();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            loop {
                match notices.recv().await {
                    Ok(notice) => {
                        if tx.send(Action::Notice(notice)).is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Notice receiver lagged, skipped {} notices", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{reduce, AppState};
    use libtalentgrid::{Config, NoticeBus};
    use std::time::Duration;

    #[test]
    fn test_fetch_effect_reports_back() {
        let dashboard = Dashboard::demo(&Config::default(), NoticeBus::default(), Duration::ZERO);
        let services = ServiceHandle::new(dashboard).unwrap();
        let updates = services.subscribe();

        services.execute(Effect::Fetch(ViewKind::Offers));

        let mut loaded = None;
        while let Ok(action) = updates.recv_timeout(Duration::from_secs(2)) {
            if let Action::OffersUpdated(page) = action {
                if !page.is_loading {
                    loaded = Some(page);
                    break;
                }
            }
        }
        assert_eq!(loaded.map(|p| p.items.len()), Some(5));
    }

    #[test]
    fn test_visible_sentinel_loads_second_page_after_fast_fetch() {
        let dashboard = Dashboard::demo(&Config::default(), NoticeBus::default(), Duration::ZERO);
        let services = ServiceHandle::new(dashboard).unwrap();
        let updates = services.subscribe();

        let viewport = Action::Viewport {
            view: ViewKind::Jobs,
            offset: 0,
            sentinel_visibility: 1.0,
        };
        let mut state = reduce(AppState::new(), viewport.clone());
        let effects = state.take_effects();
        assert!(matches!(effects.as_slice(), [Effect::Fetch(ViewKind::Jobs)]));
        services.execute(Effect::Fetch(ViewKind::Jobs));

        while let Ok(action) = updates.recv_timeout(Duration::from_secs(2)) {
            state = reduce(state, action);
            if state.jobs.page.items.len() == 5 && !state.jobs.page.is_loading {
                break;
            }
        }
        assert_eq!(state.jobs.page.items.len(), 5);

        let mut state = reduce(state, viewport);
        assert!(matches!(
            state.take_effects().as_slice(),
            [Effect::Fetch(ViewKind::Jobs)]
        ));
    }
}
