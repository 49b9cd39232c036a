//! Application state
//!
//! Single source of truth for the dashboard. Each view mirrors the latest
//! snapshot of its page slice plus the purely visual bits (selection,
//! scroll offset, sentinel).

use libtalentgrid::paging::{Filters, PageState, Row};
use libtalentgrid::types::{Application, Interview, Job, Offer};
use libtalentgrid::views::{
    ApplicationFilters, InterviewFilters, JobFilters, OfferFilters, ViewKind,
};
use libtalentgrid::Identity;

use super::actions::Effect;
use crate::ui::sentinel::ScrollSentinel;

/// One list view: slice snapshot plus selection and sentinel
#[derive(Debug, Clone)]
pub struct ListView<T, F> {
    pub page: PageState<T, F>,
    pub selected: usize,
    pub offset: usize,
    pub sentinel: ScrollSentinel,
}

impl<T: Row, F: Filters> ListView<T, F> {
    pub fn new(page_size: Option<usize>, sentinel: ScrollSentinel) -> Self {
        Self {
            page: PageState::new(F::default(), page_size),
            selected: 0,
            offset: 0,
            sentinel,
        }
    }

    /// Take a new slice snapshot
    pub fn apply(&mut self, page: PageState<T, F>) {
        self.sentinel.track_progress(page.epoch, page.page, page.items.len());
        if page.epoch != self.page.epoch {
            self.selected = 0;
            self.offset = 0;
        }
        self.page = page;
        self.selected = self.selected.min(self.page.items.len().saturating_sub(1));
    }

    pub fn selected_row(&self) -> Option<&T> {
        self.page.items.get(self.selected)
    }
}

/// Operations the reducer needs on whichever view is current
pub trait ListControl {
    fn len(&self) -> usize;
    fn selected(&self) -> usize;
    fn select(&mut self, index: usize);
    fn set_offset(&mut self, offset: usize);
    fn selected_id(&self) -> Option<String>;
    fn can_load_more(&self) -> bool;
    /// Feed one frame's sentinel visibility; `true` requests a fetch
    fn observe_sentinel(&mut self, visibility: f32) -> bool;
    fn detach_sentinel(&mut self);
    fn remount_sentinel(&mut self);
}

impl<T: Row, F: Filters> ListControl for ListView<T, F> {
    fn len(&self) -> usize {
        self.page.items.len()
    }

    fn selected(&self) -> usize {
        self.selected
    }

    fn select(&mut self, index: usize) {
        self.selected = index.min(self.len().saturating_sub(1));
    }

    fn set_offset(&mut self, offset: usize) {
        self.offset = offset;
    }

    fn selected_id(&self) -> Option<String> {
        self.selected_row().map(|row| row.row_id().to_string())
    }

    fn can_load_more(&self) -> bool {
        self.page.has_more && !self.page.is_loading
    }

    fn observe_sentinel(&mut self, visibility: f32) -> bool {
        self.sentinel
            .observe(visibility, self.page.has_more, self.page.is_loading)
    }

    fn detach_sentinel(&mut self) {
        self.sentinel.detach();
    }

    fn remount_sentinel(&mut self) {
        self.sentinel = self.sentinel.remount();
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub should_quit: bool,
    pub current_view: ViewKind,
    pub help_visible: bool,

    pub jobs: ListView<Job, JobFilters>,
    pub applications: ListView<Application, ApplicationFilters>,
    pub interviews: ListView<Interview, InterviewFilters>,
    pub offers: ListView<Offer, OfferFilters>,

    /// Signed-in user shown in the title bar
    pub identity: Option<Identity>,

    pub status: StatusBarState,

    /// Error overlay message
    pub error: Option<String>,

    pub config: UiConfig,

    /// Work for the event loop, drained after every reduce
    pub effects: Vec<Effect>,
}

#[derive(Debug, Clone, Default)]
pub struct StatusBarState {
    pub message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UiConfig {
    pub colors_enabled: bool,

    pub tick_rate_ms: u64,

    /// Load pages when the end of a list scrolls into view; when off, only
    /// the load-more key fetches
    pub auto_load: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        let colors_enabled =
            std::env::var("NO_COLOR").is_err() && std::env::var("TALENT_TUI_NO_COLOR").is_err();

        let tick_rate_ms = std::env::var("TALENT_TUI_TICK_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(100);

        let auto_load = std::env::var("TALENT_TUI_NO_AUTOLOAD").is_err();

        Self {
            colors_enabled,
            tick_rate_ms,
            auto_load,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_paging(Some(5), 1.0)
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State for lists of `page_size` rows and a sentinel `threshold`
    pub fn with_paging(page_size: Option<usize>, threshold: f32) -> Self {
        let config = UiConfig::default();
        let sentinel = if config.auto_load {
            ScrollSentinel::new(threshold)
        } else {
            ScrollSentinel::unavailable()
        };

        Self {
            should_quit: false,
            current_view: ViewKind::Jobs,
            help_visible: false,
            jobs: ListView::new(page_size, sentinel.clone()),
            applications: ListView::new(page_size, sentinel.clone()),
            interviews: ListView::new(page_size, sentinel.clone()),
            offers: ListView::new(page_size, sentinel),
            identity: None,
            status: StatusBarState::default(),
            error: None,
            config,
            effects: Vec::new(),
        }
    }

    pub fn list(&self, view: ViewKind) -> &dyn ListControl {
        match view {
            ViewKind::Jobs => &self.jobs,
            ViewKind::Applications => &self.applications,
            ViewKind::Interviews => &self.interviews,
            ViewKind::Offers => &self.offers,
        }
    }

    pub fn list_mut(&mut self, view: ViewKind) -> &mut dyn ListControl {
        match view {
            ViewKind::Jobs => &mut self.jobs,
            ViewKind::Applications => &mut self.applications,
            ViewKind::Interviews => &mut self.interviews,
            ViewKind::Offers => &mut self.offers,
        }
    }

    pub fn current(&self) -> &dyn ListControl {
        self.list(self.current_view)
    }

    pub fn current_mut(&mut self) -> &mut dyn ListControl {
        self.list_mut(self.current_view)
    }

    /// Whether an overlay is capturing keys
    pub fn overlay_visible(&self) -> bool {
        self.help_visible || self.error.is_some()
    }

    /// Hand pending effects to the event loop
    pub fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }
}
