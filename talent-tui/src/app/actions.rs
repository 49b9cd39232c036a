//! Actions and effects
//!
//! Actions describe what happened; the reducer turns them into a new state.
//! Effects are the work the reducer asks the event loop to perform against
//! the page slices (the reducer itself never touches the network).

use crossterm::event::KeyEvent;
use libtalentgrid::paging::PageState;
use libtalentgrid::types::{Application, Interview, Job, Offer};
use libtalentgrid::views::{
    ApplicationFilterPatch, ApplicationFilters, InterviewFilterPatch, InterviewFilters,
    JobFilterPatch, JobFilters, OfferFilterPatch, OfferFilters, ViewKind,
};
use libtalentgrid::{Identity, Notice};

#[derive(Debug, Clone)]
pub enum Action {
    // === UI Events ===
    Key(KeyEvent),
    Tick,
    Resize(u16, u16),

    // === Navigation ===
    NavigateTo(ViewKind),
    Quit,
    ShowHelp,
    HideHelp,

    // === List interaction ===
    SelectNext,
    SelectPrevious,
    /// Explicit "load more", the fallback when the sentinel is unavailable
    LoadMore,
    CycleStatus,
    ToggleSort,
    Refresh,
    RemoveSelected,

    /// What the last frame showed of a view
    Viewport {
        view: ViewKind,
        offset: usize,
        sentinel_visibility: f32,
    },

    // === Slice updates ===
    JobsUpdated(PageState<Job, JobFilters>),
    ApplicationsUpdated(PageState<Application, ApplicationFilters>),
    InterviewsUpdated(PageState<Interview, InterviewFilters>),
    OffersUpdated(PageState<Offer, OfferFilters>),
    Notice(Notice),

    IdentityLoaded(Option<Identity>),

    // === Error Handling ===
    ShowError(String),
    DismissError,

    // === Status Bar ===
    SetStatus(String),
    ClearStatus,
}

/// Filter patch addressed to one view
#[derive(Debug, Clone)]
pub enum FilterChange {
    Jobs(JobFilterPatch),
    Applications(ApplicationFilterPatch),
    Interviews(InterviewFilterPatch),
    Offers(OfferFilterPatch),
}

impl FilterChange {
    pub fn view(&self) -> ViewKind {
        match self {
            FilterChange::Jobs(_) => ViewKind::Jobs,
            FilterChange::Applications(_) => ViewKind::Applications,
            FilterChange::Interviews(_) => ViewKind::Interviews,
            FilterChange::Offers(_) => ViewKind::Offers,
        }
    }
}

/// Work requested by the reducer
#[derive(Debug, Clone)]
pub enum Effect {
    Fetch(ViewKind),
    Refresh(ViewKind),
    SetFilters(FilterChange),
    Remove { view: ViewKind, id: String },
}
