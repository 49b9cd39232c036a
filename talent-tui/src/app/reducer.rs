//! Pure reducer: `(AppState, Action) -> AppState`
//!
//! No I/O happens here. Anything that needs the page slices is queued in
//! `AppState::effects` and performed by the event loop.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use libtalentgrid::views::{
    cycle_status, ApplicationFilterPatch, InterviewFilterPatch, JobFilterPatch,
    OfferFilterPatch, ViewKind, APPLICATION_STATUSES, INTERVIEW_STATUSES, JOB_STATUSES,
    OFFER_STATUSES,
};
use libtalentgrid::{Notice, NoticeLevel};

use super::actions::{Action, Effect, FilterChange};
use super::state::{AppState, StatusBarState};

pub fn reduce(state: AppState, action: Action) -> AppState {
    match action {
        // === UI Events ===
        Action::Key(key) => handle_key(state, key),
        Action::Tick => state,
        Action::Resize(_, _) => state,

        // === Navigation ===
        Action::NavigateTo(view) => navigate(state, view),

        Action::Quit => AppState {
            should_quit: true,
            ..state
        },

        Action::ShowHelp => AppState {
            help_visible: true,
            ..state
        },

        Action::HideHelp => AppState {
            help_visible: false,
            ..state
        },

        // === List interaction ===
        Action::SelectNext => move_selection(state, 1),
        Action::SelectPrevious => move_selection(state, -1),

        Action::LoadMore => {
            let mut state = state;
            if state.current().can_load_more() {
                let view = state.current_view;
                state.effects.push(Effect::Fetch(view));
            }
            state
        }

        Action::CycleStatus => next_status_filter(state),
        Action::ToggleSort => toggle_sort(state),

        Action::Refresh => {
            let mut state = state;
            let view = state.current_view;
            state.effects.push(Effect::Refresh(view));
            state
        }

        Action::RemoveSelected => {
            let mut state = state;
            let view = state.current_view;
            if let Some(id) = state.current().selected_id() {
                state.effects.push(Effect::Remove { view, id });
            }
            state
        }

        Action::Viewport {
            view,
            offset,
            sentinel_visibility,
        } => {
            let mut state = state;
            if view != state.current_view {
                return state;
            }
            let list = state.list_mut(view);
            list.set_offset(offset);
            if list.observe_sentinel(sentinel_visibility) {
                state.effects.push(Effect::Fetch(view));
            }
            state
        }

        // === Slice updates ===
        Action::JobsUpdated(page) => {
            let mut state = state;
            state.jobs.apply(page);
            state
        }
        Action::ApplicationsUpdated(page) => {
            let mut state = state;
            state.applications.apply(page);
            state
        }
        Action::InterviewsUpdated(page) => {
            let mut state = state;
            state.interviews.apply(page);
            state
        }
        Action::OffersUpdated(page) => {
            let mut state = state;
            state.offers.apply(page);
            state
        }

        Action::Notice(notice) => apply_notice(state, notice),

        Action::IdentityLoaded(identity) => AppState { identity, ..state },

        // === Error Handling ===
        Action::ShowError(error) => AppState {
            error: Some(error),
            ..state
        },

        Action::DismissError => AppState { error: None, ..state },

        // === Status Bar ===
        Action::SetStatus(message) => AppState {
            status: StatusBarState {
                message: Some(message),
            },
            ..state
        },

        Action::ClearStatus => AppState {
            status: StatusBarState { message: None },
            ..state
        },
    }
}

/// Map keys to actions
fn handle_key(state: AppState, key: KeyEvent) -> AppState {
    // Global keybindings
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) => return reduce(state, Action::Quit),
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => return reduce(state, Action::Quit),

        (KeyCode::F(1), _) => {
            let action = if state.help_visible {
                Action::HideHelp
            } else {
                Action::ShowHelp
            };
            return reduce(state, action);
        }

        (KeyCode::F(2), _) => return reduce(state, Action::NavigateTo(ViewKind::Jobs)),
        (KeyCode::F(3), _) => return reduce(state, Action::NavigateTo(ViewKind::Applications)),
        (KeyCode::F(4), _) => return reduce(state, Action::NavigateTo(ViewKind::Interviews)),
        (KeyCode::F(5), _) => return reduce(state, Action::NavigateTo(ViewKind::Offers)),

        (KeyCode::Esc, _) if state.error.is_some() => return reduce(state, Action::DismissError),
        (KeyCode::Esc, _) if state.help_visible => return reduce(state, Action::HideHelp),

        _ => {}
    }

    if state.overlay_visible() {
        return state;
    }

    // List keybindings
    let action = match key.code {
        KeyCode::Char('j') | KeyCode::Down => Action::SelectNext,
        KeyCode::Char('k') | KeyCode::Up => Action::SelectPrevious,
        KeyCode::Char('n') => Action::LoadMore,
        KeyCode::Char('f') => Action::CycleStatus,
        KeyCode::Char('o') => Action::ToggleSort,
        KeyCode::Char('r') => Action::Refresh,
        KeyCode::Char('d') => Action::RemoveSelected,
        _ => return state,
    };
    reduce(state, action)
}

/// Switch views; the old view's sentinel is unmounted, the new one mounted
fn navigate(state: AppState, view: ViewKind) -> AppState {
    if view == state.current_view {
        return state;
    }
    let mut state = state;
    let previous = state.current_view;
    state.list_mut(previous).detach_sentinel();
    state.list_mut(view).remount_sentinel();
    AppState {
        current_view: view,
        status: StatusBarState { message: None },
        ..state
    }
}

fn move_selection(state: AppState, delta: i64) -> AppState {
    let mut state = state;
    let list = state.current_mut();
    let len = list.len();
    if len == 0 {
        return state;
    }
    let next = (list.selected() as i64 + delta).clamp(0, len as i64 - 1);
    list.select(next as usize);
    state
}

fn next_status_filter(state: AppState) -> AppState {
    let change = match state.current_view {
        ViewKind::Jobs => FilterChange::Jobs(JobFilterPatch {
            status: Some(cycle_status(state.jobs.page.filters.status, &JOB_STATUSES)),
            ..Default::default()
        }),
        ViewKind::Applications => FilterChange::Applications(ApplicationFilterPatch {
            status: Some(cycle_status(
                state.applications.page.filters.status,
                &APPLICATION_STATUSES,
            )),
            ..Default::default()
        }),
        ViewKind::Interviews => FilterChange::Interviews(InterviewFilterPatch {
            status: Some(cycle_status(
                state.interviews.page.filters.status,
                &INTERVIEW_STATUSES,
            )),
            ..Default::default()
        }),
        ViewKind::Offers => FilterChange::Offers(OfferFilterPatch {
            status: Some(cycle_status(state.offers.page.filters.status, &OFFER_STATUSES)),
            ..Default::default()
        }),
    };
    let mut state = state;
    state.effects.push(Effect::SetFilters(change));
    state
}

fn toggle_sort(state: AppState) -> AppState {
    let change = match state.current_view {
        ViewKind::Jobs => FilterChange::Jobs(JobFilterPatch {
            sort: Some(state.jobs.page.filters.sort.toggled()),
            ..Default::default()
        }),
        ViewKind::Applications => FilterChange::Applications(ApplicationFilterPatch {
            sort: Some(state.applications.page.filters.sort.toggled()),
            ..Default::default()
        }),
        ViewKind::Interviews => FilterChange::Interviews(InterviewFilterPatch {
            sort: Some(state.interviews.page.filters.sort.toggled()),
            ..Default::default()
        }),
        ViewKind::Offers => FilterChange::Offers(OfferFilterPatch {
            sort: Some(state.offers.page.filters.sort.toggled()),
            ..Default::default()
        }),
    };
    let mut state = state;
    state.effects.push(Effect::SetFilters(change));
    state
}

/// Errors open the overlay; everything else goes to the status bar
fn apply_notice(state: AppState, notice: Notice) -> AppState {
    let title = notice
        .view()
        .parse::<ViewKind>()
        .map(|v| v.title().to_string())
        .unwrap_or_else(|_| notice.view().to_string());
    let text = format!("{}: {}", title, notice.message());

    match notice.level() {
        NoticeLevel::Error => AppState {
            error: Some(notice.message()),
            status: StatusBarState {
                message: Some(text),
            },
            ..state
        },
        NoticeLevel::Info | NoticeLevel::Warning => AppState {
            status: StatusBarState {
                message: Some(text),
            },
            ..state
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libtalentgrid::paging::PageState;
    use libtalentgrid::types::OfferStatus;
    use libtalentgrid::views::SortOrder;

    fn loaded_offers(state: AppState, count: usize, has_more: bool) -> AppState {
        let mut page = PageState::new(Default::default(), Some(5));
        page.items = libtalentgrid::demo::offers(count);
        page.page = 2;
        page.has_more = has_more;
        reduce(state, Action::OffersUpdated(page))
    }

    #[test]
    fn test_reducer_is_pure() {
        let state = AppState::new();
        let new_state = reduce(state.clone(), Action::SetStatus("Test".to_string()));

        assert!(state.status.message.is_none());
        assert_eq!(new_state.status.message, Some("Test".to_string()));
    }

    #[test]
    fn test_cycle_status_queues_filter_change() {
        let mut state = AppState::new();
        state.current_view = ViewKind::Offers;

        let mut state = reduce(state, Action::CycleStatus);
        let effects = state.take_effects();

        assert_eq!(effects.len(), 1);
        match &effects[0] {
            Effect::SetFilters(FilterChange::Offers(patch)) => {
                assert_eq!(patch.status, Some(Some(OfferStatus::Pending)));
                assert!(patch.sort.is_none());
            }
            other => panic!("unexpected effect: {:?}", other),
        }
    }

    #[test]
    fn test_toggle_sort_uses_current_filters() {
        let mut state = AppState::new();
        state.jobs.page.filters.sort = SortOrder::Oldest;

        let mut state = reduce(state, Action::ToggleSort);
        match state.take_effects().as_slice() {
            [Effect::SetFilters(FilterChange::Jobs(patch))] => {
                assert_eq!(patch.sort, Some(SortOrder::Newest));
            }
            other => panic!("unexpected effects: {:?}", other),
        }
    }

    #[test]
    fn test_update_clamps_selection() {
        let mut state = AppState::new();
        state.current_view = ViewKind::Offers;
        let mut state = loaded_offers(state, 5, true);
        state.offers.selected = 4;

        let mut page = state.offers.page.clone();
        page.items.truncate(2);
        let state = reduce(state, Action::OffersUpdated(page));

        assert_eq!(state.offers.selected, 1);
    }

    #[test]
    fn test_error_notice_opens_overlay() {
        let state = AppState::new();
        let state = reduce(
            state,
            Action::Notice(Notice::SessionExpired {
                view: "interviews".to_string(),
                message: "Your session has expired. Please sign in again.".to_string(),
            }),
        );

        assert_eq!(
            state.error.as_deref(),
            Some("Your session has expired. Please sign in again.")
        );
        assert!(state
            .status
            .message
            .unwrap()
            .starts_with("Interviews: "));
    }

    #[test]
    fn test_info_notice_goes_to_status_bar() {
        let state = reduce(
            AppState::new(),
            Action::Notice(Notice::RowsRemoved {
                view: "jobs".to_string(),
                count: 1,
            }),
        );
        assert!(state.error.is_none());
        assert_eq!(state.status.message.as_deref(), Some("Jobs: Removed 1 row(s)"));
    }
}
