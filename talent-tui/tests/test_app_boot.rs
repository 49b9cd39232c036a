//! Application defaults on startup

use libtalentgrid::views::ViewKind;
use serial_test::serial;
use talent_tui::app::AppState;
use talent_tui::ui::sentinel::SentinelMode;

#[test]
fn test_app_starts_on_jobs() {
    let state = AppState::new();

    assert_eq!(state.current_view, ViewKind::Jobs);
    assert!(!state.should_quit);
    assert!(!state.help_visible);
    assert!(state.error.is_none());
    assert!(state.identity.is_none());
}

#[test]
fn test_lists_start_unloaded() {
    let state = AppState::with_paging(Some(10), 1.0);

    for view in ViewKind::ALL {
        assert_eq!(state.list(view).len(), 0);
        assert!(state.list(view).can_load_more());
    }
    assert_eq!(state.offers.page.page, 1);
    assert_eq!(state.offers.page.page_size, Some(10));
}

#[test]
fn test_no_effects_on_boot() {
    let mut state = AppState::new();
    assert!(state.take_effects().is_empty());
}

#[test]
#[serial]
fn test_colors_disabled_with_no_color_env() {
    std::env::set_var("NO_COLOR", "1");
    let state = AppState::new();
    std::env::remove_var("NO_COLOR");

    assert!(!state.config.colors_enabled);
}

#[test]
#[serial]
fn test_tick_rate_from_env() {
    std::env::set_var("TALENT_TUI_TICK_MS", "250");
    let state = AppState::new();
    std::env::remove_var("TALENT_TUI_TICK_MS");

    assert_eq!(state.config.tick_rate_ms, 250);
}

#[test]
#[serial]
fn test_tick_rate_default_100ms() {
    std::env::remove_var("TALENT_TUI_TICK_MS");
    let state = AppState::new();

    assert_eq!(state.config.tick_rate_ms, 100);
}

#[test]
#[serial]
fn test_no_autoload_disables_sentinel() {
    std::env::set_var("TALENT_TUI_NO_AUTOLOAD", "1");
    let state = AppState::new();
    std::env::remove_var("TALENT_TUI_NO_AUTOLOAD");

    assert!(!state.config.auto_load);
    assert_eq!(state.jobs.sentinel.mode(), SentinelMode::Unavailable);
}

#[test]
#[serial]
fn test_threshold_reaches_sentinels() {
    std::env::remove_var("TALENT_TUI_NO_AUTOLOAD");
    let state = AppState::with_paging(Some(5), 0.9);

    assert_eq!(state.interviews.sentinel.threshold(), 0.9);
    assert_eq!(state.interviews.sentinel.mode(), SentinelMode::Active);
}
