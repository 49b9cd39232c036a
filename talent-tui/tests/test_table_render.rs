//! Rendering of list views into a test terminal

use libtalentgrid::demo;
use libtalentgrid::paging::PageState;
use libtalentgrid::types::{EmploymentType, Job, JobStatus};
use libtalentgrid::views::{JobFilters, OfferFilters, ViewKind};
use libtalentgrid::{Identity, Role};
use ratatui::{backend::TestBackend, Terminal};
use talent_tui::app::{reduce, Action, AppState, Effect};
use talent_tui::ui::{self, columns, table::table_model, table::DisplayRow, table::TableReport};

fn screen(terminal: &Terminal<TestBackend>) -> String {
    let buffer = terminal.backend().buffer();
    let mut out = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            out.push_str(buffer.get(x, y).symbol());
        }
        out.push('\n');
    }
    out
}

fn draw(state: &AppState) -> (String, TableReport) {
    let mut terminal = Terminal::new(TestBackend::new(140, 20)).unwrap();
    let mut report = TableReport::default();
    terminal
        .draw(|frame| {
            report = ui::render(frame, state);
        })
        .unwrap();
    (screen(&terminal), report)
}

fn jobs_page(items: Vec<Job>, is_loading: bool, has_more: bool) -> PageState<Job, JobFilters> {
    let mut page = PageState::new(JobFilters::default(), Some(5));
    page.items = items;
    page.is_loading = is_loading;
    page.has_more = has_more;
    page
}

fn lyon_job() -> Job {
    Job {
        id: "job-lyon".to_string(),
        title: "Backend Engineer".to_string(),
        company_name: "Acme".to_string(),
        country: "France".to_string(),
        city: "Lyon".to_string(),
        employment_type: EmploymentType::FullTime,
        status: JobStatus::Open,
        salary: None,
        posted_at: "2025-10-03".to_string(),
    }
}

#[test]
fn test_empty_idle_list_shows_placeholder() {
    let model = table_model(&columns::jobs(), &jobs_page(vec![], false, true));
    assert_eq!(
        model.rows,
        vec![DisplayRow::Placeholder("No data".to_string()), DisplayRow::Sentinel]
    );
}

#[test]
fn test_first_load_shows_only_loading_row() {
    let model = table_model(&columns::jobs(), &jobs_page(vec![], true, true));
    assert_eq!(model.rows, vec![DisplayRow::Loading, DisplayRow::Sentinel]);
}

#[test]
fn test_loading_row_follows_data() {
    let model = table_model(&columns::jobs(), &jobs_page(demo::jobs(3), true, true));
    assert_eq!(model.data_len(), 3);
    assert_eq!(model.rows[3], DisplayRow::Loading);
    assert_eq!(model.rows[4], DisplayRow::Sentinel);
}

#[test]
fn test_exhausted_list_ends_with_footer() {
    let model = table_model(&columns::jobs(), &jobs_page(demo::jobs(2), false, false));
    assert_eq!(model.rows[2], DisplayRow::EndOfList);
    assert_eq!(model.sentinel_index(), 3);
}

#[test]
fn test_exhausted_empty_list_has_no_footer() {
    let model = table_model(&columns::jobs(), &jobs_page(vec![], false, false));
    assert!(!model.rows.contains(&DisplayRow::EndOfList));
    assert!(matches!(model.rows[0], DisplayRow::Placeholder(_)));
}

#[test]
fn test_computed_columns() {
    let model = table_model(&columns::jobs(), &jobs_page(vec![lyon_job()], false, true));

    match &model.rows[0] {
        DisplayRow::Data(cells) => {
            assert_eq!(cells[0], "Backend Engineer");
            assert_eq!(cells[2], "France, Lyon");
            assert_eq!(cells[3], "FullTime");
            assert_eq!(cells[4], "-");
        }
        other => panic!("expected data row, got {:?}", other),
    }
}

#[test]
fn test_headers_match_columns() {
    let page: PageState<_, OfferFilters> = PageState::new(OfferFilters::default(), Some(5));
    let model = table_model(&columns::offers(), &page);
    assert_eq!(
        model.headers,
        vec!["Candidate", "Job", "Salary", "Status", "Expires"]
    );
}

#[test]
fn test_render_placeholder_screen() {
    let (text, report) = draw(&AppState::new());

    assert!(text.contains("No data"));
    assert!(text.contains("F2 Jobs"));
    assert_eq!(report.sentinel_visibility, 1.0);
}

#[test]
fn test_render_rows_and_footer() {
    let state = reduce(
        AppState::new(),
        Action::JobsUpdated(jobs_page(vec![lyon_job()], false, false)),
    );
    let (text, _) = draw(&state);

    assert!(text.contains("Backend Engineer"));
    assert!(text.contains("France, Lyon"));
    assert!(text.contains("No more data"));
    assert!(!text.contains("Loading..."));
}

#[test]
fn test_render_loading_row() {
    let state = reduce(
        AppState::new(),
        Action::JobsUpdated(jobs_page(demo::jobs(2), true, true)),
    );
    let (text, _) = draw(&state);

    assert!(text.contains("Loading..."));
    assert!(!text.contains("No data"));
}

#[test]
fn test_title_bar_shows_identity_and_filters() {
    let state = reduce(
        AppState::new(),
        Action::IdentityLoaded(Some(Identity {
            user_id: "u1".to_string(),
            user_name: "Ada".to_string(),
            user_role: Role::Recruiter,
            user_image: None,
        })),
    );
    let (text, _) = draw(&state);

    assert!(text.contains("Ada (Recruiter)"));
    assert!(text.contains("status: all | sort: newest"));
}

#[test]
fn test_long_list_hides_sentinel_until_scrolled() {
    let state = reduce(
        AppState::new(),
        Action::JobsUpdated(jobs_page(demo::jobs(30), false, true)),
    );
    let (_, report) = draw(&state);
    assert_eq!(report.offset, 0);
    assert_eq!(report.sentinel_visibility, 0.0);

    let mut state = state;
    state.jobs.selected = 29;
    let (_, report) = draw(&state);
    assert!(report.offset > 0);
    assert_eq!(report.sentinel_visibility, 1.0);
}

#[test]
fn test_rendered_report_drives_first_fetch() {
    let state = AppState::new();
    let (_, report) = draw(&state);

    let mut state = reduce(
        state,
        Action::Viewport {
            view: ViewKind::Jobs,
            offset: report.offset,
            sentinel_visibility: report.sentinel_visibility,
        },
    );
    assert!(matches!(
        state.take_effects().as_slice(),
        [Effect::Fetch(ViewKind::Jobs)]
    ));
}
