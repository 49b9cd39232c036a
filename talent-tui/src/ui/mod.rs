//! UI rendering
//!
//! Rendering only reads state. The one thing it hands back is what the
//! frame showed of the current list (scroll offset, sentinel visibility),
//! which the event loop feeds to the reducer as `Action::Viewport`.

pub mod columns;
pub mod sentinel;
pub mod table;

use libtalentgrid::views::{SortOrder, ViewKind};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::AppState;
use table::{render_table, table_model, TableReport};

/// Render the whole screen and report the current list's viewport
pub fn render(frame: &mut Frame, state: &AppState) -> TableReport {
    let area = frame.size();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Min(4),    // List
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_title_bar(frame, chunks[0], state);
    let report = render_list(frame, chunks[1], state);
    render_status_bar(frame, chunks[2], state);

    if state.help_visible {
        render_help_overlay(frame, area);
    }

    if let Some(ref error) = state.error {
        render_error_overlay(frame, area, error);
    }

    report
}

fn render_list(frame: &mut Frame, area: Rect, state: &AppState) -> TableReport {
    let colors = state.config.colors_enabled;
    let title = state.current_view.title();

    match state.current_view {
        ViewKind::Jobs => {
            let view = &state.jobs;
            let model = table_model(&columns::jobs(), &view.page);
            render_table(frame, area, title, &model, view.selected, view.offset, colors)
        }
        ViewKind::Applications => {
            let view = &state.applications;
            let model = table_model(&columns::applications(), &view.page);
            render_table(frame, area, title, &model, view.selected, view.offset, colors)
        }
        ViewKind::Interviews => {
            let view = &state.interviews;
            let model = table_model(&columns::interviews(), &view.page);
            render_table(frame, area, title, &model, view.selected, view.offset, colors)
        }
        ViewKind::Offers => {
            let view = &state.offers;
            let model = table_model(&columns::offers(), &view.page);
            render_table(frame, area, title, &model, view.selected, view.offset, colors)
        }
    }
}

/// "status: Open | sort: newest" for the current view
pub fn filter_summary(state: &AppState) -> String {
    fn describe<S: std::fmt::Debug>(status: Option<S>, sort: SortOrder) -> String {
        let status = status
            .map(|s| format!("{:?}", s))
            .unwrap_or_else(|| "all".to_string());
        let sort = match sort {
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
        };
        format!("status: {} | sort: {}", status, sort)
    }

    match state.current_view {
        ViewKind::Jobs => {
            let f = &state.jobs.page.filters;
            describe(f.status, f.sort)
        }
        ViewKind::Applications => {
            let f = &state.applications.page.filters;
            describe(f.status, f.sort)
        }
        ViewKind::Interviews => {
            let f = &state.interviews.page.filters;
            describe(f.status, f.sort)
        }
        ViewKind::Offers => {
            let f = &state.offers.page.filters;
            describe(f.status, f.sort)
        }
    }
}

fn render_title_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let accent = if state.config.colors_enabled {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };

    let tabs: Vec<Span> = ViewKind::ALL
        .iter()
        .enumerate()
        .map(|(i, view)| {
            let label = format!(" F{} {} ", i + 2, view.title());
            if *view == state.current_view {
                Span::styled(label, accent.add_modifier(Modifier::REVERSED))
            } else {
                Span::raw(label)
            }
        })
        .collect();

    let mut spans = vec![Span::styled("Talentgrid ", accent)];
    spans.extend(tabs);
    spans.push(Span::raw(format!(" {} ", filter_summary(state))));
    if let Some(identity) = &state.identity {
        spans.push(Span::raw(format!("| {}", identity.label())));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let hints = "j/k: Move | n: More | f: Status | o: Sort | r: Refresh | d: Remove | F1: Help | q: Quit";
    let text = match &state.status.message {
        Some(message) => format!("{} | {}", message, hints),
        None => hints.to_string(),
    };

    let style = if state.config.colors_enabled {
        Style::default().fg(Color::Gray)
    } else {
        Style::default()
    };
    frame.render_widget(Paragraph::new(text).style(style), area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Views:"),
        Line::from("  F2       - Jobs"),
        Line::from("  F3       - Applications"),
        Line::from("  F4       - Interviews"),
        Line::from("  F5       - Offers"),
        Line::from(""),
        Line::from("Lists:"),
        Line::from("  j/k      - Move selection"),
        Line::from("  n        - Load more"),
        Line::from("  f        - Cycle status filter"),
        Line::from("  o        - Toggle sort order"),
        Line::from("  r        - Refresh"),
        Line::from("  d        - Remove selected row"),
        Line::from(""),
        Line::from("  q        - Quit"),
        Line::from("  Esc / F1 - Close"),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(Clear, popup_area);
    frame.render_widget(help, popup_area);
}

fn render_error_overlay(frame: &mut Frame, area: Rect, error: &str) {
    let popup_area = centered_rect(70, 30, area);

    let error_text = vec![
        Line::from(Span::styled(
            "Error",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(error),
        Line::from(""),
        Line::from("Press Esc to dismiss"),
    ];

    let error_widget = Paragraph::new(error_text)
        .block(
            Block::default()
                .title(" Error ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
        .wrap(Wrap { trim: false })
        .alignment(Alignment::Center);

    frame.render_widget(Clear, popup_area);
    frame.render_widget(error_widget, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
