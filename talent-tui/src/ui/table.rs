//! Generic list renderer
//!
//! `table_model` turns a page state and a column set into display rows
//! without touching the terminal, so the display rules can be tested on
//! their own. `render_table` draws a model and reports the sentinel's
//! visibility back to the caller.

use libtalentgrid::paging::PageState;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};
use serde::Serialize;
use serde_json::Value;

pub const PLACEHOLDER: &str = "No data";
pub const LOADING: &str = "Loading...";
pub const END_OF_LIST: &str = "No more data";

/// One column of a list view
pub struct Column<T> {
    /// Field of the serialized row shown when `render` is absent
    pub key: &'static str,
    pub header: &'static str,
    pub width: u16,
    pub render: Option<fn(&T) -> String>,
}

impl<T> Column<T> {
    pub fn field(key: &'static str, header: &'static str, width: u16) -> Self {
        Self {
            key,
            header,
            width,
            render: None,
        }
    }

    pub fn computed(
        key: &'static str,
        header: &'static str,
        width: u16,
        render: fn(&T) -> String,
    ) -> Self {
        Self {
            key,
            header,
            width,
            render: Some(render),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayRow {
    Placeholder(String),
    Data(Vec<String>),
    Loading,
    EndOfList,
    Sentinel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableModel {
    pub headers: Vec<String>,
    pub widths: Vec<u16>,
    pub rows: Vec<DisplayRow>,
}

impl TableModel {
    /// Index of the sentinel row (always the last one)
    pub fn sentinel_index(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    pub fn data_len(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| matches!(r, DisplayRow::Data(_)))
            .count()
    }
}

/// What the last frame showed
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TableReport {
    /// First model row drawn
    pub offset: usize,
    /// Fraction of the sentinel row inside the viewport
    pub sentinel_visibility: f32,
}

/// Compute display rows in priority order
///
/// Empty and idle shows the placeholder; otherwise the data rows, then a
/// loading row while a fetch is in flight, then the end-of-list footer once
/// the epoch is exhausted. The sentinel always comes last.
pub fn table_model<T: Serialize, F>(columns: &[Column<T>], state: &PageState<T, F>) -> TableModel {
    let mut rows = Vec::with_capacity(state.items.len() + 2);

    if state.items.is_empty() && !state.is_loading {
        rows.push(DisplayRow::Placeholder(PLACEHOLDER.to_string()));
    } else {
        rows.extend(
            state
                .items
                .iter()
                .map(|item| DisplayRow::Data(cells(columns, item))),
        );
        if state.is_loading {
            rows.push(DisplayRow::Loading);
        }
        if !state.has_more && !state.items.is_empty() {
            rows.push(DisplayRow::EndOfList);
        }
    }
    rows.push(DisplayRow::Sentinel);

    TableModel {
        headers: columns.iter().map(|c| c.header.to_string()).collect(),
        widths: columns.iter().map(|c| c.width).collect(),
        rows,
    }
}

fn cells<T: Serialize>(columns: &[Column<T>], item: &T) -> Vec<String> {
    // Serialize once per row, and only if some column needs it
    let needs_value = columns.iter().any(|c| c.render.is_none());
    let value = if needs_value {
        serde_json::to_value(item).unwrap_or(Value::Null)
    } else {
        Value::Null
    };

    columns
        .iter()
        .map(|column| match column.render {
            Some(render) => render(item),
            None => cell_text(value.get(column.key)),
        })
        .collect()
}

/// Text of a serialized field
pub fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// First row to draw so that `selected` stays in view
///
/// Selecting the last data row scrolls far enough to show the rows after
/// it, including the sentinel.
pub fn scroll_offset(model: &TableModel, selected: usize, offset: usize, height: usize) -> usize {
    if height == 0 {
        return offset;
    }
    let last = model.rows.len().saturating_sub(1);
    let data_len = model.data_len();
    let bottom = if data_len == 0 || selected + 1 >= data_len {
        last
    } else {
        selected
    };
    let top = selected.min(bottom);

    let mut offset = offset.min(last);
    if top < offset {
        offset = top;
    }
    if bottom >= offset + height {
        offset = bottom + 1 - height;
    }
    // Never leave a selected data row above the viewport
    if top < offset {
        offset = top;
    }
    offset
}

/// Fraction of row `index` inside rows `offset..offset + height`
pub fn row_visibility(index: usize, offset: usize, height: usize) -> f32 {
    if index >= offset && index < offset + height {
        1.0
    } else {
        0.0
    }
}

/// Draw a model inside a bordered block
pub fn render_table(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    model: &TableModel,
    selected: usize,
    offset: usize,
    colors: bool,
) -> TableReport {
    // Borders plus the header line
    let height = area.height.saturating_sub(3) as usize;
    let offset = scroll_offset(model, selected, offset, height);

    let dim = if colors {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };
    let columns = model.headers.len().max(1);

    let rows: Vec<Row> = model
        .rows
        .iter()
        .map(|row| match row {
            DisplayRow::Data(values) => Row::new(values.iter().map(|v| Cell::from(v.clone()))),
            DisplayRow::Placeholder(text) => Row::new(vec![Cell::from(text.clone())]).style(dim),
            DisplayRow::Loading => {
                let style = if colors {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                };
                Row::new(vec![Cell::from(LOADING)]).style(style)
            }
            DisplayRow::EndOfList => Row::new(vec![Cell::from(END_OF_LIST)]).style(dim),
            DisplayRow::Sentinel => Row::new(vec![Cell::from("")]),
        })
        .collect();

    let widths: Vec<Constraint> = if model.widths.is_empty() {
        vec![Constraint::Percentage(100)]
    } else {
        model.widths.iter().map(|w| Constraint::Length(*w)).collect()
    };

    let header_style = Style::default().add_modifier(Modifier::BOLD);
    let highlight = if colors {
        Style::default().bg(Color::Blue).fg(Color::White)
    } else {
        Style::default().add_modifier(Modifier::REVERSED)
    };

    let table = Table::new(rows, widths)
        .header(Row::new(model.headers.clone()).style(header_style))
        .block(
            Block::default()
                .title(format!(" {} ", title))
                .borders(Borders::ALL),
        )
        .highlight_style(highlight)
        .column_spacing(if columns > 1 { 1 } else { 0 });

    let has_data = model.data_len() > 0;
    let mut table_state = TableState::default()
        .with_offset(offset)
        .with_selected(if has_data { Some(selected) } else { None });

    frame.render_stateful_widget(table, area, &mut table_state);

    TableReport {
        offset,
        sentinel_visibility: row_visibility(model.sentinel_index(), offset, height),
    }
}
