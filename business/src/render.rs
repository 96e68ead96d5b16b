//! Cell formatting and the rendered table model.
//!
//! [`RenderedTable`] is front-end neutral: the CLI draws it with `tabled`,
//! browser hosts take [`RenderedTable::to_html`].

use chrono::FixedOffset;
use ustr::Ustr;

use crate::format::{format_date, format_datetime, format_number, format_rupiah, truncate};
use crate::record::field;
use crate::view::{ColumnKind, RowActionKind, ViewConfig};
use crate::Record;

/// Header label of the synthetic action column.
pub const ACTION_HEADER: &str = "Action";

/// Characters kept from long free-text cells.
pub const TRUNCATE_CHARS: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

impl Align {
    fn css_class(self) -> &'static str {
        match self {
            Self::Left => "",
            Self::Center => "text-center",
            Self::Right => "text-right",
        }
    }
}

/// A clickable action bound to one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowAction {
    pub kind: RowActionKind,
    pub id: Ustr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text { value: String, align: Align },
    /// Status badge; `class` is the lowercased raw status.
    Badge { text: String, class: String },
    /// Shortened text with the full value kept for a tooltip.
    Truncated { display: String, full: String },
    Actions(Vec<RowAction>),
}

impl Cell {
    /// Text shown in the cell, without decoration.
    pub fn display_text(&self) -> String {
        match self {
            Self::Text { value, .. } => value.clone(),
            Self::Badge { text, .. } => text.clone(),
            Self::Truncated { display, .. } => display.clone(),
            Self::Actions(actions) => actions
                .iter()
                .map(|a| a.kind.label())
                .collect::<Vec<_>>()
                .join(" / "),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableBody {
    Rows(Vec<Vec<Cell>>),
    /// Nothing on this page: a single row spanning `colspan` columns.
    Empty { message: String, colspan: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTable {
    pub headers: Vec<Ustr>,
    pub body: TableBody,
}

impl RenderedTable {
    pub fn is_empty(&self) -> bool {
        matches!(self.body, TableBody::Empty { .. })
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        match &self.body {
            TableBody::Rows(rows) => rows,
            TableBody::Empty { .. } => &[],
        }
    }

    pub fn to_html(&self) -> String {
        let mut html = String::from("<table>\n<thead><tr>");
        for header in &self.headers {
            html.push_str(&format!("<th>{}</th>", escape_html(header)));
        }
        html.push_str("</tr></thead>\n<tbody>\n");

        match &self.body {
            TableBody::Empty { message, colspan } => {
                html.push_str(&format!(
                    "<tr><td colspan=\"{colspan}\" class=\"text-center\">{}</td></tr>\n",
                    escape_html(message)
                ));
            }
            TableBody::Rows(rows) => {
                for row in rows {
                    html.push_str("<tr>");
                    for cell in row {
                        html.push_str(&cell_html(cell));
                    }
                    html.push_str("</tr>\n");
                }
            }
        }

        html.push_str("</tbody>\n</table>");
        html
    }
}

fn cell_html(cell: &Cell) -> String {
    match cell {
        Cell::Text { value, align } => {
            let value = escape_html(value);
            match align.css_class() {
                "" => format!("<td title=\"{value}\">{value}</td>"),
                class => format!("<td class=\"{class}\" title=\"{value}\">{value}</td>"),
            }
        }
        Cell::Badge { text, class } => format!(
            "<td class=\"text-center\"><span class=\"status {}\">{}</span></td>",
            escape_html(class),
            escape_html(text)
        ),
        Cell::Truncated { display, full } => format!(
            "<td class=\"truncate\" title=\"{}\">{}</td>",
            escape_html(full),
            escape_html(display)
        ),
        Cell::Actions(actions) => {
            let buttons: String = actions
                .iter()
                .map(|action| {
                    format!(
                        "<button data-action=\"{}\" data-id=\"{}\">{}</button>",
                        action.kind.as_str(),
                        escape_html(&action.id),
                        action.kind.label()
                    )
                })
                .collect();
            format!("<td class=\"text-center\">{buttons}</td>")
        }
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Header row: visible columns with the action column right after `ID`.
///
/// Without an `ID` column the action column leads.
pub fn header_row(config: &ViewConfig, columns: &[Ustr]) -> Vec<Ustr> {
    let mut headers = columns.to_vec();
    if config.has_actions() {
        let at = columns
            .iter()
            .position(|c| c.as_str() == field::ID)
            .map_or(0, |i| i + 1);
        headers.insert(at, Ustr::from(ACTION_HEADER));
    }
    headers
}

/// Format one cell of `record` for display.
pub fn format_cell(record: &Record, column: &str, offset: FixedOffset) -> Cell {
    let raw = record.text(column);
    match ColumnKind::of(column) {
        ColumnKind::DateTime => Cell::Text {
            value: format_datetime(&raw, offset),
            align: Align::Center,
        },
        ColumnKind::Date => Cell::Text {
            value: format_date(&raw, offset),
            align: Align::Center,
        },
        ColumnKind::Number => Cell::Text {
            value: format_number(&raw),
            align: Align::Right,
        },
        ColumnKind::Currency => Cell::Text {
            value: format_rupiah(&raw),
            align: Align::Right,
        },
        ColumnKind::Status => Cell::Badge {
            class: raw.trim().to_lowercase(),
            text: raw,
        },
        ColumnKind::LongText => Cell::Truncated {
            display: truncate(&raw, TRUNCATE_CHARS),
            full: raw,
        },
        ColumnKind::Plain => Cell::Text {
            value: raw,
            align: Align::Left,
        },
    }
}

/// Render one page of records.
pub fn render_page(
    config: &ViewConfig,
    columns: &[Ustr],
    records: &[&Record],
    offset: FixedOffset,
) -> RenderedTable {
    let headers = header_row(config, columns);

    if records.is_empty() {
        return RenderedTable {
            body: TableBody::Empty {
                message: config.empty_message.to_owned(),
                colspan: headers.len().max(1),
            },
            headers,
        };
    }

    let rows = records
        .iter()
        .map(|record| render_row(config, columns, record, offset))
        .collect();

    RenderedTable {
        headers,
        body: TableBody::Rows(rows),
    }
}

fn render_row(
    config: &ViewConfig,
    columns: &[Ustr],
    record: &Record,
    offset: FixedOffset,
) -> Vec<Cell> {
    let actions = || {
        let actions = record
            .id()
            .map(|id| {
                config
                    .actions
                    .iter()
                    .map(|&kind| RowAction { kind, id })
                    .collect()
            })
            .unwrap_or_default();
        Cell::Actions(actions)
    };

    let mut cells = Vec::with_capacity(columns.len() + 1);
    let has_id_column = columns.iter().any(|c| c.as_str() == field::ID);
    if config.has_actions() && !has_id_column {
        cells.push(actions());
    }
    for column in columns {
        cells.push(format_cell(record, column, offset));
        if config.has_actions() && column.as_str() == field::ID {
            cells.push(actions());
        }
    }
    cells
}
