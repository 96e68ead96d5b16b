//! Draw a [`RenderedTable`] with `tabled`.

use procure_business::render::TableBody;
use procure_business::{Cell, RenderedTable};
use tabled::builder::Builder;
use tabled::settings::Style;

/// Terminal rendering of one page. Tooltips have no terminal counterpart, so
/// truncated cells show the shortened text only.
pub fn draw(table: &RenderedTable) -> String {
    let mut builder = Builder::default();
    builder.push_record(table.headers.iter().map(|h| h.as_str().to_owned()));

    match &table.body {
        TableBody::Rows(rows) => {
            for row in rows {
                builder.push_record(row.iter().map(cell_text));
            }
        }
        TableBody::Empty { message, .. } => {
            builder.push_record([message.clone()]);
        }
    }

    let mut drawn = builder.build();
    drawn.with(Style::rounded());
    drawn.to_string()
}

fn cell_text(cell: &Cell) -> String {
    match cell {
        Cell::Actions(actions) => actions
            .iter()
            .map(|a| a.kind.as_str())
            .collect::<Vec<_>>()
            .join(" "),
        other => other.display_text(),
    }
}
