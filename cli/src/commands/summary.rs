//! Dashboard summary command.

use anyhow::{Context as _, Result};
use procure_business::format::{format_number, format_rupiah};
use procure_business::{Page, PageController, Status, Summary, ViewKind};
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing::instrument;

use crate::context::AppContext;
use crate::output::Output;

#[derive(Tabled)]
struct StatusRow {
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "Requests")]
    count: usize,
}

fn status_rows(summary: &Summary) -> Vec<StatusRow> {
    let mut rows: Vec<StatusRow> = Status::ALL
        .into_iter()
        .map(|status| StatusRow {
            status: status.as_str(),
            count: summary.count(status),
        })
        .collect();
    if summary.unknown_status > 0 {
        rows.push(StatusRow {
            status: "unknown",
            count: summary.unknown_status,
        });
    }
    rows
}

#[instrument(skip_all, name = "summary")]
pub async fn run_summary(ctx: &AppContext) -> Result<()> {
    let out = Output::new();
    ctx.require_page(Page::Dashboard)?;

    // The recap view is unfiltered, so it carries every record.
    let mut controller =
        PageController::new(&ctx.api, ViewKind::Recap, ctx.business().display_offset());
    controller
        .load()
        .await
        .context("Failed to load requests")?;
    let summary = Summary::from_records(controller.state().records());

    let mut table = Table::new(status_rows(&summary));
    table.with(Style::rounded());
    out.header("Dashboard");
    out.print(table.to_string());
    out.labeled_indent("Total requests", summary.total, 2);
    out.labeled_indent("Total quantity", format_number(&summary.total_qty.to_string()), 2);
    out.labeled_indent(
        "Total nominal",
        format_rupiah(&summary.total_nominal.to_string()),
        2,
    );
    Ok(())
}
