//! List a table view.

use anyhow::{Context as _, Result};
use inquire::Select;
use procure_business::{Cell, PageController, RowAction, ViewKind};
use tracing::instrument;

use crate::commands::request_actions::report_outcome;
use crate::context::AppContext;
use crate::dialog::InquireDialog;
use crate::output::Output;
use crate::table::draw;

pub struct ListArgs {
    pub view: ViewKind,
    pub search: Option<String>,
    pub page: usize,
    pub page_size: Option<usize>,
    pub html: bool,
    pub interactive: bool,
}

#[instrument(skip_all, name = "list", fields(view = %args.view, page = args.page))]
pub async fn run_list(ctx: &AppContext, args: ListArgs) -> Result<()> {
    let ListArgs {
        view,
        search,
        page,
        page_size,
        html,
        interactive,
    } = args;
    let out = Output::new();
    let (view, session) = ctx.resolve_view(view, &out)?;

    let mut controller =
        PageController::new(&ctx.api, view, ctx.business().display_offset());
    controller
        .load()
        .await
        .with_context(|| format!("Failed to load the {view} view"))?;

    if let Some(size) = page_size {
        controller.set_page_size(size);
    }
    if let Some(query) = &search {
        controller.search(query);
    }
    controller.set_page(page);

    let rendered = controller.render();
    if html {
        out.print(rendered.to_html());
        return Ok(());
    }

    out.header(controller.state().config().title);
    out.print(draw(&rendered));
    out.page_footer(
        controller.page_info(),
        controller.state().page(),
        controller.state().page_count(),
    );

    if !interactive {
        return Ok(());
    }

    let actions = row_actions(rendered.rows());
    if actions.is_empty() {
        out.dim("No actions on this page.");
        return Ok(());
    }

    let options: Vec<String> = actions
        .iter()
        .map(|a| format!("{} {}", a.kind.label(), a.id))
        .collect();
    let selection = Select::new("Select an action:", options)
        .with_help_message("Use arrow keys to navigate, Enter to select, Esc to quit")
        .raw_prompt_skippable()
        .context("Failed to select action")?;

    if let Some(choice) = selection {
        let action = actions[choice.index];
        let outcome = controller
            .run_action(action, &InquireDialog::new(), &session)
            .await;
        report_outcome(&out, &outcome)?;
    }
    Ok(())
}

/// Row actions of the rendered page, in row order.
fn row_actions(rows: &[Vec<Cell>]) -> Vec<RowAction> {
    rows.iter()
        .flatten()
        .filter_map(|cell| match cell {
            Cell::Actions(actions) => Some(actions.iter().copied()),
            _ => None,
        })
        .flatten()
        .collect()
}
