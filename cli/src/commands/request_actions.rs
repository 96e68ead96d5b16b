//! Mutating commands: new, edit, approve, reject, done.

use anyhow::{Context as _, Result, bail};
use procure_business::{
    AbortReason, ActionOutcome, PageController, RowAction, RowActionKind, ViewKind,
};
use tracing::{info, instrument};
use ustr::Ustr;

use crate::context::AppContext;
use crate::dialog::InquireDialog;
use crate::output::Output;

/// View whose rows offer `kind`.
pub fn view_for(kind: RowActionKind) -> ViewKind {
    match kind {
        RowActionKind::Edit => ViewKind::Requests,
        RowActionKind::Approve | RowActionKind::Reject => ViewKind::Approval,
        RowActionKind::MarkDone => ViewKind::Done,
    }
}

#[instrument(skip_all, name = "new")]
pub async fn run_new(ctx: &AppContext) -> Result<()> {
    let out = Output::new();
    let view = ViewKind::Requests;
    let session = ctx.require_page(view.page())?;

    let mut controller =
        PageController::new(&ctx.api, view, ctx.business().display_offset());
    let outcome = controller.create(&InquireDialog::new(), &session).await;
    report_outcome(&out, &outcome)?;

    if outcome.needs_reload() {
        out.dim(format!("{} requests now listed", controller.state().total()));
    }
    Ok(())
}

/// Run `kind` on the row `id` of the view that offers it.
#[instrument(skip_all, name = "row_action", fields(action = kind.as_str(), id = %id))]
pub async fn run_row_action(ctx: &AppContext, kind: RowActionKind, id: &str) -> Result<()> {
    let out = Output::new();
    let view = view_for(kind);
    let session = ctx.require_page(view.page())?;

    let mut controller =
        PageController::new(&ctx.api, view, ctx.business().display_offset());
    controller
        .load()
        .await
        .with_context(|| format!("Failed to load the {view} view"))?;

    let id = id.trim();
    if controller.state().find(id).is_none() {
        bail!("{id} is not in the {view} view");
    }

    let action = RowAction {
        kind,
        id: Ustr::from(id),
    };
    let outcome = controller
        .run_action(action, &InquireDialog::new(), &session)
        .await;
    report_outcome(&out, &outcome)
}

/// Print what happened; a failed POST becomes the command's error.
pub fn report_outcome(out: &Output, outcome: &ActionOutcome) -> Result<()> {
    match outcome {
        ActionOutcome::Submitted(mutation) => {
            info!(
                kind = mutation.describe(),
                id = mutation.id().as_deref().unwrap_or("-"),
                "Submitted"
            );
            Ok(())
        }
        ActionOutcome::Aborted(AbortReason::NoInput) => {
            out.dim("Cancelled, nothing was sent.");
            Ok(())
        }
        // The dialog already told the user.
        ActionOutcome::Aborted(AbortReason::InvalidQuantity | AbortReason::UnknownRecord) => Ok(()),
        ActionOutcome::Aborted(AbortReason::NotOffered) => {
            bail!("That action is not available on this view")
        }
        ActionOutcome::Failed(e) => Err(e.clone()).context("Submission failed"),
    }
}
