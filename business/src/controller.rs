//! One open page: its table state plus the API it loads from.

use chrono::FixedOffset;
use log::{info, warn};

use crate::actions::{AbortReason, ActionOutcome, Submitter};
use crate::api::{ApiResult, RequestsApi};
use crate::dialog::Dialog;
use crate::render::{RenderedTable, RowAction};
use crate::table::{LoadTicket, PageInfo, ViewState};
use crate::view::{RowActionKind, ViewKind};
use crate::{Record, Session};

pub struct PageController<'a> {
    api: &'a dyn RequestsApi,
    state: ViewState,
    offset: FixedOffset,
}

impl<'a> PageController<'a> {
    pub fn new(api: &'a dyn RequestsApi, kind: ViewKind, offset: FixedOffset) -> Self {
        Self {
            api,
            state: ViewState::new(kind),
            offset,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn kind(&self) -> ViewKind {
        self.state.kind()
    }

    /// Fetch and install the full record set.
    ///
    /// On failure the error is logged and the previously loaded rows stay.
    pub async fn load(&mut self) -> ApiResult<usize> {
        let ticket = self.state.begin_load();
        let result = self.api.fetch_records(self.state.config()).await;
        self.finish_load(ticket, result)
    }

    /// Issue a load ticket for a fetch driven by the host.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.state.begin_load()
    }

    /// Apply a host-driven fetch. Results for superseded tickets are dropped
    /// and report zero rows.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: ApiResult<Vec<Record>>,
    ) -> ApiResult<usize> {
        match result {
            Ok(records) => {
                if self.state.apply_load(ticket, records) {
                    info!("Loaded {} rows into {}", self.state.total(), self.kind());
                    Ok(self.state.total())
                } else {
                    Ok(0)
                }
            }
            Err(e) => {
                warn!("Failed to load {}: {e}", self.kind());
                Err(e)
            }
        }
    }

    pub fn search(&mut self, query: &str) {
        self.state.search(query);
    }

    pub fn set_page(&mut self, page: usize) {
        self.state.set_page(page);
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.state.set_page_size(page_size);
    }

    pub fn render(&self) -> RenderedTable {
        self.state.render(self.offset)
    }

    pub fn page_info(&self) -> PageInfo {
        self.state.page_info()
    }

    /// Dispatch a row action and reload after a successful submit.
    pub async fn run_action(
        &mut self,
        action: RowAction,
        dialog: &dyn Dialog,
        session: &Session,
    ) -> ActionOutcome {
        if !self.state.config().actions.contains(&action.kind) {
            warn!("{} does not offer {}", self.kind(), action.kind.as_str());
            return ActionOutcome::Aborted(AbortReason::NotOffered);
        }

        let submitter = Submitter::new(self.api, dialog, session);
        let record = self.state.find(&action.id);
        let outcome = match action.kind {
            RowActionKind::Edit => match record {
                Some(record) => submitter.edit(Some(record)).await,
                None => {
                    dialog.alert("Data not found").await;
                    ActionOutcome::Aborted(AbortReason::UnknownRecord)
                }
            },
            RowActionKind::Approve => submitter.approve(action.id).await,
            RowActionKind::Reject => submitter.reject(action.id).await,
            RowActionKind::MarkDone => submitter.mark_done(action.id, record).await,
        };

        self.reload_after(&outcome).await;
        outcome
    }

    /// Open the blank form and create a request.
    pub async fn create(&mut self, dialog: &dyn Dialog, session: &Session) -> ActionOutcome {
        let outcome = Submitter::new(self.api, dialog, session).edit(None).await;
        self.reload_after(&outcome).await;
        outcome
    }

    async fn reload_after(&mut self, outcome: &ActionOutcome) {
        if outcome.needs_reload() && self.load().await.is_err() {
            warn!("Reload of {} failed, keeping previous rows", self.kind());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::dialog::DoneKind;
    use crate::test_utils::{RecordingApi, ScriptedDialog, TestContext, session_for};
    use serde_json::json;
    use ustr::Ustr;

    fn wib() -> FixedOffset {
        FixedOffset::east_opt(7 * 3600).expect("valid offset")
    }

    fn rows() -> Vec<Record> {
        vec![
            Record::from_pairs([
                ("ID", json!("PR-1")),
                ("Items", json!("Toner")),
                ("Qty", json!(10)),
                ("Status", json!("approved")),
            ]),
            Record::from_pairs([
                ("ID", json!("PR-2")),
                ("Items", json!("Paper")),
                ("Qty", json!(5)),
                ("Status", json!("pending")),
            ]),
        ]
    }

    #[tokio::test]
    async fn test_load_applies_view_filter() {
        let api = RecordingApi::with_records(rows());
        let mut page = PageController::new(&api, ViewKind::Done, wib());

        assert_eq!(page.load().await, Ok(1));
        assert_eq!(page.render().rows().len(), 1);
        assert_eq!(page.page_info().to_string(), "Showing 1–1 of 1");
    }

    #[tokio::test]
    async fn test_failed_load_keeps_previous_rows() {
        let api = RecordingApi::with_records(rows());
        let mut page = PageController::new(&api, ViewKind::Requests, wib());
        page.load().await.expect("first load");

        let ticket = page.begin_load();
        let result = page.finish_load(ticket, Err(ApiError::Status(502)));

        assert_eq!(result, Err(ApiError::Status(502)));
        assert_eq!(page.state().total(), 2);
    }

    #[test]
    fn test_superseded_fetch_is_dropped() {
        let api = RecordingApi::default();
        let mut page = PageController::new(&api, ViewKind::Requests, wib());

        let stale = page.begin_load();
        let fresh = page.begin_load();
        page.finish_load(fresh, Ok(rows())).expect("fresh load");
        assert_eq!(page.finish_load(stale, Ok(Vec::new())), Ok(0));
        assert_eq!(page.state().total(), 2);
    }

    #[tokio::test]
    async fn test_successful_action_reloads() {
        let api = RecordingApi::with_records(rows());
        let dialog = ScriptedDialog::default()
            .with_done_kind(DoneKind::Partial)
            .with_answers([Some("4")]);
        let session = session_for(Some("Budi"), "staff_b");
        let mut page = PageController::new(&api, ViewKind::Done, wib());
        page.load().await.expect("load");

        let outcome = page
            .run_action(
                RowAction {
                    kind: RowActionKind::MarkDone,
                    id: Ustr::from("PR-1"),
                },
                &dialog,
                &session,
            )
            .await;

        assert!(outcome.needs_reload());
        assert_eq!(api.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_action_not_offered_by_view() {
        let api = RecordingApi::with_records(rows());
        let dialog = ScriptedDialog::default();
        let session = session_for(Some("Budi"), "admin");
        let mut page = PageController::new(&api, ViewKind::Recap, wib());
        page.load().await.expect("load");

        let outcome = page
            .run_action(
                RowAction {
                    kind: RowActionKind::Approve,
                    id: Ustr::from("PR-2"),
                },
                &dialog,
                &session,
            )
            .await;

        assert_eq!(outcome, ActionOutcome::Aborted(AbortReason::NotOffered));
        assert!(api.submitted().is_empty());
    }

    #[tokio::test]
    async fn test_edit_unknown_row_alerts() {
        let api = RecordingApi::with_records(rows());
        let dialog = ScriptedDialog::default().accepting_forms();
        let session = session_for(Some("Budi"), "admin");
        let mut page = PageController::new(&api, ViewKind::Requests, wib());
        page.load().await.expect("load");

        let outcome = page
            .run_action(
                RowAction {
                    kind: RowActionKind::Edit,
                    id: Ustr::from("PR-404"),
                },
                &dialog,
                &session,
            )
            .await;

        assert_eq!(outcome, ActionOutcome::Aborted(AbortReason::UnknownRecord));
        assert_eq!(dialog.alerts(), vec!["Data not found".to_owned()]);
    }

    #[tokio::test]
    async fn test_http_load_over_jsonp() {
        let ctx = TestContext::new().await;
        ctx.mock_records(
            "onDataLoadedApproval",
            json!([
                {"ID": "PR-1", "Status": "pending", "CreatedAt": "2024-01-01"},
                {"ID": "PR-2", "Status": "done", "CreatedAt": "2024-01-02"}
            ]),
        )
        .await;

        let mut page = PageController::new(&ctx.api, ViewKind::Approval, wib());
        assert_eq!(page.load().await, Ok(1));
        let headers: Vec<&str> = page.render().headers.iter().map(|h| h.as_str()).collect();
        assert_eq!(headers, vec!["ID", "Action", "Status"]);
    }

    #[tokio::test]
    async fn test_http_approve_posts_once() {
        let ctx = TestContext::new().await;
        ctx.mock_records(
            "onDataLoadedApproval",
            json!([{"ID": "PR-1", "Status": "pending"}]),
        )
        .await;
        ctx.mock_post(200).await;
        let dialog = ScriptedDialog::default();
        let session = session_for(Some("Rina Wati"), "admin");
        let mut page = PageController::new(&ctx.api, ViewKind::Approval, wib());
        page.load().await.expect("load");

        let outcome = page
            .run_action(
                RowAction {
                    kind: RowActionKind::Approve,
                    id: Ustr::from("PR-1"),
                },
                &dialog,
                &session,
            )
            .await;

        assert!(outcome.needs_reload());
        assert_eq!(
            ctx.posted_forms().await,
            vec!["ID=PR-1&Status=approved&ApprovedBy=Rina+Wati".to_owned()]
        );
    }
}
