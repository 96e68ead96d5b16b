//! Row-action submitters: collect input through a [`Dialog`], build a
//! [`Mutation`] and POST it.
//!
//! Empty or cancelled input aborts before any network call. A failed POST is
//! reported with an alert; the caller decides whether to reload.

use log::{info, warn};
use ustr::Ustr;

use crate::api::{ApiError, RequestsApi};
use crate::dialog::{Dialog, DoneKind};
use crate::format::format_number;
use crate::mutation::{Mutation, RequestForm};
use crate::{Record, Session};

/// Why a submitter stopped before posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// The user cancelled or left a required prompt empty.
    NoInput,
    /// Partial quantity failed validation; the user was alerted.
    InvalidQuantity,
    /// The row is not in the loaded set.
    UnknownRecord,
    /// The view does not offer this action.
    NotOffered,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    Submitted(Mutation),
    Aborted(AbortReason),
    Failed(ApiError),
}

impl ActionOutcome {
    /// Whether the view should be reloaded.
    pub fn needs_reload(&self) -> bool {
        matches!(self, Self::Submitted(_))
    }
}

/// Submitters bound to one session, API and dialog host.
pub struct Submitter<'a> {
    api: &'a dyn RequestsApi,
    dialog: &'a dyn Dialog,
    session: &'a Session,
}

impl<'a> Submitter<'a> {
    pub fn new(api: &'a dyn RequestsApi, dialog: &'a dyn Dialog, session: &'a Session) -> Self {
        Self {
            api,
            dialog,
            session,
        }
    }

    /// Create (`record` is `None`) or update a request through the form.
    pub async fn edit(&self, record: Option<&Record>) -> ActionOutcome {
        let (title, initial) = match record {
            Some(record) => ("Edit Request", RequestForm::from_record(record)),
            None => ("New Request", RequestForm::default()),
        };
        let Some(form) = self.dialog.edit_form(title, initial).await else {
            return ActionOutcome::Aborted(AbortReason::NoInput);
        };

        let mutation = Mutation::Save {
            id: record.and_then(Record::id),
            form,
        };
        self.submit(mutation, "Request saved").await
    }

    pub async fn approve(&self, id: Ustr) -> ActionOutcome {
        let Some(approved_by) = self.signer_or_ask("Approver name:").await else {
            return ActionOutcome::Aborted(AbortReason::NoInput);
        };

        self.submit(Mutation::Approve { id, approved_by }, "Status updated")
            .await
    }

    pub async fn reject(&self, id: Ustr) -> ActionOutcome {
        let Some(rejected_by) = self.signer_or_ask("Rejected by:").await else {
            return ActionOutcome::Aborted(AbortReason::NoInput);
        };
        let Some(reason) = non_empty(self.dialog.ask_text("Rejection reason:").await) else {
            return ActionOutcome::Aborted(AbortReason::NoInput);
        };

        self.submit(
            Mutation::Reject {
                id,
                rejected_by,
                reason,
            },
            "Status updated",
        )
        .await
    }

    /// Mark a purchase completed, or partially bought.
    ///
    /// The partial path needs the loaded `record` to know the outstanding
    /// quantity.
    pub async fn mark_done(&self, id: Ustr, record: Option<&Record>) -> ActionOutcome {
        match self.dialog.choose_done_kind().await {
            None => ActionOutcome::Aborted(AbortReason::NoInput),
            Some(DoneKind::Completed) => self.complete(id).await,
            Some(DoneKind::Partial) => match record {
                Some(record) => self.partial(id, record).await,
                None => {
                    warn!("Partial completion for {id} without a loaded record");
                    ActionOutcome::Aborted(AbortReason::UnknownRecord)
                }
            },
        }
    }

    async fn complete(&self, id: Ustr) -> ActionOutcome {
        let Some(done_by) = self.signer_or_ask("Completed by:").await else {
            return ActionOutcome::Aborted(AbortReason::NoInput);
        };

        self.submit(Mutation::Done { id, done_by }, "Request completed")
            .await
    }

    async fn partial(&self, id: Ustr, record: &Record) -> ActionOutcome {
        let outstanding = record.outstanding_qty();
        let max = outstanding
            .map(|qty| format_number(&qty.to_string()))
            .unwrap_or_else(|| "?".to_owned());
        let Some(input) = self
            .dialog
            .ask_text(&format!("Bought quantity (max {max}):"))
            .await
        else {
            return ActionOutcome::Aborted(AbortReason::NoInput);
        };

        let Some((bought_qty, remaining_qty)) = validate_partial(&input, outstanding) else {
            info!("Rejected partial quantity {input:?} for {id}");
            self.dialog.alert("Invalid quantity").await;
            return ActionOutcome::Aborted(AbortReason::InvalidQuantity);
        };

        let Some(done_by) = self.signer_or_ask("Completed by:").await else {
            return ActionOutcome::Aborted(AbortReason::NoInput);
        };

        self.submit(
            Mutation::Partial {
                id,
                bought_qty,
                remaining_qty,
                done_by,
            },
            "Partially completed",
        )
        .await
    }

    async fn signer_or_ask(&self, prompt: &str) -> Option<String> {
        if let Some(name) = self.session.signer() {
            return Some(name.to_owned());
        }
        non_empty(self.dialog.ask_text(prompt).await)
    }

    async fn submit(&self, mutation: Mutation, success: &str) -> ActionOutcome {
        match self.api.submit(&mutation).await {
            Ok(()) => {
                self.dialog.toast(success).await;
                ActionOutcome::Submitted(mutation)
            }
            Err(e) => {
                warn!("Failed to {}: {e}", mutation.describe());
                self.dialog.alert(&format!("Failed to save: {e}")).await;
                ActionOutcome::Failed(e)
            }
        }
    }
}

fn non_empty(input: Option<String>) -> Option<String> {
    input
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
}

/// Validate a bought quantity against the outstanding one.
///
/// Returns `(bought, remaining)` when `input` is a positive number strictly
/// below `outstanding`.
pub fn validate_partial(input: &str, outstanding: Option<f64>) -> Option<(f64, f64)> {
    let outstanding = outstanding?;
    let bought = input.trim().parse::<f64>().ok()?;
    (bought.is_finite() && bought > 0.0 && bought < outstanding)
        .then_some((bought, outstanding - bought))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{RecordingApi, ScriptedDialog, session_for};
    use serde_json::json;

    fn approved_record(qty: i64) -> Record {
        Record::from_pairs([
            ("ID", json!("PR-1")),
            ("Qty", json!(qty)),
            ("Status", json!("approved")),
        ])
    }

    #[test]
    fn test_validate_partial_bounds() {
        assert_eq!(validate_partial("4", Some(10.0)), Some((4.0, 6.0)));
        assert_eq!(validate_partial(" 2.5 ", Some(3.0)), Some((2.5, 0.5)));
        assert_eq!(validate_partial("10", Some(10.0)), None);
        assert_eq!(validate_partial("0", Some(10.0)), None);
        assert_eq!(validate_partial("-1", Some(10.0)), None);
        assert_eq!(validate_partial("abc", Some(10.0)), None);
        assert_eq!(validate_partial("", Some(10.0)), None);
        assert_eq!(validate_partial("1", None), None);
    }

    #[tokio::test]
    async fn test_approve_uses_session_name() {
        let api = RecordingApi::default();
        let dialog = ScriptedDialog::default();
        let session = session_for(Some("Rina"), "staff_b");

        let outcome = Submitter::new(&api, &dialog, &session)
            .approve(Ustr::from("PR-1"))
            .await;

        assert!(outcome.needs_reload());
        assert_eq!(
            api.submitted(),
            vec![Mutation::Approve {
                id: Ustr::from("PR-1"),
                approved_by: "Rina".to_owned(),
            }]
        );
        assert_eq!(dialog.toasts(), vec!["Status updated".to_owned()]);
    }

    #[tokio::test]
    async fn test_approve_without_name_aborts() {
        let api = RecordingApi::default();
        let dialog = ScriptedDialog::default().with_answers([Some("   ")]);
        let session = session_for(None, "admin");

        let outcome = Submitter::new(&api, &dialog, &session)
            .approve(Ustr::from("PR-1"))
            .await;

        assert_eq!(outcome, ActionOutcome::Aborted(AbortReason::NoInput));
        assert!(api.submitted().is_empty());
    }

    #[tokio::test]
    async fn test_reject_with_empty_reason_posts_nothing() {
        let api = RecordingApi::default();
        let dialog = ScriptedDialog::default().with_answers([Some("")]);
        let session = session_for(Some("Rina"), "admin");

        let outcome = Submitter::new(&api, &dialog, &session)
            .reject(Ustr::from("PR-1"))
            .await;

        assert_eq!(outcome, ActionOutcome::Aborted(AbortReason::NoInput));
        assert!(api.submitted().is_empty());
    }

    #[tokio::test]
    async fn test_partial_computes_remaining() {
        let api = RecordingApi::default();
        let dialog = ScriptedDialog::default()
            .with_done_kind(DoneKind::Partial)
            .with_answers([Some("4")]);
        let session = session_for(Some("Budi"), "staff_c");
        let record = approved_record(10);

        let outcome = Submitter::new(&api, &dialog, &session)
            .mark_done(Ustr::from("PR-1"), Some(&record))
            .await;

        assert!(outcome.needs_reload());
        assert_eq!(
            api.submitted(),
            vec![Mutation::Partial {
                id: Ustr::from("PR-1"),
                bought_qty: 4.0,
                remaining_qty: 6.0,
                done_by: "Budi".to_owned(),
            }]
        );
    }

    #[tokio::test]
    async fn test_partial_rejects_full_and_zero_quantity() {
        for input in ["10", "0"] {
            let api = RecordingApi::default();
            let dialog = ScriptedDialog::default()
                .with_done_kind(DoneKind::Partial)
                .with_answers([Some(input)]);
            let session = session_for(Some("Budi"), "staff_c");
            let record = approved_record(10);

            let outcome = Submitter::new(&api, &dialog, &session)
                .mark_done(Ustr::from("PR-1"), Some(&record))
                .await;

            assert_eq!(
                outcome,
                ActionOutcome::Aborted(AbortReason::InvalidQuantity),
                "input {input}"
            );
            assert!(api.submitted().is_empty(), "input {input}");
            assert_eq!(dialog.alerts(), vec!["Invalid quantity".to_owned()]);
        }
    }

    #[tokio::test]
    async fn test_partial_on_partial_uses_remaining_qty() {
        let api = RecordingApi::default();
        let dialog = ScriptedDialog::default()
            .with_done_kind(DoneKind::Partial)
            .with_answers([Some("6")]);
        let session = session_for(Some("Budi"), "staff_c");
        let record = Record::from_pairs([
            ("ID", json!("PR-1")),
            ("Qty", json!(10)),
            ("Status", json!("partial")),
            ("RemainingQty", json!(6)),
        ]);

        let outcome = Submitter::new(&api, &dialog, &session)
            .mark_done(Ustr::from("PR-1"), Some(&record))
            .await;

        assert_eq!(outcome, ActionOutcome::Aborted(AbortReason::InvalidQuantity));
    }

    #[tokio::test]
    async fn test_failed_post_alerts() {
        let api = RecordingApi::failing(500);
        let dialog = ScriptedDialog::default().with_done_kind(DoneKind::Completed);
        let session = session_for(Some("Budi"), "admin");

        let outcome = Submitter::new(&api, &dialog, &session)
            .mark_done(Ustr::from("PR-1"), None)
            .await;

        assert_eq!(outcome, ActionOutcome::Failed(ApiError::Status(500)));
        assert!(!outcome.needs_reload());
        assert_eq!(dialog.alerts().len(), 1);
        assert!(dialog.toasts().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_form_aborts_edit() {
        let api = RecordingApi::default();
        let dialog = ScriptedDialog::default();
        let session = session_for(Some("Budi"), "admin");

        let outcome = Submitter::new(&api, &dialog, &session).edit(None).await;

        assert_eq!(outcome, ActionOutcome::Aborted(AbortReason::NoInput));
        assert!(api.submitted().is_empty());
    }

    #[tokio::test]
    async fn test_edit_sends_id_of_record() {
        let api = RecordingApi::default();
        let dialog = ScriptedDialog::default().accepting_forms();
        let session = session_for(Some("Budi"), "admin");
        let record = approved_record(3);

        Submitter::new(&api, &dialog, &session)
            .edit(Some(&record))
            .await;

        let submitted = api.submitted();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].id(), Some(Ustr::from("PR-1")));
        assert_eq!(submitted[0].describe(), "update");
    }
}
