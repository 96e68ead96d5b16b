//! User interaction needed by the submitters.
//!
//! Every prompt is awaited; `None` means the user cancelled.

use async_trait::async_trait;

use crate::mutation::RequestForm;

/// How a purchase was completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoneKind {
    /// Everything requested was bought.
    Completed,
    /// Only part of the outstanding quantity was bought.
    Partial,
}

#[async_trait(?Send)]
pub trait Dialog {
    /// Free-text prompt.
    async fn ask_text(&self, prompt: &str) -> Option<String>;

    async fn choose_done_kind(&self) -> Option<DoneKind>;

    /// Show the create/edit form pre-filled with `initial`.
    async fn edit_form(&self, title: &str, initial: RequestForm) -> Option<RequestForm>;

    async fn confirm(&self, message: &str) -> bool;

    /// Blocking error message the user has to acknowledge.
    async fn alert(&self, message: &str);

    /// Transient notice.
    async fn toast(&self, message: &str);
}
