//! Terminal dialog host backed by `inquire`.

use async_trait::async_trait;
use inquire::error::InquireResult;
use inquire::{Confirm, InquireError, Select, Text};
use procure_business::record::field;
use procure_business::{Dialog, DoneKind, RequestForm};
use tracing::warn;

use crate::output::Output;

const PRIORITIES: [&str; 3] = ["Low", "Medium", "High"];
const DONE_CHOICES: [&str; 2] = ["Completed", "Partial"];

/// A skipped or interrupted prompt is a cancel. Other failures, such as no
/// terminal, are logged and then also treated as a cancel.
fn answered<T>(result: InquireResult<Option<T>>) -> Option<T> {
    match result {
        Ok(answer) => answer,
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => None,
        Err(e) => {
            warn!("Prompt failed: {e}");
            None
        }
    }
}

/// Prompts on the controlling terminal. Esc cancels the current prompt.
#[derive(Default)]
pub struct InquireDialog {
    out: Output,
}

impl InquireDialog {
    pub fn new() -> Self {
        Self::default()
    }

    fn ask_field(column: &str, current: &str) -> Option<String> {
        if column == field::PRIORITY {
            let cursor = PRIORITIES
                .iter()
                .position(|p| p.eq_ignore_ascii_case(current))
                .unwrap_or(1);
            return answered(
                Select::new("Priority:", PRIORITIES.to_vec())
                    .with_starting_cursor(cursor)
                    .prompt_skippable(),
            )
            .map(str::to_owned);
        }

        let label = format!("{column}:");
        answered(
            Text::new(&label)
                .with_initial_value(current)
                .prompt_skippable(),
        )
    }
}

#[async_trait(?Send)]
impl Dialog for InquireDialog {
    async fn ask_text(&self, prompt: &str) -> Option<String> {
        answered(Text::new(prompt).prompt_skippable())
    }

    async fn choose_done_kind(&self) -> Option<DoneKind> {
        let choice = answered(
            Select::new("How was it bought?", DONE_CHOICES.to_vec())
                .with_help_message("Partial keeps the request open for the rest")
                .prompt_skippable(),
        )?;
        Some(if choice == DONE_CHOICES[1] {
            DoneKind::Partial
        } else {
            DoneKind::Completed
        })
    }

    async fn edit_form(&self, title: &str, initial: RequestForm) -> Option<RequestForm> {
        self.out.header(title);
        let mut form = initial.clone();
        for (column, current) in initial.fields() {
            let value = Self::ask_field(column, current)?;
            if let Some(slot) = form.field_mut(column) {
                *slot = value;
            }
        }
        Some(form)
    }

    async fn confirm(&self, message: &str) -> bool {
        answered(Confirm::new(message).with_default(false).prompt_skippable()).unwrap_or(false)
    }

    async fn alert(&self, message: &str) {
        self.out.error(message);
    }

    async fn toast(&self, message: &str) {
        self.out.success(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_errors_read_as_cancel() {
        assert_eq!(answered(Ok(Some("dina"))), Some("dina"));
        assert_eq!(answered::<&str>(Ok(None)), None);
        assert_eq!(answered::<&str>(Err(InquireError::OperationInterrupted)), None);
        assert_eq!(answered::<&str>(Err(InquireError::NotTTY)), None);
    }
}
