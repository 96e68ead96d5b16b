//! Business layer of the purchase-request desk.
//!
//! Records come from a single spreadsheet-backed endpoint. Each page of the
//! desk is a [`ViewKind`]: the same table engine with its own status filter,
//! hidden columns and row actions. Row actions go through the [`Submitter`]
//! and a host-provided [`Dialog`]; the [`session`] module holds the role guard.

pub mod actions;
pub mod api;
mod config;
pub mod controller;
pub mod dialog;
pub mod format;
pub mod http;
pub mod mutation;
pub mod record;
pub mod render;
pub mod session;
mod status;
pub mod summary;
pub mod table;
mod test_utils;
pub mod view;

pub use actions::{AbortReason, ActionOutcome, Submitter};
pub use api::{ApiError, ApiResult, HttpRequestsApi, RequestsApi};
pub use config::BusinessConfig;
pub use controller::PageController;
pub use dialog::{Dialog, DoneKind};
pub use mutation::{Mutation, RequestForm};
pub use record::Record;
pub use render::{Cell, RenderedTable, RowAction};
pub use session::{
    CurrentUser, GuardDecision, MemorySessionStore, Page, Role, Session, SessionStore,
    check_page, current_user,
};
pub use status::{Status, UnknownStatus};
pub use summary::Summary;
pub use table::{PageInfo, ViewState};
pub use view::{RowActionKind, ViewConfig, ViewKind};
