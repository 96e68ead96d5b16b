//! Per-view table configuration.
//!
//! Every page of the desk is the same table engine with a different status
//! filter, hidden-column set, page size and row actions.

use std::fmt;
use std::str::FromStr;

use crate::record::field;
use crate::{Page, Record, Status};

/// Actions that can be offered on a table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowActionKind {
    Edit,
    Approve,
    Reject,
    MarkDone,
}

impl RowActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Edit => "edit",
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::MarkDone => "mark-done",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Edit => "Edit",
            Self::Approve => "Approve",
            Self::Reject => "Reject",
            Self::MarkDone => "Mark Done",
        }
    }
}

/// Which records a view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    /// Every record returned by the endpoint.
    All,
    /// Records whose `Status` equals one of the listed values.
    Only(&'static [Status]),
}

impl StatusFilter {
    pub fn matches(self, record: &Record) -> bool {
        match self {
            Self::All => true,
            Self::Only(statuses) => record
                .status()
                .is_some_and(|status| statuses.contains(&status)),
        }
    }
}

/// The data views of the desk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    /// All requests, with create/edit.
    Requests,
    /// Pending requests awaiting approve/reject.
    Approval,
    /// Approved (and partially bought) requests awaiting purchase.
    Done,
    /// Rejected requests, read-only.
    Rejected,
    /// Recap of every request, read-only.
    Recap,
}

/// Static configuration of one view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewConfig {
    pub kind: ViewKind,
    pub title: &'static str,
    pub filter: StatusFilter,
    pub hidden: &'static [&'static str],
    pub page_size: usize,
    pub actions: &'static [RowActionKind],
    /// Sheet to read from, when the view does not use the main sheet.
    pub sheet: Option<&'static str>,
    /// Callback name sent to the endpoint; keeps JSONP responses of different views apart.
    pub callback: &'static str,
    pub empty_message: &'static str,
}

const APPROVAL_HIDDEN: &[&str] = &[
    field::CREATED_AT,
    field::APPROVED_BY,
    field::APPROVED_DATE,
    field::DONE_BY,
    field::DONE_DATE,
    field::REJECTED_BY,
    field::REJECTED_DATE,
    field::REJECTED_REASON,
];

const REQUESTS: ViewConfig = ViewConfig {
    kind: ViewKind::Requests,
    title: "Purchase Requests",
    filter: StatusFilter::All,
    hidden: &[
        field::DONE_BY,
        field::DONE_DATE,
        field::CREATED_AT,
        field::REJECTED_BY,
        field::REJECTED_DATE,
        field::REJECTED_REASON,
        field::PART_OF,
    ],
    page_size: 25,
    actions: &[RowActionKind::Edit],
    sheet: None,
    callback: "onDataLoaded",
    empty_message: "No data found",
};

const APPROVAL: ViewConfig = ViewConfig {
    kind: ViewKind::Approval,
    title: "Pending Approval",
    filter: StatusFilter::Only(&[Status::Pending]),
    hidden: APPROVAL_HIDDEN,
    page_size: 15,
    actions: &[RowActionKind::Approve, RowActionKind::Reject],
    sheet: None,
    callback: "onDataLoadedApproval",
    empty_message: "No data found",
};

const DONE: ViewConfig = ViewConfig {
    kind: ViewKind::Done,
    title: "Purchase Queue",
    filter: StatusFilter::Only(&[Status::Approved, Status::Partial]),
    hidden: APPROVAL_HIDDEN,
    page_size: 15,
    actions: &[RowActionKind::MarkDone],
    sheet: None,
    callback: "onDoneLoaded",
    empty_message: "No approved requests",
};

const REJECTED: ViewConfig = ViewConfig {
    kind: ViewKind::Rejected,
    title: "Rejected Requests",
    filter: StatusFilter::Only(&[Status::Rejected]),
    hidden: &[
        field::DONE_BY,
        field::DONE_DATE,
        field::PRICE,
        field::NOMINAL,
        field::LAST_BUYING_DATE,
        "Aksi",
        field::CREATED_AT,
        field::APPROVED_BY,
        field::APPROVED_DATE,
    ],
    page_size: 20,
    actions: &[],
    sheet: Some("rejected"),
    callback: "onRejectedLoaded",
    empty_message: "No data found",
};

const RECAP: ViewConfig = ViewConfig {
    kind: ViewKind::Recap,
    title: "Recap",
    filter: StatusFilter::All,
    hidden: &[field::CREATED_AT],
    page_size: 25,
    actions: &[],
    sheet: None,
    callback: "onRecapLoaded",
    empty_message: "No data found",
};

impl ViewKind {
    pub const ALL: [Self; 5] = [
        Self::Requests,
        Self::Approval,
        Self::Done,
        Self::Rejected,
        Self::Recap,
    ];

    pub fn config(self) -> &'static ViewConfig {
        match self {
            Self::Requests => &REQUESTS,
            Self::Approval => &APPROVAL,
            Self::Done => &DONE,
            Self::Rejected => &REJECTED,
            Self::Recap => &RECAP,
        }
    }

    /// Page this view is served on; used for permission checks.
    pub fn page(self) -> Page {
        match self {
            Self::Requests => Page::Index,
            Self::Approval => Page::Approval,
            Self::Done => Page::Done,
            Self::Rejected => Page::Rejected,
            Self::Recap => Page::Recap,
        }
    }

    pub fn from_page(page: Page) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.page() == page)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Requests => "requests",
            Self::Approval => "approval",
            Self::Done => "done",
            Self::Rejected => "rejected",
            Self::Recap => "recap",
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == needle || kind.page().file_name() == needle)
            .ok_or_else(|| format!("unknown view: {s}"))
    }
}

impl ViewConfig {
    pub fn has_actions(&self) -> bool {
        !self.actions.is_empty()
    }

    pub fn is_hidden(&self, column: &str) -> bool {
        self.hidden.contains(&column)
    }
}

/// How a column's cells are formatted, independent of the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    DateTime,
    Date,
    Number,
    Currency,
    Status,
    /// Long free text, truncated with the full value kept as tooltip.
    LongText,
    Plain,
}

const DATETIME_COLUMNS: &[&str] = &[
    field::SUBMISSION_DATE,
    field::CREATED_AT,
    field::APPROVED_DATE,
    field::DONE_DATE,
    field::REJECTED_DATE,
];
const DATE_COLUMNS: &[&str] = &[field::LAST_BUYING_DATE, field::ORDER_DATE];
const NUMBER_COLUMNS: &[&str] = &[field::QTY, field::BOUGHT_QTY, field::REMAINING_QTY];
const CURRENCY_COLUMNS: &[&str] = &[field::PRICE, field::NOMINAL];
const LONG_TEXT_COLUMNS: &[&str] = &[field::ITEMS, field::DESCRIPTION, field::REJECTED_REASON];

impl ColumnKind {
    pub fn of(column: &str) -> Self {
        if column == field::STATUS {
            Self::Status
        } else if DATETIME_COLUMNS.contains(&column) {
            Self::DateTime
        } else if DATE_COLUMNS.contains(&column) {
            Self::Date
        } else if NUMBER_COLUMNS.contains(&column) {
            Self::Number
        } else if CURRENCY_COLUMNS.contains(&column) {
            Self::Currency
        } else if LONG_TEXT_COLUMNS.contains(&column) {
            Self::LongText
        } else {
            Self::Plain
        }
    }
}
