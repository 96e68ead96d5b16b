//! Form payloads posted to the data endpoint.

use ustr::Ustr;

use crate::record::field;
use crate::{Record, Status};

pub const DEFAULT_PRIORITY: &str = "Medium";

/// Editable fields of a request, as shown in the create/edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestForm {
    pub department: String,
    pub office: String,
    pub items: String,
    pub part_of: String,
    pub description: String,
    pub qty: String,
    pub unit: String,
    pub price: String,
    pub last_buying_date: String,
    pub order_date: String,
    pub priority: String,
    pub order_by: String,
    pub requester: String,
}

impl Default for RequestForm {
    fn default() -> Self {
        Self {
            department: String::new(),
            office: String::new(),
            items: String::new(),
            part_of: String::new(),
            description: String::new(),
            qty: String::new(),
            unit: String::new(),
            price: String::new(),
            last_buying_date: String::new(),
            order_date: String::new(),
            priority: DEFAULT_PRIORITY.to_owned(),
            order_by: String::new(),
            requester: String::new(),
        }
    }
}

impl RequestForm {
    /// Pre-fill from an existing record; missing values are blank and a
    /// blank priority becomes `Medium`.
    pub fn from_record(record: &Record) -> Self {
        Self {
            department: record.text(field::DEPARTMENT),
            office: record.text(field::OFFICE),
            items: record.text(field::ITEMS),
            part_of: record.text(field::PART_OF),
            description: record.text(field::DESCRIPTION),
            qty: record.text(field::QTY),
            unit: record.text(field::UNIT),
            price: record.text(field::PRICE),
            last_buying_date: record.text(field::LAST_BUYING_DATE),
            order_date: record.text(field::ORDER_DATE),
            priority: record
                .priority()
                .unwrap_or_else(|| DEFAULT_PRIORITY.to_owned()),
            order_by: record.text(field::ORDER_BY),
            requester: record.text(field::REQUESTER),
        }
    }

    /// `(column, value)` pairs in form order.
    pub fn fields(&self) -> [(&'static str, &str); 13] {
        [
            (field::DEPARTMENT, self.department.as_str()),
            (field::OFFICE, self.office.as_str()),
            (field::ITEMS, self.items.as_str()),
            (field::PART_OF, self.part_of.as_str()),
            (field::DESCRIPTION, self.description.as_str()),
            (field::QTY, self.qty.as_str()),
            (field::UNIT, self.unit.as_str()),
            (field::PRICE, self.price.as_str()),
            (field::LAST_BUYING_DATE, self.last_buying_date.as_str()),
            (field::ORDER_DATE, self.order_date.as_str()),
            (field::PRIORITY, self.priority.as_str()),
            (field::ORDER_BY, self.order_by.as_str()),
            (field::REQUESTER, self.requester.as_str()),
        ]
    }

    /// Mutable access by column name, for form hosts that edit field by field.
    pub fn field_mut(&mut self, column: &str) -> Option<&mut String> {
        Some(match column {
            field::DEPARTMENT => &mut self.department,
            field::OFFICE => &mut self.office,
            field::ITEMS => &mut self.items,
            field::PART_OF => &mut self.part_of,
            field::DESCRIPTION => &mut self.description,
            field::QTY => &mut self.qty,
            field::UNIT => &mut self.unit,
            field::PRICE => &mut self.price,
            field::LAST_BUYING_DATE => &mut self.last_buying_date,
            field::ORDER_DATE => &mut self.order_date,
            field::PRIORITY => &mut self.priority,
            field::ORDER_BY => &mut self.order_by,
            field::REQUESTER => &mut self.requester,
            _ => return None,
        })
    }
}

/// A state change sent to the endpoint as one form POST.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Create when `id` is `None`, update otherwise.
    Save { id: Option<Ustr>, form: RequestForm },
    Approve { id: Ustr, approved_by: String },
    Reject {
        id: Ustr,
        rejected_by: String,
        reason: String,
    },
    Done { id: Ustr, done_by: String },
    Partial {
        id: Ustr,
        bought_qty: f64,
        remaining_qty: f64,
        done_by: String,
    },
}

impl Mutation {
    pub fn id(&self) -> Option<Ustr> {
        match self {
            Self::Save { id, .. } => *id,
            Self::Approve { id, .. }
            | Self::Reject { id, .. }
            | Self::Done { id, .. }
            | Self::Partial { id, .. } => Some(*id),
        }
    }

    /// Short name for logs and toasts.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Save { id: None, .. } => "create",
            Self::Save { id: Some(_), .. } => "update",
            Self::Approve { .. } => "approve",
            Self::Reject { .. } => "reject",
            Self::Done { .. } => "mark done",
            Self::Partial { .. } => "partial done",
        }
    }

    /// Form body for the POST.
    pub fn form_pairs(&self) -> Vec<(String, String)> {
        let pair = |k: &str, v: &str| (k.to_owned(), v.to_owned());
        match self {
            Self::Save { id, form } => {
                let mut pairs = Vec::with_capacity(14);
                if let Some(id) = id {
                    pairs.push(pair(field::ID, id.as_str()));
                }
                pairs.extend(form.fields().into_iter().map(|(k, v)| pair(k, v)));
                pairs
            }
            Self::Approve { id, approved_by } => vec![
                pair(field::ID, id.as_str()),
                pair(field::STATUS, Status::Approved.as_str()),
                pair(field::APPROVED_BY, approved_by),
            ],
            Self::Reject {
                id,
                rejected_by,
                reason,
            } => vec![
                pair(field::ID, id.as_str()),
                pair(field::STATUS, Status::Rejected.as_str()),
                pair(field::REJECTED_BY, rejected_by),
                pair(field::REJECTED_REASON, reason),
            ],
            Self::Done { id, done_by } => vec![
                pair(field::ID, id.as_str()),
                pair(field::STATUS, Status::Done.as_str()),
                pair(field::DONE_BY, done_by),
            ],
            Self::Partial {
                id,
                bought_qty,
                remaining_qty,
                done_by,
            } => vec![
                pair(field::ID, id.as_str()),
                pair(field::STATUS, Status::Partial.as_str()),
                pair(field::BOUGHT_QTY, &quantity_text(*bought_qty)),
                pair(field::REMAINING_QTY, &quantity_text(*remaining_qty)),
                pair(field::DONE_BY, done_by),
            ],
        }
    }
}

/// Quantities print without a fractional part when integral.
fn quantity_text(qty: f64) -> String {
    if qty.fract() == 0.0 {
        format!("{qty:.0}")
    } else {
        qty.to_string()
    }
}
