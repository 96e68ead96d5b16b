//! Purchase-request records as returned by the data endpoint.
//!
//! The endpoint is spreadsheet-backed, so a record is whatever columns the
//! sheet has, in sheet order. [`Record`] keeps that ordered map intact and
//! layers typed accessors for the business columns on top of it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ustr::Ustr;

use crate::Status;

/// Column names used by the backend sheet.
pub mod field {
    pub const ID: &str = "ID";
    pub const DEPARTMENT: &str = "Department";
    pub const OFFICE: &str = "Office";
    pub const ITEMS: &str = "Items";
    pub const PART_OF: &str = "PartOf";
    pub const DESCRIPTION: &str = "Description";
    pub const QTY: &str = "Qty";
    pub const UNIT: &str = "Unit";
    pub const PRICE: &str = "Price";
    pub const NOMINAL: &str = "Nominal";
    pub const LAST_BUYING_DATE: &str = "LastBuyingDate";
    pub const ORDER_DATE: &str = "OrderDate";
    pub const PRIORITY: &str = "Priority";
    pub const ORDER_BY: &str = "OrderBy";
    pub const REQUESTER: &str = "Requester";
    pub const STATUS: &str = "Status";
    pub const SUBMISSION_DATE: &str = "SubmissionDate";
    pub const CREATED_AT: &str = "CreatedAt";
    pub const APPROVED_BY: &str = "ApprovedBy";
    pub const APPROVED_DATE: &str = "ApprovedDate";
    pub const DONE_BY: &str = "DoneBy";
    pub const DONE_DATE: &str = "DoneDate";
    pub const BOUGHT_QTY: &str = "BoughtQty";
    pub const REMAINING_QTY: &str = "RemainingQty";
    pub const REJECTED_BY: &str = "RejectedBy";
    pub const REJECTED_DATE: &str = "RejectedDate";
    pub const REJECTED_REASON: &str = "RejectedReason";
}

/// One purchase request. Field order follows the backend response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, Value>,
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl Record {
    /// Build a record from `(column, value)` pairs, keeping their order.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Column names in backend order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.get(column)
    }

    /// Raw display text of a column; missing and null become an empty string.
    pub fn text(&self, column: &str) -> String {
        self.get(column).map(value_text).unwrap_or_default()
    }

    /// Non-empty text of a column.
    pub fn text_opt(&self, column: &str) -> Option<String> {
        let text = self.text(column);
        (!text.trim().is_empty()).then_some(text)
    }

    /// Numeric value of a column, accepting both JSON numbers and numeric strings.
    pub fn number(&self, column: &str) -> Option<f64> {
        match self.get(column)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    pub fn id(&self) -> Option<Ustr> {
        self.text_opt(field::ID).map(|id| Ustr::from(id.trim()))
    }

    /// Parsed `Status`; unknown values yield `None`.
    pub fn status(&self) -> Option<Status> {
        self.text(field::STATUS).parse().ok()
    }

    pub fn priority(&self) -> Option<String> {
        self.text_opt(field::PRIORITY)
    }

    pub fn qty(&self) -> Option<f64> {
        self.number(field::QTY)
    }

    pub fn price(&self) -> Option<f64> {
        self.number(field::PRICE)
    }

    pub fn nominal(&self) -> Option<f64> {
        self.number(field::NOMINAL)
    }

    pub fn remaining_qty(&self) -> Option<f64> {
        self.number(field::REMAINING_QTY)
    }

    /// Quantity still to be bought: `RemainingQty` once a request is partial,
    /// otherwise the requested `Qty`.
    pub fn outstanding_qty(&self) -> Option<f64> {
        match self.status() {
            Some(Status::Partial) => self.remaining_qty().or_else(|| self.qty()),
            _ => self.qty(),
        }
    }
}

/// Plain-text rendering of a JSON cell value.
///
/// Integral numbers print without a fractional part, so `5.0` reads `5` the
/// way the sheet shows it.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                let f = n.as_f64().unwrap_or_default();
                if f.fract() == 0.0 && f.abs() < 1e15 {
                    format!("{f:.0}")
                } else {
                    f.to_string()
                }
            }
        }
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Record {
        serde_json::from_value(json!({
            "ID": "PR-001",
            "Department": "IT",
            "Items": "Laptop",
            "Qty": "10",
            "Price": 1500000,
            "Status": "pending",
            "Note": null
        }))
        .expect("record should deserialize")
    }

    #[test]
    fn keys_keep_backend_order() {
        let record = sample();
        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(
            keys,
            vec!["ID", "Department", "Items", "Qty", "Price", "Status", "Note"]
        );
    }

    #[test]
    fn typed_accessors() {
        let record = sample();
        assert_eq!(record.id(), Some(Ustr::from("PR-001")));
        assert_eq!(record.status(), Some(Status::Pending));
        assert_eq!(record.qty(), Some(10.0));
        assert_eq!(record.price(), Some(1_500_000.0));
        assert_eq!(record.text_opt("Department").as_deref(), Some("IT"));
        assert!(record.priority().is_none());
        assert!(record.remaining_qty().is_none());
    }

    #[test]
    fn null_and_missing_are_empty_text() {
        let record = sample();
        assert_eq!(record.text("Note"), "");
        assert_eq!(record.text("Missing"), "");
    }

    #[test]
    fn value_text_prints_integral_floats_without_fraction() {
        assert_eq!(value_text(&json!(5.0)), "5");
        assert_eq!(value_text(&json!(2.5)), "2.5");
        assert_eq!(value_text(&json!(42)), "42");
        assert_eq!(value_text(&json!(true)), "true");
    }

    #[test]
    fn numeric_id_is_accepted() {
        let record = Record::from_pairs([("ID", json!(17))]);
        assert_eq!(record.id(), Some(Ustr::from("17")));
    }

    #[test]
    fn outstanding_qty_uses_remaining_for_partial() {
        let partial = Record::from_pairs([
            ("Qty", json!(10)),
            ("Status", json!("partial")),
            ("RemainingQty", json!(6)),
        ]);
        assert_eq!(partial.outstanding_qty(), Some(6.0));

        let approved = Record::from_pairs([("Qty", json!(10)), ("Status", json!("approved"))]);
        assert_eq!(approved.outstanding_qty(), Some(10.0));
    }
}
