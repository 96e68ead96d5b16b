//! Dashboard figures computed from one full load.

use std::collections::BTreeMap;

use crate::{Record, Status};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub total: usize,
    /// Records per known status.
    pub by_status: BTreeMap<&'static str, usize>,
    /// Records whose status is missing or not recognised.
    pub unknown_status: usize,
    pub total_qty: f64,
    /// Sum of `Nominal`, falling back to `Qty × Price` when absent.
    pub total_nominal: f64,
}

impl Summary {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a Record>) -> Self {
        let mut summary = Self::default();
        for status in Status::ALL {
            summary.by_status.insert(status.as_str(), 0);
        }

        for record in records {
            summary.total += 1;
            match record.status() {
                Some(status) => *summary.by_status.entry(status.as_str()).or_default() += 1,
                None => summary.unknown_status += 1,
            }
            summary.total_qty += record.qty().unwrap_or_default();
            summary.total_nominal += record
                .nominal()
                .or_else(|| Some(record.qty()? * record.price()?))
                .unwrap_or_default();
        }
        summary
    }

    pub fn count(&self, status: Status) -> usize {
        self.by_status.get(status.as_str()).copied().unwrap_or_default()
    }
}
