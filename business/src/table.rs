//! Per-view table state: loaded records, search, pagination.
//!
//! Everything here is synchronous and in memory. Fetching lives in
//! [`crate::api`]; [`crate::controller::PageController`] wires the two.

use std::fmt;

use chrono::FixedOffset;
use log::{debug, warn};
use ustr::Ustr;

use crate::render::{RenderedTable, render_page};
use crate::view::{ViewConfig, ViewKind};
use crate::Record;

/// Token handed out by [`ViewState::begin_load`]. Only the newest ticket may
/// apply its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

/// The `Showing {start}–{end} of {total}` line under a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub start: usize,
    pub end: usize,
    pub total: usize,
}

impl fmt::Display for PageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Showing {}–{} of {}", self.start, self.end, self.total)
    }
}

#[derive(Debug, Clone)]
pub struct ViewState {
    config: &'static ViewConfig,
    /// Records that passed the view's status filter.
    records: Vec<Record>,
    /// Indices into `records` matching the current query.
    matches: Vec<usize>,
    headers: Vec<Ustr>,
    query: String,
    page: usize,
    page_size: usize,
    generation: u64,
    loaded: bool,
}

impl ViewState {
    pub fn new(kind: ViewKind) -> Self {
        let config = kind.config();
        Self {
            config,
            records: Vec::new(),
            matches: Vec::new(),
            headers: Vec::new(),
            query: String::new(),
            page: 1,
            page_size: config.page_size,
            generation: 0,
            loaded: false,
        }
    }

    pub fn config(&self) -> &'static ViewConfig {
        self.config
    }

    pub fn kind(&self) -> ViewKind {
        self.config.kind
    }

    /// Whether any load has been applied yet.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Start a load. Any ticket issued earlier becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        LoadTicket(self.generation)
    }

    /// Install a fetched record set.
    ///
    /// Returns `false` and leaves the state untouched when `ticket` was
    /// superseded by a later [`begin_load`](Self::begin_load).
    pub fn apply_load(&mut self, ticket: LoadTicket, fetched: Vec<Record>) -> bool {
        if ticket.0 != self.generation {
            warn!(
                "Discarding stale {} load (generation {}, latest {})",
                self.config.kind, ticket.0, self.generation
            );
            return false;
        }

        let filter = self.config.filter;
        self.records = fetched.into_iter().filter(|r| filter.matches(r)).collect();
        self.headers = self
            .records
            .first()
            .map(|first| {
                first
                    .keys()
                    .filter(|column| !self.config.is_hidden(column))
                    .map(Ustr::from)
                    .collect()
            })
            .unwrap_or_default();
        self.query.clear();
        self.matches = (0..self.records.len()).collect();
        self.page = 1;
        self.loaded = true;

        debug!(
            "Applied {} load: {} records, {} columns",
            self.config.kind,
            self.records.len(),
            self.headers.len()
        );
        true
    }

    /// Filter by case-insensitive substring over the visible columns' raw
    /// values. An empty query restores the full set. Resets to page 1.
    pub fn search(&mut self, query: &str) {
        self.query = query.to_lowercase();
        self.page = 1;

        if self.query.is_empty() {
            self.matches = (0..self.records.len()).collect();
            return;
        }

        self.matches = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, record)| self.haystack(record).contains(&self.query))
            .map(|(i, _)| i)
            .collect();
    }

    fn haystack(&self, record: &Record) -> String {
        self.headers
            .iter()
            .map(|column| record.text(column))
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Go to `page` (1-based). Pages past the end are allowed and show nothing.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Change the page size; 0 is treated as 1. Resets to page 1.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 1;
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of pages for the current matches, never less than 1.
    pub fn page_count(&self) -> usize {
        self.matches.len().div_ceil(self.page_size).max(1)
    }

    /// Visible columns, in first-seen order of the first record.
    pub fn headers(&self) -> &[Ustr] {
        &self.headers
    }

    /// Records that passed the status filter, ignoring the query.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Records matching the current query.
    pub fn matching(&self) -> impl Iterator<Item = &Record> {
        self.matches.iter().map(|&i| &self.records[i])
    }

    pub fn total(&self) -> usize {
        self.matches.len()
    }

    /// Records on the current page.
    pub fn page_records(&self) -> Vec<&Record> {
        let start = (self.page - 1).saturating_mul(self.page_size);
        self.matches
            .iter()
            .skip(start)
            .take(self.page_size)
            .map(|&i| &self.records[i])
            .collect()
    }

    pub fn page_info(&self) -> PageInfo {
        let total = self.matches.len();
        let start = if total == 0 {
            0
        } else {
            (self.page - 1)
                .saturating_mul(self.page_size)
                .saturating_add(1)
        };
        let end = start.saturating_add(self.page_size - 1).min(total);
        PageInfo { start, end, total }
    }

    pub fn render(&self, offset: FixedOffset) -> RenderedTable {
        render_page(self.config, &self.headers, &self.page_records(), offset)
    }

    /// Look a loaded record up by `ID`.
    pub fn find(&self, id: &str) -> Option<&Record> {
        self.records
            .iter()
            .find(|record| record.id().is_some_and(|rid| rid.as_str() == id))
    }
}
