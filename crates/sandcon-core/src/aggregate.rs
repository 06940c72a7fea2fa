//! Console log aggregation: empty-entry filtering and coalescing of
//! consecutive duplicates.
//!
//! Coalescing is a left-to-right fold that compares each arrival only with
//! the last display row, so it costs O(1) per entry and can run
//! incrementally as logs stream in. Entries that repeat non-consecutively
//! stay separate rows.

use std::borrow::Borrow;
use std::sync::Arc;

use crate::types::{DisplayEntry, LogEntry};

/// True when an entry has no data, or only empty strings.
pub fn is_empty_entry(entry: &LogEntry) -> bool {
    entry.data.iter().all(|value| value.is_empty_string())
}

/// Drop empty entries, preserving order.
pub fn filter_empty<I>(entries: I) -> impl Iterator<Item = I::Item>
where
    I: IntoIterator,
    I::Item: Borrow<LogEntry>,
{
    entries
        .into_iter()
        .filter(|entry| !is_empty_entry(Borrow::<LogEntry>::borrow(entry)))
}

/// Same method, same arity, and every data element structurally equal.
pub fn entries_equal(a: &LogEntry, b: &LogEntry) -> bool {
    a.method == b.method && a.data.len() == b.data.len() && a.data == b.data
}

/// Outcome of feeding one entry to the fold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// Entry was empty and ignored.
    Dropped,
    /// Entry opened a new display row.
    Appended,
    /// Entry repeated the last row; its count was bumped.
    Coalesced,
}

fn fold_into(rows: &mut Vec<DisplayEntry>, entry: Arc<LogEntry>) -> PushOutcome {
    match rows.last_mut() {
        Some(last) if entries_equal(&last.source, &entry) => {
            *last = DisplayEntry {
                source: entry,
                count: last.count.saturating_add(1),
            };
            PushOutcome::Coalesced
        }
        _ => {
            rows.push(DisplayEntry::single(entry));
            PushOutcome::Appended
        }
    }
}

/// Coalesce consecutive equal entries. Does not filter empty entries.
pub fn coalesce<I>(entries: I) -> Vec<DisplayEntry>
where
    I: IntoIterator,
    I::Item: Into<Arc<LogEntry>>,
{
    let mut rows = Vec::new();
    for entry in entries {
        fold_into(&mut rows, entry.into());
    }
    rows
}

/// Filter then coalesce.
pub fn aggregate<I>(entries: I) -> Vec<DisplayEntry>
where
    I: IntoIterator,
    I::Item: Borrow<LogEntry> + Into<Arc<LogEntry>>,
{
    coalesce(filter_empty(entries))
}

/// Expand display rows back into the entry sequence they stand for.
pub fn expand(rows: &[DisplayEntry]) -> Vec<Arc<LogEntry>> {
    rows.iter()
        .flat_map(|row| std::iter::repeat_n(Arc::clone(&row.source), row.count as usize))
        .collect()
}

/// Streaming aggregator over one run's log stream. Only the display rows
/// are stored; empty and coalesced arrivals are not retained.
#[derive(Debug, Clone, Default)]
pub struct ConsoleAggregator {
    rows: Vec<DisplayEntry>,
    kept: usize,
}

impl ConsoleAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: impl Into<Arc<LogEntry>>) -> PushOutcome {
        let entry = entry.into();
        if is_empty_entry(&entry) {
            return PushOutcome::Dropped;
        }
        self.kept += 1;
        fold_into(&mut self.rows, entry)
    }

    /// Coalesced rows, in arrival order.
    pub fn display(&self) -> &[DisplayEntry] {
        &self.rows
    }

    /// Entries that survived empty filtering; equals the sum of row counts.
    pub fn filtered_len(&self) -> usize {
        self.kept
    }

    /// Number of display rows.
    pub fn logs_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn reset(&mut self) {
        self.rows.clear();
        self.kept = 0;
    }
}
