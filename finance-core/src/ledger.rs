//! Append-only, in-memory ledger of finance records.
//!
//! A [`Ledger`] lives exactly as long as the session that owns it. It can only
//! grow: there is no update, delete or reorder operation, and callers only
//! ever receive shared references to the records it holds.

use serde::Serialize;
use tracing::debug;

use crate::models::LedgerRecord;

/// Ordered collection of the records entered during one session.
///
/// A ledger is owned by a single session and is not meant to be shared
/// between concurrent writers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Ledger {
    records: Vec<LedgerRecord>,
}

impl Ledger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record to the end of the ledger.
    pub fn append(
        &mut self,
        record: LedgerRecord,
    ) {
        self.records.push(record);
        debug!(position = self.records.len(), "record appended to ledger");
    }

    /// All records in insertion order.
    pub fn all(&self) -> &[LedgerRecord] {
        &self.records
    }

    /// The most recently appended record, or `None` while the ledger is empty.
    pub fn latest(&self) -> Option<&LedgerRecord> {
        self.records.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LedgerRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a LedgerRecord;
    type IntoIter = std::slice::Iter<'a, LedgerRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
