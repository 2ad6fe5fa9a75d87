use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::entry::RawEntry;
use super::metric::DerivedMetrics;
use super::profile::{Column, FormulaProfile};

/// A raw entry together with the metrics derived from it.
///
/// Records are immutable: the ledger hands out shared references only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRecord {
    entry: RawEntry,
    metrics: DerivedMetrics,
}

impl LedgerRecord {
    pub fn new(
        entry: RawEntry,
        metrics: DerivedMetrics,
    ) -> Self {
        Self { entry, metrics }
    }

    pub fn entry(&self) -> &RawEntry {
        &self.entry
    }

    pub fn metrics(&self) -> &DerivedMetrics {
        &self.metrics
    }

    pub fn profile(&self) -> FormulaProfile {
        self.metrics.profile()
    }

    /// Numeric value of a schema column, or `None` for the date, the
    /// free-text fields and metrics this record's profile does not compute.
    pub fn amount(
        &self,
        column: Column,
    ) -> Option<Decimal> {
        match column {
            Column::Field(field) => self.entry.amount(field),
            Column::Metric(metric) => self.metrics.get(metric),
        }
    }
}
