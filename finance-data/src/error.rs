use std::io;
use std::path::PathBuf;

use finance_core::{FormulaProfile, ValidationError};
use thiserror::Error;

/// Errors that can occur while loading entries or a ledger from CSV.
#[derive(Debug, Error)]
pub enum CsvLoadError {
    /// The underlying CSV deserialisation failed (bad structure, type
    /// mismatch, etc.).
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    #[error("cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A row parsed but a value is outside what an entry can hold. `row` is
    /// 1-based (header = row 0).
    #[error("row {row}: {source}")]
    Invalid {
        row: usize,
        #[source]
        source: ValidationError,
    },

    /// A ledger cell could not be read back.
    #[error("row {row}: invalid {column} value '{value}'")]
    InvalidCell {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    #[error("column '{column}' is not part of the {profile} schema")]
    UnexpectedColumn {
        column: String,
        profile: FormulaProfile,
    },

    #[error("missing column '{column}' required by the {profile} schema")]
    MissingColumn {
        column: &'static str,
        profile: FormulaProfile,
    },
}

/// Errors that can occur while exporting a ledger.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Nothing to export. Callers treat this as a warning, not a fault.
    #[error("no data to export: the ledger is empty")]
    EmptyLedger,

    /// A record was produced by a different profile than the one whose
    /// schema is being written. `row` is 1-based.
    #[error("row {row} was calculated with {found}, expected {expected}")]
    ProfileMismatch {
        row: usize,
        expected: FormulaProfile,
        found: FormulaProfile,
    },

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ExportError {
    /// Whether the error is the soft "nothing to export" state.
    pub fn is_empty_ledger(&self) -> bool {
        matches!(self, Self::EmptyLedger)
    }
}
