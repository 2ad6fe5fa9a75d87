//! CSV input and output for the finance tracker.
//!
//! * [`entries`] reads raw form submissions for batch entry.
//! * [`export`] writes a ledger in its profile's column schema.
//! * [`ledger`] reads such an export back.

pub mod entries;
pub mod error;
pub mod export;
pub mod ledger;

pub use error::{CsvLoadError, ExportError};
pub use export::{to_csv_string, write_csv, write_csv_file};
