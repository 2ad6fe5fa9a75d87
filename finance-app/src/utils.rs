use finance_core::calculations::common::display_amount;
use finance_core::{Column, EntryField, LedgerRecord};
use rust_decimal::Decimal;
use thiserror::Error;

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
#[error("invalid decimal '{input}': {source}")]
pub struct ParseDecimalError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Normalizes input for decimal parsing: trims whitespace and removes commas (thousands separator).
fn normalize_decimal_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Parses a string into a [`Decimal`].
///
/// Handles comma as thousands separator (e.g. `"1,234.56"`).
/// Empty or whitespace-only input is treated as 0.
/// Returns an error and logs when the input is invalid (non-empty but not parseable).
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|e| {
        tracing::debug!(input = %s, "invalid decimal: {}", e);
        ParseDecimalError {
            input: s.to_string(),
            source: e,
        }
    })
}

/// Formats one ledger cell for display.
///
/// Dates are `YYYY-MM-DD`, amounts are rounded half-up to two places, counts
/// and percentages are shown as whole numbers and an absent name is "—".
pub fn display_cell(
    record: &LedgerRecord,
    column: Column,
) -> String {
    match column {
        Column::Field(EntryField::Date) => record.entry().date.format("%Y-%m-%d").to_string(),
        Column::Field(EntryField::RegisteredBy) => record
            .entry()
            .registered_by
            .clone()
            .unwrap_or_else(|| "—".to_string()),
        Column::Field(field) if !field.is_monetary() => record
            .amount(column)
            .map(|v| v.to_string())
            .unwrap_or_default(),
        column => record
            .amount(column)
            .map(display_amount)
            .unwrap_or_else(|| "—".to_string()),
    }
}
