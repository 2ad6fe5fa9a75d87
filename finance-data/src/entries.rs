//! CSV loader for raw finance entries.
//!
//! Each data row stands for one form submission. The loader only checks
//! structure and types; range checks happen when the entry is submitted to a
//! session, so one bad row does not hide the others.
//!
//! ## CSV Format
//!
//! Column order does **not** matter (headers are matched by name). Header
//! names are case-sensitive. Every column except `date` may be omitted
//! entirely or left empty, in which case the value is zero (or `None` for
//! `registered_by`).
//!
//! | Column | Required | Type | Notes |
//! |---------------------|----------|---------|------------------------------------|
//! | `date` | yes | date | `YYYY-MM-DD` |
//! | `registered_by` | no | string | Who recorded the entry |
//! | `bank_balance` | no | decimal | May be negative |
//! | `sales` | no | decimal | |
//! | `purchase` | no | decimal | |
//! | `sell_return` | no | decimal | |
//! | `expenses` | no | decimal | |
//! | `salary` | no | decimal | |
//! | `ad_spend` | no | decimal | |
//! | `closing_stock` | no | decimal | |
//! | `target_revenue` | no | decimal | |
//! | `target_net_profit` | no | decimal | |
//! | `target_percent` | no | integer | 0–100 |
//! | `new_hires` | no | integer | 0 or more |
//!
//! ### Example
//!
//! ```csv
//! date,bank_balance,sales,purchase,expenses,salary,closing_stock,target_percent
//! 2025-01-31,500.00,1000.00,300.00,100.00,200.00,50.00,70
//! ```

use std::path::Path;

use chrono::NaiveDate;
use finance_core::{EntryField, RawEntry, ValidationError};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::error::CsvLoadError;

// ---------------------------------------------------------------------------
// Serde-compatible row that mirrors the CSV layout exactly
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: NaiveDate,
    registered_by: Option<String>,
    bank_balance: Option<Decimal>,
    sales: Option<Decimal>,
    purchase: Option<Decimal>,
    sell_return: Option<Decimal>,
    expenses: Option<Decimal>,
    salary: Option<Decimal>,
    ad_spend: Option<Decimal>,
    closing_stock: Option<Decimal>,
    target_revenue: Option<Decimal>,
    target_net_profit: Option<Decimal>,
    target_percent: Option<i64>,
    new_hires: Option<i64>,
}

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

/// Convert a single CSV row into a RawEntry.
///
/// row_number is 1-based (for error messages).
fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<RawEntry, CsvLoadError> {
    let target_percent = match row.target_percent {
        None => 0,
        Some(value) => u8::try_from(value).map_err(|_| CsvLoadError::Invalid {
            row: row_number,
            source: ValidationError::PercentOutOfRange {
                field: EntryField::TargetPercent,
                value,
            },
        })?,
    };
    let new_hires = match row.new_hires {
        None => 0,
        Some(value) => u32::try_from(value).map_err(|_| CsvLoadError::Invalid {
            row: row_number,
            source: ValidationError::InvalidCount {
                field: EntryField::NewHires,
                input: value.to_string(),
            },
        })?,
    };

    Ok(RawEntry {
        date: row.date,
        registered_by: row.registered_by,
        bank_balance: row.bank_balance.unwrap_or_default(),
        sales: row.sales.unwrap_or_default(),
        purchase: row.purchase.unwrap_or_default(),
        sell_return: row.sell_return.unwrap_or_default(),
        expenses: row.expenses.unwrap_or_default(),
        salary: row.salary.unwrap_or_default(),
        ad_spend: row.ad_spend.unwrap_or_default(),
        closing_stock: row.closing_stock.unwrap_or_default(),
        target_revenue: row.target_revenue.unwrap_or_default(),
        target_net_profit: row.target_net_profit.unwrap_or_default(),
        target_percent,
        new_hires,
    })
}

/// Parse CSV text and return the entries in file order.
///
/// # Errors
///
/// * [CsvLoadError::Parse] – the CSV is structurally invalid, `date` is
///   missing, or a cell has the wrong type.
/// * [CsvLoadError::Invalid] – a `target_percent` or `new_hires` value does
///   not fit the entry.
pub fn load_from_str(input: &str) -> Result<Vec<RawEntry>, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All) // tolerate whitespace around values
        .flexible(false) // strict column count
        .from_reader(input.as_bytes());

    let entries = reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            let row_number = idx + 1; // 1-based for user-facing messages
            convert_row(row, row_number)
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(rows = entries.len(), "entries parsed from CSV");
    Ok(entries)
}

/// Convenience wrapper: read a file from disk and delegate to [load_from_str].
pub fn load_from_file(path: &Path) -> Result<Vec<RawEntry>, CsvLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CsvLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&contents)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    const MINIMAL_CSV: &str = "\
date
2025-01-31
";

    const LIQUIDITY_CSV: &str = "\
date,bank_balance,purchase,sales,sell_return,expenses,salary,closing_stock,target_percent,target_revenue
2025-01-31,500.00,300.00,1000.00,0,100.00,200.00,50.00,70,
2025-02-28,900.00,250.00,1200.00,20.00,90.00,200.00,75.00,60,15000.00
";

    const HIRE_CSV: &str = "\
new_hires,sales,purchase,expenses,salary,ad_spend,date,registered_by
2,5000,1000,500,800,200,2025-03-01,Nadia
0,4000,900,450,800,150,2025-03-02,
";

    // -----------------------------------------------------------------------
    // 1. Minimal CSV – only the date, everything else zero
    // -----------------------------------------------------------------------
    #[test]
    fn test_minimal_csv_defaults_to_zero() {
        let entries = load_from_str(MINIMAL_CSV).expect("should parse minimal CSV");

        assert_eq!(entries.len(), 1);
        let date = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        assert_eq!(entries[0], RawEntry::new(date));
    }

    // -----------------------------------------------------------------------
    // 2. Full liquidity rows – values and file order
    // -----------------------------------------------------------------------
    #[test]
    fn test_liquidity_rows_in_file_order() {
        let entries = load_from_str(LIQUIDITY_CSV).expect("should parse");

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].date.to_string(), "2025-01-31");
        assert_eq!(entries[1].date.to_string(), "2025-02-28");
    }

    #[test]
    fn test_liquidity_row_values() {
        let entries = load_from_str(LIQUIDITY_CSV).expect("should parse");
        let e = &entries[1];

        assert_eq!(e.bank_balance, dec!(900.00));
        assert_eq!(e.purchase, dec!(250.00));
        assert_eq!(e.sales, dec!(1200.00));
        assert_eq!(e.sell_return, dec!(20.00));
        assert_eq!(e.expenses, dec!(90.00));
        assert_eq!(e.salary, dec!(200.00));
        assert_eq!(e.closing_stock, dec!(75.00));
        assert_eq!(e.target_percent, 60);
        assert_eq!(e.target_revenue, dec!(15000.00));
    }

    #[test]
    fn test_empty_cell_is_zero() {
        let entries = load_from_str(LIQUIDITY_CSV).expect("should parse");

        assert_eq!(entries[0].target_revenue, Decimal::ZERO);
    }

    // -----------------------------------------------------------------------
    // 3. Column order does not matter; optional text
    // -----------------------------------------------------------------------
    #[test]
    fn test_columns_matched_by_name() {
        let entries = load_from_str(HIRE_CSV).expect("should parse");

        assert_eq!(entries[0].new_hires, 2);
        assert_eq!(entries[0].ad_spend, dec!(200));
        assert_eq!(entries[0].registered_by.as_deref(), Some("Nadia"));
        assert_eq!(entries[1].registered_by, None);
    }

    // -----------------------------------------------------------------------
    // 4. Errors
    // -----------------------------------------------------------------------
    #[test]
    fn test_non_numeric_amount_is_parse_error() {
        let csv = "date,sales\n2025-01-31,lots\n";

        let err = load_from_str(csv).unwrap_err();

        assert!(matches!(err, CsvLoadError::Parse(_)));
    }

    #[test]
    fn test_missing_date_column_is_parse_error() {
        let csv = "sales\n100\n";

        let err = load_from_str(csv).unwrap_err();

        assert!(matches!(err, CsvLoadError::Parse(_)));
    }

    #[test]
    fn test_bad_date_is_parse_error() {
        let csv = "date,sales\n31/01/2025,100\n";

        assert!(matches!(load_from_str(csv), Err(CsvLoadError::Parse(_))));
    }

    #[test]
    fn test_negative_percent_reports_row() {
        let csv = "date,target_percent\n2025-01-01,50\n2025-01-02,-5\n";

        let err = load_from_str(csv).unwrap_err();

        match err {
            CsvLoadError::Invalid { row, source } => {
                assert_eq!(row, 2);
                assert_eq!(source.field(), EntryField::TargetPercent);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_percent_above_hundred_is_left_for_validation() {
        // Fits in the entry; the session's range check rejects it later.
        let csv = "date,target_percent\n2025-01-01,150\n";

        let entries = load_from_str(csv).expect("should parse");

        assert_eq!(entries[0].target_percent, 150);
        assert!(entries[0].validate().is_err());
    }

    #[test]
    fn test_negative_hires_reports_row() {
        let csv = "date,new_hires\n2025-01-01,-1\n";

        let err = load_from_str(csv).unwrap_err();

        assert!(matches!(err, CsvLoadError::Invalid { row: 1, .. }));
    }

    #[test]
    fn test_ragged_row_is_rejected() {
        let csv = "date,sales\n2025-01-01,100,200\n";

        assert!(matches!(load_from_str(csv), Err(CsvLoadError::Parse(_))));
    }

    #[test]
    fn test_header_only_is_empty() {
        let entries = load_from_str("date,sales\n").expect("should parse");

        assert!(entries.is_empty());
    }
}
