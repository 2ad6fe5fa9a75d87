//! CSV export of a ledger.
//!
//! The header lists the profile's columns in schema order: the fields its
//! form collects, then the metrics it derives. Values are written as plain
//! decimal text at full precision, with no currency symbol and no thousands
//! separator, so re-importing the file reproduces the same numbers.

use std::fs::File;
use std::io;
use std::path::Path;

use finance_core::{Column, EntryField, FormulaProfile, LedgerRecord};
use tracing::{info, warn};

use crate::error::ExportError;

/// Text written for one cell of `record`.
fn cell(
    record: &LedgerRecord,
    column: Column,
) -> String {
    match column {
        Column::Field(EntryField::Date) => record.entry().date.format("%Y-%m-%d").to_string(),
        Column::Field(EntryField::RegisteredBy) => {
            record.entry().registered_by.clone().unwrap_or_default()
        }
        column => record
            .amount(column)
            .map(|value| value.to_string())
            .unwrap_or_default(),
    }
}

fn check_profiles(
    profile: FormulaProfile,
    records: &[LedgerRecord],
) -> Result<(), ExportError> {
    if records.is_empty() {
        warn!("no data to export");
        return Err(ExportError::EmptyLedger);
    }
    if let Some((idx, record)) = records
        .iter()
        .enumerate()
        .find(|(_, record)| record.profile() != profile)
    {
        return Err(ExportError::ProfileMismatch {
            row: idx + 1,
            expected: profile,
            found: record.profile(),
        });
    }
    Ok(())
}

/// Writes `records` as CSV to `writer` and returns the number of data rows.
///
/// # Errors
///
/// * [ExportError::EmptyLedger] – `records` is empty; nothing is written.
/// * [ExportError::ProfileMismatch] – a record was calculated with another
///   profile; nothing is written.
/// * [ExportError::Csv] / [ExportError::Io] – the writer failed.
pub fn write_csv<W: io::Write>(
    profile: FormulaProfile,
    records: &[LedgerRecord],
    writer: W,
) -> Result<usize, ExportError> {
    check_profiles(profile, records)?;

    let columns = profile.columns();
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(columns.iter().map(Column::key))?;
    for record in records {
        csv_writer.write_record(columns.iter().map(|column| cell(record, *column)))?;
    }
    csv_writer.flush()?;

    Ok(records.len())
}

/// Renders `records` as CSV text.
pub fn to_csv_string(
    profile: FormulaProfile,
    records: &[LedgerRecord],
) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_csv(profile, records, &mut buffer)?;
    // csv only ever writes the UTF-8 it was given
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Writes `records` to a CSV file at `path`.
///
/// The file is only created once the records have been checked, so an empty
/// ledger never leaves an empty file behind.
pub fn write_csv_file(
    profile: FormulaProfile,
    records: &[LedgerRecord],
    path: &Path,
) -> Result<usize, ExportError> {
    check_profiles(profile, records)?;

    let file = File::create(path)?;
    let rows = write_csv(profile, records, file)?;
    info!(path = %path.display(), rows, "ledger exported to CSV");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use finance_core::{MetricsCalculator, RawEntry};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn record(
        profile: FormulaProfile,
        entry: RawEntry,
    ) -> LedgerRecord {
        let metrics = MetricsCalculator::new(profile).calculate(&entry).unwrap();
        LedgerRecord::new(entry, metrics)
    }

    fn hire_entry() -> RawEntry {
        RawEntry {
            registered_by: Some("Nadia".to_string()),
            sales: dec!(5000),
            purchase: dec!(1000),
            expenses: dec!(500),
            salary: dec!(800),
            ad_spend: dec!(200),
            new_hires: 2,
            ..RawEntry::new(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap())
        }
    }

    #[test]
    fn header_follows_profile_schema() {
        let records = vec![record(FormulaProfile::HireImpact, hire_entry())];

        let text = to_csv_string(FormulaProfile::HireImpact, &records).unwrap();

        assert_eq!(
            text.lines().next(),
            Some(
                "date,registered_by,sales,purchase,expenses,salary,ad_spend,new_hires,profit,expense_increase,revenue_boost,adjusted_profit"
            )
        );
    }

    #[test]
    fn values_are_plain_decimal_text() {
        let records = vec![record(FormulaProfile::HireImpact, hire_entry())];

        let text = to_csv_string(FormulaProfile::HireImpact, &records).unwrap();

        assert_eq!(
            text.lines().nth(1),
            Some("2025-03-01,Nadia,5000,1000,500,800,200,2,2500,8000,20000,14500")
        );
    }

    #[test]
    fn absent_registered_by_is_empty_cell() {
        let entry = RawEntry {
            registered_by: None,
            ..hire_entry()
        };
        let records = vec![record(FormulaProfile::HireImpact, entry)];

        let text = to_csv_string(FormulaProfile::HireImpact, &records).unwrap();

        assert!(text.lines().nth(1).unwrap().starts_with("2025-03-01,,5000"));
    }

    #[test]
    fn full_precision_is_written() {
        let entry = RawEntry {
            bank_balance: dec!(500),
            target_percent: 70,
            ..RawEntry::new(NaiveDate::from_ymd_opt(2025, 1, 31).unwrap())
        };
        let records = vec![record(FormulaProfile::LiquidityRequiredSales, entry)];

        let text = to_csv_string(FormulaProfile::LiquidityRequiredSales, &records).unwrap();

        assert!(text.contains("714.2857142857"));
    }

    #[test]
    fn text_with_commas_is_quoted() {
        let entry = RawEntry {
            registered_by: Some("Rahman, A.".to_string()),
            ..hire_entry()
        };
        let records = vec![record(FormulaProfile::HireImpact, entry)];

        let text = to_csv_string(FormulaProfile::HireImpact, &records).unwrap();

        assert!(text.contains("\"Rahman, A.\""));
    }

    #[test]
    fn empty_ledger_is_soft_error() {
        let err = to_csv_string(FormulaProfile::HireImpact, &[]).unwrap_err();

        assert!(err.is_empty_ledger());
    }

    #[test]
    fn mismatched_profile_is_rejected() {
        let records = vec![
            record(FormulaProfile::HireImpact, hire_entry()),
            record(FormulaProfile::HireImpactLean, hire_entry()),
        ];

        let err = to_csv_string(FormulaProfile::HireImpact, &records).unwrap_err();

        assert!(matches!(
            err,
            ExportError::ProfileMismatch {
                row: 2,
                expected: FormulaProfile::HireImpact,
                found: FormulaProfile::HireImpactLean,
            }
        ));
    }

    #[test]
    fn write_csv_returns_row_count() {
        let records = vec![
            record(FormulaProfile::HireImpact, hire_entry()),
            record(FormulaProfile::HireImpact, hire_entry()),
        ];
        let mut buffer = Vec::new();

        let rows = write_csv(FormulaProfile::HireImpact, &records, &mut buffer).unwrap();

        assert_eq!(rows, 2);
    }
}
