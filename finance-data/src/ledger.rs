//! Reads back a ledger previously written by [`crate::export`].
//!
//! Headers are matched by name against the profile's schema; every schema
//! column must be present and no others are allowed. Values are parsed at
//! full precision, so `export → load` reproduces numerically equal records.

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use finance_core::{
    Column, DerivedMetrics, EntryField, FormulaProfile, LedgerRecord, Metric, RawEntry,
};
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::CsvLoadError;

/// Maps each schema column to its position in the file.
fn resolve_columns(
    profile: FormulaProfile,
    headers: &csv::StringRecord,
) -> Result<HashMap<Column, usize>, CsvLoadError> {
    let schema = profile.columns();
    let mut positions = HashMap::with_capacity(schema.len());

    for (idx, header) in headers.iter().enumerate() {
        let column = EntryField::parse(header)
            .map(Column::Field)
            .or_else(|| Metric::parse(header).map(Column::Metric))
            .ok_or_else(|| CsvLoadError::UnknownColumn(header.to_string()))?;
        if !schema.contains(&column) {
            return Err(CsvLoadError::UnexpectedColumn {
                column: header.to_string(),
                profile,
            });
        }
        positions.insert(column, idx);
    }

    if let Some(missing) = schema.iter().find(|column| !positions.contains_key(column)) {
        return Err(CsvLoadError::MissingColumn {
            column: missing.key(),
            profile,
        });
    }

    Ok(positions)
}

fn invalid(
    row: usize,
    column: Column,
    value: &str,
) -> CsvLoadError {
    CsvLoadError::InvalidCell {
        row,
        column: column.key(),
        value: value.to_string(),
    }
}

fn parse_decimal(
    row: usize,
    column: Column,
    value: &str,
) -> Result<Decimal, CsvLoadError> {
    if value.is_empty() {
        return Ok(Decimal::ZERO);
    }
    Decimal::from_str(value).map_err(|_| invalid(row, column, value))
}

/// Stores one input cell on `entry`.
fn set_field(
    entry: &mut RawEntry,
    field: EntryField,
    value: &str,
    row: usize,
) -> Result<(), CsvLoadError> {
    let column = Column::Field(field);
    match field {
        EntryField::Date => {
            entry.date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map_err(|_| invalid(row, column, value))?;
        }
        EntryField::RegisteredBy => {
            entry.registered_by = (!value.is_empty()).then(|| value.to_string());
        }
        EntryField::TargetPercent => {
            entry.target_percent = value.parse().map_err(|_| invalid(row, column, value))?;
        }
        EntryField::NewHires => {
            entry.new_hires = value.parse().map_err(|_| invalid(row, column, value))?;
        }
        EntryField::BankBalance => entry.bank_balance = parse_decimal(row, column, value)?,
        EntryField::Sales => entry.sales = parse_decimal(row, column, value)?,
        EntryField::Purchase => entry.purchase = parse_decimal(row, column, value)?,
        EntryField::SellReturn => entry.sell_return = parse_decimal(row, column, value)?,
        EntryField::Expenses => entry.expenses = parse_decimal(row, column, value)?,
        EntryField::Salary => entry.salary = parse_decimal(row, column, value)?,
        EntryField::AdSpend => entry.ad_spend = parse_decimal(row, column, value)?,
        EntryField::ClosingStock => entry.closing_stock = parse_decimal(row, column, value)?,
        EntryField::TargetRevenue => entry.target_revenue = parse_decimal(row, column, value)?,
        EntryField::TargetNetProfit => {
            entry.target_net_profit = parse_decimal(row, column, value)?
        }
    }
    Ok(())
}

fn convert_record(
    profile: FormulaProfile,
    positions: &HashMap<Column, usize>,
    record: &csv::StringRecord,
    row: usize,
) -> Result<LedgerRecord, CsvLoadError> {
    let cell = |column: Column| record.get(positions[&column]).unwrap_or_default();

    // every schema starts with `date`, so the placeholder is always replaced
    let mut entry = RawEntry::new(NaiveDate::default());
    for field in profile.inputs() {
        set_field(&mut entry, *field, cell(Column::Field(*field)), row)?;
    }

    let values = profile
        .outputs()
        .map(|metric| {
            let column = Column::Metric(metric);
            parse_decimal(row, column, cell(column)).map(|value| (metric, value))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(LedgerRecord::new(
        entry,
        DerivedMetrics::from_values(profile, values),
    ))
}

/// Parse an exported ledger for `profile`. Rows are returned in file order.
///
/// # Errors
///
/// * [CsvLoadError::UnknownColumn] / [CsvLoadError::UnexpectedColumn] /
///   [CsvLoadError::MissingColumn] – the header does not match the schema.
/// * [CsvLoadError::InvalidCell] – a cell cannot be parsed (1-based row).
/// * [CsvLoadError::Parse] – the CSV itself is malformed.
pub fn load_from_str(
    profile: FormulaProfile,
    input: &str,
) -> Result<Vec<LedgerRecord>, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(input.as_bytes());

    let positions = resolve_columns(profile, reader.headers()?)?;

    let records = reader
        .records()
        .enumerate()
        .map(|(idx, result)| {
            let record = result?;
            convert_record(profile, &positions, &record, idx + 1)
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(profile = %profile, rows = records.len(), "ledger loaded from CSV");
    Ok(records)
}

pub fn load_from_file(
    profile: FormulaProfile,
    path: &Path,
) -> Result<Vec<LedgerRecord>, CsvLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CsvLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(profile, &contents)
}
