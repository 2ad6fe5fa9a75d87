//! Plain-text table rendering.

use std::fmt;

use finance_core::{Column, EntryField, FormulaProfile, LedgerRecord};

use crate::utils::display_cell;

/// A grid of pre-formatted cells. Text columns are left-aligned, numeric
/// columns right-aligned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextTable {
    headers: Vec<String>,
    right_aligned: Vec<bool>,
    rows: Vec<Vec<String>>,
}

impl TextTable {
    /// Builds a table of `records` over `columns`, with the column labels as
    /// headers.
    pub fn from_records(
        columns: &[Column],
        records: &[LedgerRecord],
    ) -> Self {
        Self {
            headers: columns.iter().map(|c| c.label().to_string()).collect(),
            right_aligned: columns.iter().map(|c| is_numeric(*c)).collect(),
            rows: records
                .iter()
                .map(|record| columns.iter().map(|c| display_cell(record, *c)).collect())
                .collect(),
        }
    }

    /// The full ledger view for `profile`: every schema column.
    pub fn ledger(
        profile: FormulaProfile,
        records: &[LedgerRecord],
    ) -> Self {
        Self::from_records(&profile.columns(), records)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(idx, header)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(idx))
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or_default()
            })
            .collect()
    }

    fn write_line(
        &self,
        f: &mut fmt::Formatter<'_>,
        cells: &[String],
        widths: &[usize],
    ) -> fmt::Result {
        let mut line = String::new();
        for (idx, (cell, width)) in cells.iter().zip(widths).enumerate() {
            if idx > 0 {
                line.push_str(" | ");
            }
            // pad by chars, not bytes: "—" is multi-byte
            let pad = " ".repeat(width.saturating_sub(cell.chars().count()));
            if self.right_aligned[idx] {
                line.push_str(&pad);
                line.push_str(cell);
            } else {
                line.push_str(cell);
                line.push_str(&pad);
            }
        }
        writeln!(f, "{}", line.trim_end())
    }
}

fn is_numeric(column: Column) -> bool {
    !matches!(
        column,
        Column::Field(EntryField::Date) | Column::Field(EntryField::RegisteredBy)
    )
}

impl fmt::Display for TextTable {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let widths = self.widths();
        self.write_line(f, &self.headers, &widths)?;

        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        writeln!(f, "{}", rule.join("-+-"))?;

        for row in &self.rows {
            self.write_line(f, row, &widths)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use finance_core::{Metric, MetricsCalculator, RawEntry};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn hire_record(name: Option<&str>) -> LedgerRecord {
        let entry = RawEntry {
            registered_by: name.map(str::to_string),
            sales: dec!(5000),
            purchase: dec!(1000),
            expenses: dec!(500),
            salary: dec!(800),
            ad_spend: dec!(200),
            new_hires: 2,
            ..RawEntry::new(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap())
        };
        let metrics = MetricsCalculator::new(FormulaProfile::HireImpact)
            .calculate(&entry)
            .unwrap();
        LedgerRecord::new(entry, metrics)
    }

    // ===== TextTable::ledger tests =====

    #[test]
    fn ledger_table_has_every_schema_column() {
        let table = TextTable::ledger(FormulaProfile::HireImpact, &[hire_record(None)]);

        assert_eq!(table.headers().len(), FormulaProfile::HireImpact.columns().len());
        assert_eq!(table.headers()[0], "Date");
        assert_eq!(table.rows()[0][8], "2500.00");
        assert_eq!(table.rows()[0][11], "14500.00");
    }

    #[test]
    fn empty_ledger_renders_header_only() {
        let text = TextTable::ledger(FormulaProfile::SalesTarget, &[]).to_string();

        assert_eq!(text.lines().count(), 2);
    }

    // ===== Display tests =====

    #[test]
    fn columns_are_aligned() {
        let columns = [
            Column::Field(EntryField::Date),
            Column::Field(EntryField::RegisteredBy),
            Column::Metric(Metric::Profit),
        ];
        let records = [hire_record(Some("Nadia")), hire_record(None)];

        let text = TextTable::from_records(&columns, &records).to_string();

        assert_eq!(
            text,
            "\
Date       | Registered By |  Profit
-----------+---------------+--------
2025-03-01 | Nadia         | 2500.00
2025-03-01 | —             | 2500.00
"
        );
    }
}
