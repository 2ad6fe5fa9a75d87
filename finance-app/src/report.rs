//! Ledger report: a document description and its plain-text rendering.
//!
//! [`build_report`] turns the ledger into a [`ReportDocument`]: a title
//! block, a fixed subset of columns formatted to two decimals, and a
//! [`ChartSpec`] describing the Sales / Expenses / Profit line chart. Drawing
//! the chart is left to whatever consumes the spec; the document only carries
//! the path of an already rendered image.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use finance_core::calculations::common::display_amount;
use finance_core::{Column, EntryField, FormulaProfile, LedgerRecord, Metric};
use finance_data::ExportError;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::config::ReportConfig;
use crate::table::TextTable;

/// Columns a report shows when the profile has them, in this order.
const REPORT_COLUMNS: [Column; 6] = [
    Column::Field(EntryField::Date),
    Column::Field(EntryField::Sales),
    Column::Field(EntryField::Expenses),
    Column::Field(EntryField::Salary),
    Column::Metric(Metric::Profit),
    Column::Field(EntryField::TargetRevenue),
];

const CHART_SERIES: [Column; 3] = [
    Column::Field(EntryField::Sales),
    Column::Field(EntryField::Expenses),
    Column::Metric(Metric::Profit),
];

/// One line of the chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSeries {
    pub label: &'static str,
    pub points: Vec<(NaiveDate, Decimal)>,
}

/// Description of the report chart: one line per series, dates on the x-axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSpec {
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: String,
    pub series: Vec<ChartSeries>,
    /// An already rendered image of the chart, if any.
    pub image: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDocument {
    pub title: String,
    pub generated_at: NaiveDateTime,
    pub profile: FormulaProfile,
    pub table: TextTable,
    pub chart: ChartSpec,
}

/// The report columns for `profile`.
///
/// `date`, `sales`, `expenses`, `salary`, `profit` and `target_revenue`
/// where the profile has them. Each missing one is replaced by the next of
/// the profile's outputs not already shown, so every report has the same
/// width.
pub fn report_columns(profile: FormulaProfile) -> Vec<Column> {
    let schema = profile.columns();
    let mut spare = profile
        .outputs()
        .map(Column::Metric)
        .filter(|column| !REPORT_COLUMNS.contains(column));

    REPORT_COLUMNS
        .iter()
        .filter_map(|column| {
            if schema.contains(column) {
                Some(*column)
            } else {
                spare.next()
            }
        })
        .collect()
}

/// The Sales / Expenses / Profit chart over `records`.
pub fn chart_spec(
    records: &[LedgerRecord],
    currency: &str,
    image: Option<PathBuf>,
) -> ChartSpec {
    let series = CHART_SERIES
        .iter()
        .map(|column| ChartSeries {
            label: column.label(),
            points: records
                .iter()
                .map(|record| {
                    let value = record.amount(*column).unwrap_or_default();
                    (record.entry().date, value)
                })
                .collect(),
        })
        .collect();

    ChartSpec {
        title: "Sales, Expenses & Profit",
        x_label: "Date",
        y_label: format!("Amount ({currency})"),
        series,
        image,
    }
}

/// Describes the report for `records`.
///
/// # Errors
///
/// [`ExportError::EmptyLedger`] when there is nothing to report.
pub fn build_report(
    profile: FormulaProfile,
    records: &[LedgerRecord],
    settings: &ReportConfig,
    generated_at: NaiveDateTime,
    chart_image: Option<PathBuf>,
) -> Result<ReportDocument, ExportError> {
    if records.is_empty() {
        warn!("no data to report");
        return Err(ExportError::EmptyLedger);
    }

    Ok(ReportDocument {
        title: settings.title.clone(),
        generated_at,
        profile,
        table: TextTable::from_records(&report_columns(profile), records),
        chart: chart_spec(records, &settings.currency, chart_image),
    })
}

impl ReportDocument {
    /// `<prefix>_<YYYYmmdd_HHMM>.txt`, stamped with the generation time.
    pub fn file_name(
        &self,
        prefix: &str,
    ) -> String {
        format!("{prefix}_{}.txt", self.generated_at.format("%Y%m%d_%H%M"))
    }

    /// Writes the text rendering into `dir` and returns the file's path.
    pub fn write_to_dir(
        &self,
        dir: &Path,
        prefix: &str,
    ) -> Result<PathBuf, ExportError> {
        let path = dir.join(self.file_name(prefix));
        fs::write(&path, self.to_string())?;
        info!(path = %path.display(), rows = self.table.rows().len(), "report written");
        Ok(path)
    }
}

impl fmt::Display for ReportDocument {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "Generated: {}", self.generated_at.format("%Y-%m-%d %H:%M"))?;
        writeln!(f, "Profile: {}", self.profile.label())?;
        writeln!(f)?;
        write!(f, "{}", self.table)?;
        writeln!(f)?;
        write!(f, "{}", self.chart)
    }
}

impl fmt::Display for ChartSpec {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "Chart: {} ({} by {})", self.title, self.y_label, self.x_label)?;
        for series in &self.series {
            let points: Vec<String> = series
                .points
                .iter()
                .map(|(date, value)| format!("{date} {}", display_amount(*value)))
                .collect();
            writeln!(f, "  {}: {}", series.label, points.join(", "))?;
        }
        if let Some(image) = &self.image {
            writeln!(f, "  Image: {}", image.display())?;
        }
        Ok(())
    }
}
