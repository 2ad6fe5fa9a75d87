//! Session state for the finance tracker.
//!
//! A [`Session`] owns the ledger for one run of the tool together with the
//! calculator for the active profile and the report settings. Nothing here
//! is global: two sessions never share records.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use finance_core::{
    FormulaProfile, Ledger, LedgerRecord, MetricsCalculator, MetricsError, RawEntry,
    ValidationError,
};
use finance_data::{ExportError, export};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::ReportConfig;
use crate::report::{self, ReportDocument};
use crate::table::TextTable;

/// Why a submission was rejected. The ledger is unchanged in every case.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Metrics(#[from] MetricsError),
}

#[derive(Debug, Clone)]
pub struct Session {
    calculator: MetricsCalculator,
    ledger: Ledger,
    report: ReportConfig,
}

impl Session {
    pub fn new(
        profile: FormulaProfile,
        report: ReportConfig,
    ) -> Self {
        Self {
            calculator: MetricsCalculator::new(profile),
            ledger: Ledger::new(),
            report,
        }
    }

    pub fn profile(&self) -> FormulaProfile {
        self.calculator.profile()
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn report_settings(&self) -> &ReportConfig {
        &self.report
    }

    /// Validates `entry`, derives its metrics and appends the record.
    ///
    /// Fields the profile does not collect are reset to zero first, so they
    /// are neither range-checked nor stored. The record is only appended
    /// once every step has succeeded.
    ///
    /// # Errors
    ///
    /// * [SubmitError::Invalid] – a range check failed.
    /// * [SubmitError::Metrics] – a formula could not be evaluated.
    pub fn submit(
        &mut self,
        entry: RawEntry,
    ) -> Result<&LedgerRecord, SubmitError> {
        let entry = entry.restricted_to(self.profile().inputs());
        let result = entry
            .validate()
            .map_err(SubmitError::from)
            .and_then(|()| self.calculator.calculate(&entry).map_err(SubmitError::from));

        let metrics = match result {
            Ok(metrics) => metrics,
            Err(error) => {
                warn!(date = %entry.date, %error, "submission rejected");
                return Err(error);
            }
        };

        self.ledger.append(LedgerRecord::new(entry, metrics));
        info!(
            profile = %self.profile(),
            records = self.ledger.len(),
            "entry recorded"
        );

        // just appended, so the ledger cannot be empty
        Ok(&self.ledger.all()[self.ledger.len() - 1])
    }

    /// The full ledger as a text table.
    pub fn table(&self) -> TextTable {
        TextTable::ledger(self.profile(), self.ledger.all())
    }

    /// The ledger as CSV text.
    ///
    /// # Errors
    ///
    /// [ExportError::EmptyLedger] while nothing has been recorded.
    pub fn csv_text(&self) -> Result<String, ExportError> {
        export::to_csv_string(self.profile(), self.ledger.all())
    }

    /// Writes the ledger as CSV to `path` and returns the number of rows.
    ///
    /// An empty ledger writes no file.
    pub fn export_csv(
        &self,
        path: &Path,
    ) -> Result<usize, ExportError> {
        export::write_csv_file(self.profile(), self.ledger.all(), path)
    }

    /// Describes the report for the current ledger.
    pub fn report(
        &self,
        generated_at: NaiveDateTime,
        chart_image: Option<PathBuf>,
    ) -> Result<ReportDocument, ExportError> {
        report::build_report(
            self.profile(),
            self.ledger.all(),
            &self.report,
            generated_at,
            chart_image,
        )
    }

    /// Builds the report and writes it into `dir` as
    /// `<file_prefix>_<YYYYmmdd_HHMM>.txt`.
    pub fn write_report(
        &self,
        dir: &Path,
        generated_at: NaiveDateTime,
        chart_image: Option<PathBuf>,
    ) -> Result<PathBuf, ExportError> {
        self.report(generated_at, chart_image)?
            .write_to_dir(dir, &self.report.file_prefix)
    }
}
