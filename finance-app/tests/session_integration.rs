//! End-to-end tests: config file → entries CSV → session → table, CSV export
//! and report on disk.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use finance_app::config::{Config, Overrides};
use finance_app::{EntryForm, Session, SubmitError};
use finance_core::{FormulaProfile, Metric};
use finance_data::{entries, ledger};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use tempfile::tempdir;

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Submits every fixture row and returns the session plus the rejections.
fn record_fixture(config: &Config) -> (Session, Vec<(usize, SubmitError)>) {
    let mut session = Session::new(config.profile, config.report.clone());
    let mut rejected = Vec::new();

    let loaded = entries::load_from_file(&fixture_path("hire_entries.csv")).unwrap();
    for (idx, entry) in loaded.into_iter().enumerate() {
        if let Err(error) = session.submit(entry) {
            rejected.push((idx + 1, error));
        }
    }
    (session, rejected)
}

fn config() -> Config {
    Config::load(&fixture_path("tracker.toml")).unwrap()
}

#[test]
fn test_config_fixture_selects_hire_impact() {
    let config = config();

    assert_eq!(config.profile, FormulaProfile::HireImpact);
    assert_eq!(config.report.file_prefix, "Shop_Report");
    assert_eq!(config.export.csv_file, PathBuf::from("shop_data.csv"));
}

#[test]
fn test_invalid_row_is_skipped_and_others_recorded() {
    let (session, rejected) = record_fixture(&config());

    assert_eq!(session.ledger().len(), 3);
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].0, 3);
    assert!(matches!(rejected[0].1, SubmitError::Invalid(_)));
}

#[test]
fn test_recorded_metrics_match_hire_scenario() {
    let (session, _) = record_fixture(&config());
    let records = session.ledger().all();

    assert_eq!(records[0].metrics().get(Metric::AdjustedProfit), Some(dec!(14500)));
    assert_eq!(records[1].metrics().get(Metric::AdjustedProfit), Some(dec!(1700)));
    assert_eq!(records[2].metrics().get(Metric::Profit), Some(dec!(2000)));
    assert_eq!(records[2].metrics().get(Metric::AdjustedProfit), Some(dec!(8000)));
}

#[test]
fn test_lean_profile_override_changes_constants() {
    let config = config().apply(Overrides {
        profile: Some(FormulaProfile::HireImpactLean),
        ..Overrides::default()
    });

    let (session, _) = record_fixture(&config);

    assert_eq!(
        session.ledger().all()[0].metrics().get(Metric::AdjustedProfit),
        Some(dec!(6500))
    );
}

#[test]
fn test_exported_csv_reloads_to_same_ledger() {
    let dir = tempdir().unwrap();
    let config = config();
    let path = dir.path().join(&config.export.csv_file);
    let (session, _) = record_fixture(&config);

    session.export_csv(&path).unwrap();
    let reloaded = ledger::load_from_file(config.profile, &path).unwrap();

    assert_eq!(reloaded.as_slice(), session.ledger().all());
}

#[test]
fn test_report_written_with_configured_prefix() {
    let dir = tempdir().unwrap();
    let (session, _) = record_fixture(&config());
    let generated_at = NaiveDate::from_ymd_opt(2025, 3, 5)
        .unwrap()
        .and_hms_opt(18, 0, 0)
        .unwrap();

    let path = session
        .write_report(dir.path(), generated_at, Some(PathBuf::from("chart.png")))
        .unwrap();
    let text = std::fs::read_to_string(&path).unwrap();

    assert_eq!(path.file_name().unwrap(), "Shop_Report_20250305_1800.txt");
    assert!(text.starts_with("Shop Finance Report\nGenerated: 2025-03-05 18:00\n"));
    assert!(text.contains("Expected Expense Increase"));
    assert!(text.contains("Image: chart.png"));
}

#[test]
fn test_table_shows_every_recorded_row() {
    let (session, _) = record_fixture(&config());

    let text = session.table().to_string();

    // header, rule, three rows
    assert_eq!(text.lines().count(), 5);
    assert!(text.contains("14500.00"));
}

#[test]
fn test_form_submission_through_session() {
    let config = config();
    let form = EntryForm {
        date: "2025-03-06".to_string(),
        registered_by: "Nadia".to_string(),
        sales: "5,000".to_string(),
        purchase: "1,000".to_string(),
        expenses: "500".to_string(),
        salary: "800".to_string(),
        ad_spend: "200".to_string(),
        new_hires: "2".to_string(),
        ..EntryForm::default()
    };
    let mut session = Session::new(config.profile, config.report.clone());

    let entry = form.to_entry(config.profile).unwrap();
    let record = session.submit(entry).unwrap();

    assert_eq!(record.metrics().get(Metric::AdjustedProfit), Some(dec!(14500)));
}
