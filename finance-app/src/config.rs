//! Optional TOML configuration for `finance-tracker`.
//!
//! Every key has a default, so an empty file (or no file at all) is valid:
//!
//! ```toml
//! profile = "liquidity-required-sales"
//!
//! [report]
//! title = "Finance Report"
//! currency = "BDT"
//! file_prefix = "Finance_Report"
//!
//! [export]
//! csv_file = "finance_data.csv"
//!
//! [logging]
//! level = "debug"
//! file = "finance-tracker.log"
//! ```
//!
//! Command-line flags override file values through [`Config::apply`].

use std::path::{Path, PathBuf};

use finance_core::FormulaProfile;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Formula profile used for every entry of the session.
    pub profile: FormulaProfile,
    pub report: ReportConfig,
    pub export: ExportConfig,
    pub logging: LoggingConfig,
}

/// Report title, currency label and output file prefix.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub title: String,
    /// Shown on the chart's y-axis, e.g. "Amount (BDT)".
    pub currency: String,
    /// Reports are written as `<file_prefix>_<YYYYmmdd_HHMM>.txt`.
    pub file_prefix: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: "Finance Report".to_string(),
            currency: "BDT".to_string(),
            file_prefix: "Finance_Report".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Default target of `record --csv-out` when no path is given.
    pub csv_file: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            csv_file: PathBuf::from("finance_data.csv"),
        }
    }
}

/// `None` leaves the matching setting to `RUST_LOG` / the built-in default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub file: Option<PathBuf>,
}

/// Values given on the command line. Each `Some` wins over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub profile: Option<FormulaProfile>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn from_toml_str(input: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(input)
    }

    /// Reads and parses the file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), profile = %config.profile, "config loaded");
        Ok(config)
    }

    /// Loads `explicit` when given. Otherwise loads `fallback` if that file
    /// exists, or returns the defaults.
    ///
    /// A missing `explicit` file is an error; a missing `fallback` is not.
    pub fn resolve(
        explicit: Option<&Path>,
        fallback: &Path,
    ) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None if fallback.is_file() => Self::load(fallback),
            None => Ok(Self::default()),
        }
    }

    pub fn apply(
        mut self,
        overrides: Overrides,
    ) -> Self {
        if let Some(profile) = overrides.profile {
            self.profile = profile;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = Some(level);
        }
        if let Some(file) = overrides.log_file {
            self.logging.file = Some(file);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    // ===== from_toml_str tests =====

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_toml_str("").unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.profile, FormulaProfile::LiquidityPlanner);
        assert_eq!(config.report.title, "Finance Report");
        assert_eq!(config.export.csv_file, PathBuf::from("finance_data.csv"));
        assert_eq!(config.logging.level, None);
    }

    #[test]
    fn full_file_is_read() {
        let input = r#"
profile = "hire-impact-lean"

[report]
title = "Shop Finance Report"
currency = "USD"
file_prefix = "Shop_Report"

[export]
csv_file = "out/shop.csv"

[logging]
level = "debug"
file = "tracker.log"
"#;

        let config = Config::from_toml_str(input).unwrap();

        assert_eq!(config.profile, FormulaProfile::HireImpactLean);
        assert_eq!(config.report.title, "Shop Finance Report");
        assert_eq!(config.report.currency, "USD");
        assert_eq!(config.report.file_prefix, "Shop_Report");
        assert_eq!(config.export.csv_file, PathBuf::from("out/shop.csv"));
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
        assert_eq!(config.logging.file, Some(PathBuf::from("tracker.log")));
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config = Config::from_toml_str("[report]\ncurrency = \"EUR\"\n").unwrap();

        assert_eq!(config.report.currency, "EUR");
        assert_eq!(config.report.title, "Finance Report");
    }

    #[test]
    fn unknown_profile_is_rejected() {
        assert!(Config::from_toml_str("profile = \"cash-flow\"").is_err());
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert!(Config::from_toml_str("[report]\ntitel = \"typo\"\n").is_err());
    }

    // ===== load / resolve tests =====

    #[test]
    fn load_reports_path_on_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "profile = 42").unwrap();

        let err = Config::load(file.path()).unwrap_err();

        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn resolve_without_files_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();

        let config = Config::resolve(None, &dir.path().join("absent.toml")).unwrap();

        assert_eq!(config, Config::default());
    }

    #[test]
    fn resolve_reads_fallback_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let fallback = dir.path().join("finance-tracker.toml");
        std::fs::write(&fallback, "profile = \"sales-target\"\n").unwrap();

        let config = Config::resolve(None, &fallback).unwrap();

        assert_eq!(config.profile, FormulaProfile::SalesTarget);
    }

    #[test]
    fn resolve_requires_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");

        let err = Config::resolve(Some(&missing), &missing).unwrap_err();

        assert!(matches!(err, ConfigError::Io { .. }));
    }

    // ===== apply tests =====

    #[test]
    fn overrides_win_over_file_values() {
        let config = Config::from_toml_str("profile = \"sales-target\"\n[logging]\nlevel = \"warn\"\n")
            .unwrap()
            .apply(Overrides {
                profile: Some(FormulaProfile::HireImpact),
                log_level: Some("trace".to_string()),
                log_file: None,
            });

        assert_eq!(config.profile, FormulaProfile::HireImpact);
        assert_eq!(config.logging.level.as_deref(), Some("trace"));
        assert_eq!(config.logging.file, None);
    }

    #[test]
    fn empty_overrides_keep_file_values() {
        let original = Config::from_toml_str("profile = \"sales-target\"\n").unwrap();

        let config = original.clone().apply(Overrides::default());

        assert_eq!(config, original);
    }
}
