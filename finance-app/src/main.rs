use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info, warn};

use finance_app::config::{Config, Overrides};
use finance_app::{EntryForm, Session, logging};
use finance_core::calculations::common::display_amount;
use finance_core::{FormulaProfile, RawEntry};
use finance_data::{ExportError, entries};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Finance tracker: records business figures, derives profit, liquidity and
/// sales targets, and exports the ledger as a table, CSV and a text report.
#[derive(Debug, Parser)]
#[command(name = "finance-tracker", version)]
struct Cli {
    /// TOML config file. Defaults to `<program name>.toml` in the current
    /// directory when that file exists.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Formula profile, e.g. `liquidity-planner` or `hire-impact`.
    #[arg(long, global = true)]
    profile: Option<FormulaProfile>,

    /// Log level or full filter directive (e.g. `debug`, `finance_core=trace`).
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also append log output to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Hide log output on the terminal.
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Submit every row of an entries CSV and print the ledger.
    Record {
        /// CSV of raw entries, one submission per row.
        #[arg(long)]
        input: PathBuf,

        /// Export the ledger as CSV; without a value the configured file is used.
        #[arg(long)]
        csv_out: Option<Option<PathBuf>>,

        /// Directory to write the text report into.
        #[arg(long)]
        report_out: Option<PathBuf>,

        /// Rendered chart image to reference from the report.
        #[arg(long)]
        chart: Option<PathBuf>,
    },

    /// Submit a single entry given as flags and print its metrics.
    Entry(EntryArgs),

    /// List the formula profiles with their inputs and formulas.
    Profiles,
}

/// One form submission. Empty values count as zero.
#[derive(Debug, Args)]
struct EntryArgs {
    /// Entry date (YYYY-MM-DD); today when omitted.
    #[arg(long)]
    date: Option<String>,
    #[arg(long, default_value = "")]
    registered_by: String,
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    bank_balance: String,
    #[arg(long, default_value = "")]
    sales: String,
    #[arg(long, default_value = "")]
    purchase: String,
    #[arg(long, default_value = "")]
    sell_return: String,
    #[arg(long, default_value = "")]
    expenses: String,
    #[arg(long, default_value = "")]
    salary: String,
    #[arg(long, default_value = "")]
    ad_spend: String,
    #[arg(long, default_value = "")]
    closing_stock: String,
    #[arg(long, default_value = "")]
    target_revenue: String,
    #[arg(long, default_value = "")]
    target_net_profit: String,
    #[arg(long, default_value = "")]
    target_percent: String,
    #[arg(long, default_value = "")]
    new_hires: String,
}

impl From<EntryArgs> for EntryForm {
    fn from(args: EntryArgs) -> Self {
        let today = EntryForm::new();
        Self {
            date: args.date.unwrap_or(today.date),
            registered_by: args.registered_by,
            bank_balance: args.bank_balance,
            sales: args.sales,
            purchase: args.purchase,
            sell_return: args.sell_return,
            expenses: args.expenses,
            salary: args.salary,
            ad_spend: args.ad_spend,
            closing_stock: args.closing_stock,
            target_revenue: args.target_revenue,
            target_net_profit: args.target_net_profit,
            target_percent: args.target_percent,
            new_hires: args.new_hires,
        }
    }
}

// ─── setup ───────────────────────────────────────────────────────────────────

/// Loads the config file, applies the flags and configures logging.
fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let fallback = PathBuf::from(format!("{}.toml", logging::app_name()));
    let config = Config::resolve(cli.config.as_deref(), &fallback)?.apply(Overrides {
        profile: cli.profile,
        log_level: cli.log_level.clone(),
        log_file: cli.log_file.clone(),
    });

    if let Some(level) = &config.logging.level {
        logging::set_log_level(level)?;
    }
    if let Some(file) = &config.logging.file {
        logging::enable_file_logging(file)?;
    }
    if cli.quiet {
        logging::set_terminal_enabled(false)?;
    }

    debug!(profile = %config.profile, "configuration resolved");
    Ok(config)
}

/// Treats "nothing to export" as a warning that has already been logged.
fn soft<T>(result: Result<T, ExportError>) -> Result<Option<T>, ExportError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(ExportError::EmptyLedger) => Ok(None),
        Err(error) => Err(error),
    }
}

// ─── commands ────────────────────────────────────────────────────────────────

fn record(
    config: &Config,
    input: &Path,
    csv_out: Option<Option<PathBuf>>,
    report_out: Option<PathBuf>,
    chart: Option<PathBuf>,
) -> anyhow::Result<()> {
    let loaded = entries::load_from_file(input)
        .with_context(|| format!("failed to load entries from '{}'", input.display()))?;

    let mut session = Session::new(config.profile, config.report.clone());
    let mut rejected = 0usize;
    for (idx, entry) in loaded.into_iter().enumerate() {
        if let Err(error) = session.submit(entry) {
            rejected += 1;
            warn!(row = idx + 1, %error, "row skipped");
        }
    }
    info!(
        recorded = session.ledger().len(),
        rejected,
        profile = %session.profile(),
        "input processed"
    );

    print!("{}", session.table());

    if let Some(path) = csv_out {
        let path = path.unwrap_or_else(|| config.export.csv_file.clone());
        soft(session.export_csv(&path))
            .with_context(|| format!("failed to export CSV to '{}'", path.display()))?;
    }

    if let Some(dir) = report_out {
        if let Some(path) = soft(session.write_report(&dir, Local::now().naive_local(), chart))
            .with_context(|| format!("failed to write report into '{}'", dir.display()))?
        {
            println!("Report written to {}", path.display());
        }
    }

    Ok(())
}

fn entry(
    config: &Config,
    args: EntryArgs,
) -> anyhow::Result<()> {
    let form = EntryForm::from(args);
    let entry: RawEntry = match form.to_entry(config.profile) {
        Ok(entry) => entry,
        Err(errors) => {
            for error in &errors {
                warn!(field = %error.field(), "{error}");
            }
            anyhow::bail!("entry has {} invalid field(s)", errors.len());
        }
    };

    let mut session = Session::new(config.profile, config.report.clone());
    let record = session.submit(entry).context("entry rejected")?;

    println!("{} ({})", record.entry().date, config.profile.label());
    for (metric, value) in record.metrics().iter() {
        println!("  {:<26} {:>14}", metric.label(), display_amount(value));
    }
    Ok(())
}

fn profiles(only: Option<FormulaProfile>) {
    let selected: Vec<FormulaProfile> = match only {
        Some(profile) => vec![profile],
        None => FormulaProfile::ALL.to_vec(),
    };

    for profile in selected {
        println!("{} ({})", profile.key(), profile.label());
        let inputs: Vec<&str> = profile.inputs().iter().map(|f| f.key()).collect();
        println!("  inputs: {}", inputs.join(", "));
        for (metric, formula) in profile.formulas() {
            println!("  {} = {}", metric.key(), formula);
        }
        println!();
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    logging::init_default_logging();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Command::Record {
            input,
            csv_out,
            report_out,
            chart,
        } => record(&config, &input, csv_out, report_out, chart),
        Command::Entry(args) => entry(&config, args),
        Command::Profiles => {
            profiles(cli.profile);
            Ok(())
        }
    }
}
