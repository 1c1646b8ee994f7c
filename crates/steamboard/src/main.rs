//! steamboard - Steam partner sales dashboard (period-over-period CLI)

mod cli;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use steamboard_core::{
    compare_periods, export_sales_to_csv, CoreError, JsonFileBackend, OptionsStore, PeriodCode,
    ReferenceInstant, SaleRecord, SalesType, SettingsBackend, SettingsStore,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "steamboard",
    version,
    about = "Steam partner sales dashboard",
    long_about = "Compares storefront sales for a reporting period against the period\n\
                  right before it.\n\
                  \n\
                  Windows are anchored at yesterday, matching the storefront's own\n\
                  dashboards whose daily aggregates lag by one day.\n\
                  \n\
                  Examples:\n\
                    steamboard periods                       # List period codes\n\
                    steamboard window --period 1w            # Show this week's window\n\
                    steamboard compare sales.json -p 3m      # Compare last three months\n\
                    steamboard export sales.json -o week.csv -p 1w  # Export this week\n\
                    steamboard settings --poll-interval 600  # Update settings\n\
                  \n\
                  Environment Variables:\n\
                    STEAMBOARD_DATA_DIR              # Override settings directory\n\
                    STEAMBOARD_NO_COLOR              # Disable ANSI colors\n\
                    RUST_LOG                         # Log filter (default: warn)"
)]
struct Cli {
    #[command(subcommand)]
    mode: Mode,

    /// Directory holding settings.json (default: local data dir/steamboard)
    #[arg(long, env = "STEAMBOARD_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Disable ANSI colors (log-friendly)
    #[arg(long, env = "STEAMBOARD_NO_COLOR", global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Mode {
    /// List selectable periods
    Periods {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the current and previous windows for a period
    Window {
        /// Period code: today, 1w, 2w, 1m, 3m, 1y, all
        #[arg(long, short = 'p', default_value = "1m")]
        period: String,
        /// Pretend today is this date (YYYY-MM-DD)
        #[arg(long)]
        today: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Compare a JSON file of sales rows across the two windows
    Compare {
        /// JSON array of sales rows (date as yyyy/mm/dd)
        file: PathBuf,
        /// Period code: today, 1w, 2w, 1m, 3m, 1y, all
        #[arg(long, short = 'p', default_value = "1m")]
        period: String,
        /// Revenue column to sum: gross or net
        #[arg(long, short = 's', default_value = "gross")]
        sales_type: String,
        /// Pretend today is this date (YYYY-MM-DD)
        #[arg(long)]
        today: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write the current window's sales rows to a CSV file
    Export {
        /// JSON array of sales rows (date as yyyy/mm/dd)
        file: PathBuf,
        /// Destination CSV file
        #[arg(long, short = 'o')]
        output: PathBuf,
        /// Period code: today, 1w, 2w, 1m, 3m, 1y, all
        #[arg(long, short = 'p', default_value = "1m")]
        period: String,
        /// Pretend today is this date (YYYY-MM-DD)
        #[arg(long)]
        today: Option<String>,
        /// Field separator
        #[arg(long, short = 'd', default_value_t = ',')]
        delimiter: char,
    },
    /// Show settings, updating them first when flags are given
    Settings {
        /// Storefront partner API key
        #[arg(long)]
        api_key: Option<String>,
        /// Seconds between syncs
        #[arg(long)]
        poll_interval: Option<i64>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        if let Some(hint) = hint(&e) {
            eprintln!("Hint: {}", hint);
        }
        std::process::exit(1);
    }
}

/// Suggestion from the first [`CoreError`] in the error chain
fn hint(err: &anyhow::Error) -> Option<String> {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<CoreError>())
        .and_then(CoreError::suggestion)
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!cli.no_color)
        .init();

    let no_color = cli.no_color;

    match cli.mode {
        Mode::Periods { json } => {
            println!("{}", cli::format_periods(json, no_color));
        }
        Mode::Window {
            period,
            today,
            json,
        } => {
            run_window(&period, today.as_deref(), json, no_color)?;
        }
        Mode::Compare {
            file,
            period,
            sales_type,
            today,
            json,
        } => {
            run_compare(&file, &period, &sales_type, today.as_deref(), json, no_color)?;
        }
        Mode::Export {
            file,
            output,
            period,
            today,
            delimiter,
        } => {
            run_export(&file, &output, &period, today.as_deref(), delimiter)?;
        }
        Mode::Settings {
            api_key,
            poll_interval,
            json,
        } => {
            run_settings(cli.data_dir, api_key, poll_interval, json)?;
        }
    }

    Ok(())
}

/// Fix "now" once for the whole run
fn reference_instant(today: Option<&str>) -> Result<ReferenceInstant> {
    match today {
        Some(s) => Ok(ReferenceInstant::parse_today(s)?),
        None => Ok(ReferenceInstant::from_clock(chrono::Local::now())),
    }
}

fn options(period: &str, today: Option<&str>) -> Result<OptionsStore> {
    let reference = reference_instant(today)?;
    let period: PeriodCode = period.parse()?;
    tracing::debug!(reference = %reference, period = %period, "Options initialized");
    Ok(OptionsStore::new(reference).with_period(period))
}

fn run_window(period: &str, today: Option<&str>, json: bool, no_color: bool) -> Result<()> {
    let options = options(period, today)?;
    println!("{}", cli::format_window(&options, json, no_color));
    Ok(())
}

fn run_compare(
    file: &Path,
    period: &str,
    sales_type: &str,
    today: Option<&str>,
    json: bool,
    no_color: bool,
) -> Result<()> {
    let sales_type: SalesType = sales_type.parse()?;
    let mut options = options(period, today)?.with_sales_type(sales_type);

    options.set_loading(true);
    let records = load_records(file)?;
    options.set_loading(false);

    let comparison = compare_periods(&records, &options.window(), options.sales_type());
    println!("{}", cli::format_comparison(&comparison, json, no_color));
    Ok(())
}

fn load_records(file: &Path) -> Result<Vec<SaleRecord>> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read sales file {}", file.display()))?;
    let records: Vec<SaleRecord> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse sales rows in {}", file.display()))?;
    tracing::info!("Loaded {} sales rows from {}", records.len(), file.display());
    Ok(records)
}

fn run_export(
    file: &Path,
    output: &Path,
    period: &str,
    today: Option<&str>,
    delimiter: char,
) -> Result<()> {
    let options = options(period, today)?;
    let records = load_records(file)?;
    let written = export_sales_to_csv(&records, &options.window(), output, delimiter)
        .with_context(|| format!("Failed to export sales to {}", output.display()))?;
    println!("Exported {} rows to {}", written, output.display());
    Ok(())
}

fn run_settings(
    data_dir: Option<PathBuf>,
    api_key: Option<String>,
    poll_interval: Option<i64>,
    json: bool,
) -> Result<()> {
    let backend = match data_dir {
        Some(dir) => JsonFileBackend::new(dir),
        None => JsonFileBackend::default_location()?,
    };
    let mut store = SettingsStore::new(backend);
    store.load();
    update_settings(&mut store, api_key, poll_interval)?;

    println!(
        "{}",
        cli::format_settings(
            store.settings(),
            store.is_loaded(),
            &store.backend().path(),
            json
        )
    );
    Ok(())
}

/// Apply the flags that were given and persist; untouched fields keep their
/// stored values. Returns whether anything was saved.
fn update_settings<B: SettingsBackend>(
    store: &mut SettingsStore<B>,
    api_key: Option<String>,
    poll_interval: Option<i64>,
) -> Result<bool> {
    if api_key.is_none() && poll_interval.is_none() {
        return Ok(false);
    }

    let settings = store.settings_mut();
    if let Some(key) = api_key {
        settings.steam_api_key = Some(key);
    }
    if let Some(interval) = poll_interval {
        settings.poll_interval = interval;
    }
    store.save().context("Failed to save settings")?;
    // Re-read so the configured flag reflects what was persisted
    store.load();
    Ok(true)
}
