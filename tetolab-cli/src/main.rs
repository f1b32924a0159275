//! Tetolab CLI — screen, export, and universe commands.
//!
//! Commands:
//! - `screen` — run the ceiling screen and print the ranked table
//! - `export` — run the screen and write an XLSX/CSV snapshot
//! - `universe show` — print the configured segments and tickers

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use tetolab_core::data::{CircuitBreaker, Universe, YahooQuotes};
use tetolab_core::domain::{DivisorStrategy, ValuationParams};
use tetolab_core::engine::{filter_rows, ScreenReport, Screener, StdoutProgress};
use tetolab_report::{write_json, CsvSink, SnapshotSink, XlsxSink};

#[derive(Parser)]
#[command(
    name = "teto",
    about = "Tetolab CLI — dividend price-ceiling screener"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that runs a screen.
#[derive(Args)]
struct ScreenArgs {
    /// Universe TOML file. Defaults to the built-in B3 universe.
    #[arg(long)]
    universe: Option<PathBuf>,

    /// Explicit tickers (e.g. PETR4.SA ITUB4.SA). Overrides the universe.
    #[arg(long, num_args = 1..)]
    tickers: Vec<String>,

    /// Minimum acceptable annual dividend yield, as a fraction.
    #[arg(long, default_value_t = 0.07)]
    threshold: f64,

    /// Trailing window in calendar years.
    #[arg(long, default_value_t = 5)]
    window_years: u32,

    /// Annualization divisor: fixed-window or observed-years.
    #[arg(long, default_value = "fixed-window")]
    divisor: String,

    /// Reference date (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    as_of: Option<String>,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the screen and print the ranked table.
    Screen {
        #[command(flatten)]
        args: ScreenArgs,

        /// Keep only tickers containing this substring (applied after
        /// ranking).
        #[arg(long)]
        filter: Option<String>,

        /// Also write the full report as JSON.
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Run the screen and write a snapshot file.
    Export {
        #[command(flatten)]
        args: ScreenArgs,

        /// Output path.
        #[arg(long, default_value = "acoes.xlsx")]
        out: PathBuf,

        /// Snapshot format: xlsx or csv.
        #[arg(long, default_value = "xlsx")]
        format: String,
    },
    /// Universe management commands.
    Universe {
        #[command(subcommand)]
        action: UniverseAction,
    },
}

#[derive(Subcommand)]
enum UniverseAction {
    /// Print segments and tickers.
    Show {
        /// Universe TOML file. Defaults to the built-in B3 universe.
        #[arg(long)]
        universe: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Screen { args, filter, json } => run_screen(args, filter, json),
        Commands::Export { args, out, format } => run_export(args, out, format),
        Commands::Universe { action } => match action {
            UniverseAction::Show { universe } => run_universe_show(universe),
        },
    }
}

fn run_screen(args: ScreenArgs, filter: Option<String>, json: Option<PathBuf>) -> Result<()> {
    let (report, tickers) = execute_screen(&args)?;

    if report.rows.is_empty() {
        bail!(
            "every ticker was skipped ({} of {}) — nothing to rank",
            report.skipped_count(),
            tickers.len()
        );
    }

    let rows = match &filter {
        Some(query) => filter_rows(&report.rows, query),
        None => report.rows.clone(),
    };

    println!();
    println!(
        "{:>3} {:>10} {:>10} {:>10} {:>8} {:>6}",
        "#", "Ticker", "Price", "P_Max", "Gap", "Signal"
    );
    for (i, row) in rows.iter().enumerate() {
        println!(
            "{:>3} {:>10} {:>10.2} {:>10.2} {:>8.2} {:>6}",
            i + 1,
            row.ticker,
            row.current_price,
            row.price_ceiling,
            row.gap,
            row.signal.label()
        );
    }

    let skipped: Vec<_> = report.outcomes.iter().filter(|o| !o.is_ranked()).collect();
    if !skipped.is_empty() {
        println!();
        for outcome in &skipped {
            println!(
                "skipped {}: {}",
                outcome.ticker,
                outcome.detail.as_deref().unwrap_or("unknown error")
            );
        }
    }

    if let Some(path) = json {
        write_json(&path, &report)?;
        println!("\nReport JSON written to {}", path.display());
    }

    Ok(())
}

fn run_export(args: ScreenArgs, out: PathBuf, format: String) -> Result<()> {
    let (report, tickers) = execute_screen(&args)?;

    if report.rows.is_empty() {
        bail!(
            "every ticker was skipped ({} of {}) — nothing to export",
            report.skipped_count(),
            tickers.len()
        );
    }

    match format.as_str() {
        "xlsx" => XlsxSink::new(&out).replace(&report)?,
        "csv" => CsvSink::new(&out).replace(&report)?,
        other => bail!("unknown snapshot format: {other} (expected xlsx or csv)"),
    }

    println!(
        "Snapshot written to {} ({} rows, {} skipped)",
        out.display(),
        report.ranked_count(),
        report.skipped_count()
    );
    Ok(())
}

fn run_universe_show(universe: Option<PathBuf>) -> Result<()> {
    let universe = load_universe(universe.as_deref())?;
    for (segment, tickers) in &universe.segments {
        println!("{segment}:");
        for ticker in tickers {
            println!("  {ticker}");
        }
    }
    println!("\n{} tickers total", universe.ticker_count());
    Ok(())
}

/// Run one screen from CLI options. Returns the report and the ticker
/// list it ran over.
fn execute_screen(args: &ScreenArgs) -> Result<(ScreenReport, Vec<String>)> {
    let params = build_params(args)?;

    let tickers = if args.tickers.is_empty() {
        load_universe(args.universe.as_deref())?.all_tickers()
    } else {
        args.tickers.clone()
    };
    if tickers.is_empty() {
        bail!("the universe has no tickers");
    }

    let breaker = Arc::new(CircuitBreaker::default_provider());
    let provider = YahooQuotes::with_timeout(breaker, Duration::from_secs(args.timeout_secs));
    let screener = Screener::new(&provider, params);
    let report = screener.screen_with_progress(&tickers, &StdoutProgress);
    Ok((report, tickers))
}

fn build_params(args: &ScreenArgs) -> Result<ValuationParams> {
    let divisor = match args.divisor.as_str() {
        "fixed-window" => DivisorStrategy::FixedWindow,
        "observed-years" => DivisorStrategy::ObservedYears,
        other => bail!("unknown divisor strategy: {other} (expected fixed-window or observed-years)"),
    };

    let mut params = ValuationParams::new(args.threshold)
        .with_window_years(args.window_years)
        .with_divisor(divisor);

    if let Some(s) = &args.as_of {
        params = params.with_as_of(parse_date(s)?);
    }

    params
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid screen parameters: {e}"))?;
    Ok(params)
}

fn load_universe(path: Option<&std::path::Path>) -> Result<Universe> {
    match path {
        Some(p) => Universe::from_file(p)
            .map_err(|e| anyhow::anyhow!("failed to load universe {}: {e}", p.display())),
        None => Ok(Universe::default_br()),
    }
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{s}' (expected YYYY-MM-DD)"))
}
