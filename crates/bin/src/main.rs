//! basket CLI binary.
//!
//! Runs momentum, value and equal-weight screens over an equity universe
//! and writes the resulting trade lists.

mod progress;
mod prompt;

use basket::{
    CsvUniverse, RunReport, SP500Universe, Screen, ScreenConfig, Universe, UniverseSource,
};
use basket_data::{
    FetchConfig, MarketDataProvider, RecordingProvider, SnapshotProvider, YahooProvider,
};
use basket_factors::{MissingPolicy, Methodology, SelectionConfig, ValueConfig};
use basket_output::{ExportFormat, to_dataframe};
use basket_portfolio::parse_budget;
use clap::{Args, Parser, Subcommand};
use progress::ProgressObserver;
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "basket")]
#[command(about = "Factor-ranked trading baskets", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank by multi-horizon price momentum (HQM score), highest first
    Momentum(ScreenArgs),

    /// Rank by valuation multiples (RV score), cheapest first
    Value {
        #[command(flatten)]
        screen: ScreenArgs,

        /// Drop tickers with any missing multiple instead of ranking them worst
        #[arg(long)]
        exclude_missing: bool,
    },

    /// Equal dollars in every member with a price and market cap
    EqualWeight(ScreenArgs),

    /// List universe members
    Universe {
        /// CSV file with Symbol and Security columns (default: built-in large-cap S&P 500 subset)
        #[arg(long)]
        universe: Option<PathBuf>,
    },
}

#[derive(Args)]
struct ScreenArgs {
    /// Portfolio value; prompted for when omitted
    #[arg(long)]
    budget: Option<String>,

    /// Number of securities to buy
    #[arg(long, default_value_t = SelectionConfig::default().cohort_size)]
    top: usize,

    /// CSV file with Symbol and Security columns (default: built-in large-cap S&P 500 subset)
    #[arg(long)]
    universe: Option<PathBuf>,

    /// Only screen the first N universe members
    #[arg(long)]
    limit: Option<usize>,

    /// Replay market data from a snapshot file instead of Yahoo Finance
    #[arg(long, conflicts_with = "record")]
    snapshot: Option<PathBuf>,

    /// Save the fetched market data to a snapshot file
    #[arg(long)]
    record: Option<PathBuf>,

    /// Directory for report files (default: Documents folder)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Report format: csv, json or pretty-json
    #[arg(long, default_value = "csv")]
    format: ExportFormat,

    /// Print results without writing report files
    #[arg(long)]
    no_write: bool,

    /// Tickers fetched at the same time
    #[arg(long, default_value_t = FetchConfig::default().concurrency)]
    concurrency: usize,

    /// Attempts per ticker before giving up
    #[arg(long, default_value_t = FetchConfig::default().max_attempts)]
    retries: u32,

    /// Pause between attempts, in milliseconds
    #[arg(long, default_value_t = FetchConfig::default().retry_delay_ms)]
    retry_delay_ms: u64,

    /// Deadline for a single request, in milliseconds
    #[arg(long, default_value_t = FetchConfig::default().request_timeout_ms)]
    timeout_ms: u64,

    /// Hide the progress bar
    #[arg(long)]
    quiet: bool,
}

impl ScreenArgs {
    fn config(&self) -> ScreenConfig {
        ScreenConfig {
            fetch: FetchConfig {
                max_attempts: self.retries,
                retry_delay_ms: self.retry_delay_ms,
                request_timeout_ms: self.timeout_ms,
                concurrency: self.concurrency,
                ..Default::default()
            },
            selection: SelectionConfig {
                cohort_size: self.top,
            },
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Momentum(args) => {
            screen(Methodology::Momentum, &args, ScreenConfig::default()).await?;
        }
        Commands::Value {
            screen: args,
            exclude_missing,
        } => {
            let missing = if exclude_missing {
                MissingPolicy::Exclude
            } else {
                MissingPolicy::Worst
            };
            let overrides = ScreenConfig {
                value: ValueConfig {
                    missing,
                    ..Default::default()
                },
                ..Default::default()
            };
            screen(Methodology::Value, &args, overrides).await?;
        }
        Commands::EqualWeight(args) => {
            screen(Methodology::EqualWeight, &args, ScreenConfig::default()).await?;
        }
        Commands::Universe { universe } => {
            let universe = load_universe(universe.as_deref())?;
            for member in universe.constituents() {
                println!("{:<8} {}", member.symbol, member.name);
            }
            println!("\n{} members", universe.len());
        }
    }

    Ok(())
}

fn load_universe(path: Option<&Path>) -> Result<Universe, Box<dyn std::error::Error>> {
    let source: Box<dyn UniverseSource> = match path {
        Some(path) => Box::new(CsvUniverse::new(path)),
        None => Box::new(SP500Universe::new()),
    };
    Ok(Universe::load(source.as_ref())?)
}

async fn screen(
    methodology: Methodology,
    args: &ScreenArgs,
    overrides: ScreenConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut universe = load_universe(args.universe.as_deref())?;
    if let Some(limit) = args.limit {
        universe.truncate(limit);
    }

    let budget = match &args.budget {
        Some(text) => parse_budget(text)?,
        None => {
            let stdin = std::io::stdin();
            prompt::read_budget(stdin.lock(), std::io::stdout())?
        }
    };

    let config = ScreenConfig {
        value: overrides.value,
        ..args.config()
    };

    println!(
        "\nRunning {} screen over {} tickers with a budget of ${}",
        methodology,
        universe.len(),
        budget
    );

    let observer = if args.quiet {
        ProgressObserver::hidden()
    } else {
        ProgressObserver::new(universe.len(), "Fetching market data...")?
    };

    let report = if let Some(path) = &args.snapshot {
        let provider = SnapshotProvider::load(path)?;
        run_screen(provider, methodology, config, &universe, budget, &observer).await?
    } else if let Some(path) = &args.record {
        let recorder = RecordingProvider::new(YahooProvider::new()?);
        record_screen(&recorder, path, methodology, config, &universe, budget, &observer).await?
    } else {
        let provider = YahooProvider::new()?;
        run_screen(provider, methodology, config, &universe, budget, &observer).await?
    };

    observer.finish(format!(
        "Fetched {}/{} tickers",
        report.stats.fetched, report.stats.requested
    ));

    print_report(&report)?;

    if !args.no_write {
        let dir = args.output_dir.clone().unwrap_or_else(default_output_dir);
        for path in report.write_artifacts(&dir, args.format)? {
            println!("Saved {}", path.display());
        }
    }

    Ok(())
}

async fn run_screen<P: MarketDataProvider>(
    provider: P,
    methodology: Methodology,
    config: ScreenConfig,
    universe: &Universe,
    budget: Decimal,
    observer: &ProgressObserver,
) -> basket::Result<RunReport> {
    Screen::with_config(provider, methodology, config)
        .run(universe, budget, observer)
        .await
}

/// Run against `recorder` and save what it captured, even when the run
/// itself fails.
async fn record_screen<P: MarketDataProvider>(
    recorder: &RecordingProvider<P>,
    path: &Path,
    methodology: Methodology,
    config: ScreenConfig,
    universe: &Universe,
    budget: Decimal,
    observer: &ProgressObserver,
) -> Result<RunReport, Box<dyn std::error::Error>> {
    let result = run_screen(recorder, methodology, config, universe, budget, observer).await;
    recorder.snapshot().save(path)?;
    println!("Saved market data snapshot to {}", path.display());
    Ok(result?)
}

fn print_report(report: &RunReport) -> Result<(), Box<dyn std::error::Error>> {
    let cohort = report.cohort_table()?;

    println!("\n{}", cohort.title());
    println!("{}", to_dataframe(&cohort)?);

    println!("\nPosition size:  ${:.2}", report.position_size);
    println!("Invested:       ${:.2}", report.invested);
    println!("Cash left over: ${:.2}", report.cash_left);

    if !report.stats.skipped.is_empty() {
        println!("\nSkipped {} tickers:", report.stats.skipped.len());
        for skipped in &report.stats.skipped {
            println!("  {}", skipped.reason);
        }
    }

    Ok(())
}

/// Documents folder, then home, then the working directory.
fn default_output_dir() -> PathBuf {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}
