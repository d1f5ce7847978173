//! OpenClear command-line front end.
//!
//! # Usage
//!
//! ```bash
//! # Clear a store export as given
//! openclear clear --bids bids.json
//!
//! # Operator curve file, one period, imputation scenario against the baseline
//! openclear clear --bids curva_pbc.1 --format curve --country ES --period 12 \
//!     --config scenario.json --seed 42 --compare
//!
//! # Whole day, period by period, with structured logs
//! openclear --log-format json clear --bids curva_pbc.1 --format curve --daily
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use openclear_engine::ClearingEngine;
use openclear_ingress::{CurveFileFilter, IngestReport, decode_text, parse_curve_file, parse_json_rows};
use openclear_types::{EngineConfig, SolverStrategy};
use tracing::info;

mod logging;
mod output;

use logging::{LogFormat, init_logging};
use output::{ClearOutput, ComparisonOutput, IngestSummary, RunOutput, daily_output};

#[derive(Parser, Debug)]
#[command(name = "openclear")]
#[command(about = "Uniform-price electricity auction clearing", long_about = None)]
#[command(version)]
struct Cli {
    /// Log output format
    #[arg(long, global = true, value_enum, default_value = "pretty")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Clear a bid set and print the results as JSON
    Clear(ClearArgs),
}

#[derive(clap::Args, Debug)]
struct ClearArgs {
    /// Bid file (JSON rows or operator curve file)
    #[arg(long)]
    bids: PathBuf,

    /// Engine configuration (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Input format of the bid file
    #[arg(long, value_enum, default_value = "json")]
    format: InputFormat,

    /// Keep only bids of this market code
    #[arg(long)]
    country: Option<String>,

    /// Keep only this settlement period (e.g. 12, or H12Q1 in curve files)
    #[arg(long)]
    period: Option<String>,

    /// RNG seed for price imputation (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Solver strategy, overriding the config file
    /// (threshold_crossing, two_pointer or step_intersection)
    #[arg(long)]
    strategy: Option<SolverStrategy>,

    /// Clear the baseline and the configured imputation side by side
    #[arg(long, conflicts_with = "daily")]
    compare: bool,

    /// Clear every settlement period independently
    #[arg(long)]
    daily: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InputFormat {
    /// Row objects from the data store
    Json,
    /// Semicolon-separated market-operator curve file
    Curve,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format)?;

    match cli.command {
        Commands::Clear(args) => {
            let output = clear(&args)?;
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

fn clear(args: &ClearArgs) -> anyhow::Result<ClearOutput> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(strategy) = args.strategy {
        config.solver.strategy = strategy;
    }

    let report = load_bids(args)?;
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(
        seed,
        rows = report.rows.len(),
        skipped = report.skipped_rows,
        strategy = %config.solver.strategy,
        "Bids loaded"
    );

    let mut output = ClearOutput::new(
        config.solver.strategy.to_string(),
        seed,
        IngestSummary::from(&report),
    );
    let imputation = config.imputation.clone();
    let mut engine = ClearingEngine::seeded(config, seed)?;

    if args.daily {
        let periods = report.into_periods();
        let daily = engine.run_daily(&periods, imputation.as_ref())?;
        output.daily = Some(daily_output(&daily));
    } else if args.compare {
        let Some(imputation) = imputation else {
            bail!("--compare needs an \"imputation\" section in the config");
        };
        let comparison = engine.compare(&report.into_bids(), &imputation)?;
        output.comparison = Some(ComparisonOutput::from(&comparison));
    } else {
        let run = engine.run_configured(&report.into_bids())?;
        output.run = Some(RunOutput::from(&run));
    }

    Ok(output)
}

fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    EngineConfig::from_json_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

fn load_bids(args: &ClearArgs) -> anyhow::Result<IngestReport> {
    let bytes = std::fs::read(&args.bids)
        .with_context(|| format!("reading bids {}", args.bids.display()))?;
    let text = decode_text(&bytes);

    match args.format {
        InputFormat::Curve => {
            let filter = CurveFileFilter {
                country: args.country.clone(),
                period: args.period.clone(),
            };
            parse_curve_file(&text, &filter)
                .with_context(|| format!("parsing curve file {}", args.bids.display()))
        }
        InputFormat::Json => {
            let mut report = parse_json_rows(&text)
                .with_context(|| format!("parsing bid rows {}", args.bids.display()))?;
            if let Some(country) = &args.country {
                report.rows.retain(|row| &row.bid.market_code == country);
            }
            if let Some(period) = &args.period {
                let period: u32 = period
                    .trim()
                    .parse()
                    .with_context(|| format!("--period {period} is not a period number"))?;
                report = report.retain_period(period);
            }
            Ok(report)
        }
    }
}
