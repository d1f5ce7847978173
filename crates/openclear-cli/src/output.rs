//! JSON document printed by `openclear clear`.
//!
//! Curves are emitted as plot series (`x` = cumulative volume, `y` = price)
//! so a chart front end can draw them without post-processing.

use std::collections::BTreeMap;

use openclear_engine::{
    ClearingRun, ComparisonRow, DailyClearing, FrequencyBucket, MarketClearing, ReplacedPrice,
    ScenarioComparison, run_digest_hex,
};
use openclear_ingress::IngestReport;
use openclear_types::{PlotPoint, constants};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ClearOutput {
    pub engine: &'static str,
    pub version: &'static str,
    pub strategy: String,
    pub seed: u64,
    pub ingest: IngestSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run: Option<RunOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ComparisonOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily: Option<BTreeMap<u32, RunOutput>>,
}

impl ClearOutput {
    pub fn new(strategy: String, seed: u64, ingest: IngestSummary) -> Self {
        Self {
            engine: constants::ENGINE_NAME,
            version: constants::VERSION,
            strategy,
            seed,
            ingest,
            run: None,
            comparison: None,
            daily: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    pub rows: usize,
    pub skipped_rows: usize,
    pub defaulted_fields: usize,
}

impl From<&IngestReport> for IngestSummary {
    fn from(report: &IngestReport) -> Self {
        Self {
            rows: report.rows.len(),
            skipped_rows: report.skipped_rows,
            defaulted_fields: report.defaulted_fields,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MarketOutput {
    pub market_code: String,
    pub price: Option<Decimal>,
    pub volume: Option<Decimal>,
    pub imputed_bids: usize,
    pub demand: Vec<PlotPoint>,
    pub supply: Vec<PlotPoint>,
    pub marker: Option<PlotPoint>,
}

impl From<&MarketClearing> for MarketOutput {
    fn from(market: &MarketClearing) -> Self {
        Self {
            market_code: market.result.market_code.clone(),
            price: market.result.price,
            volume: market.result.volume,
            imputed_bids: market.imputed_bids,
            demand: market.demand_series(),
            supply: market.supply_series(),
            marker: market.clearing_marker(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RunOutput {
    pub markets: Vec<MarketOutput>,
    pub replaced: Vec<ReplacedPrice>,
    /// Hex SHA-256 over the run, for replay checks.
    pub digest: String,
}

impl From<&ClearingRun> for RunOutput {
    fn from(run: &ClearingRun) -> Self {
        Self {
            markets: run.markets.values().map(MarketOutput::from).collect(),
            replaced: run.replaced.clone(),
            digest: run_digest_hex(run),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ComparisonOutput {
    pub rows: Vec<ComparisonRow>,
    pub histogram: Vec<FrequencyBucket>,
    pub baseline: RunOutput,
    pub scenario: RunOutput,
}

impl From<&ScenarioComparison> for ComparisonOutput {
    fn from(comparison: &ScenarioComparison) -> Self {
        Self {
            rows: comparison.rows.clone(),
            histogram: comparison.histogram.clone(),
            baseline: RunOutput::from(&comparison.baseline),
            scenario: RunOutput::from(&comparison.scenario),
        }
    }
}

pub fn daily_output(daily: &DailyClearing) -> BTreeMap<u32, RunOutput> {
    daily
        .periods
        .iter()
        .map(|(period, run)| (*period, RunOutput::from(run)))
        .collect()
}
