//! Clearing engine: imputation, grouping, curve building and solving for a
//! whole batch.
//!
//! This is the entry point of the compute plane. It is stateless between
//! calls apart from the random generator it owns, which is only consumed when
//! an imputation actually draws samples.

use std::collections::BTreeMap;

use openclear_types::{
    Bid, ClearingResult, Curve, EngineConfig, ImputationConfig, PlotPoint, Result, Side,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::clearing::solve;
use crate::curve::build_curve;
use crate::grouper::{group_markets, is_aggregate_batch};
use crate::imputer::{PriceImputer, ReplacedPrice};
use crate::scenario::ScenarioComparison;

/// Outcome and curves of one market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarketClearing {
    pub result: ClearingResult,
    /// Buy curve, highest price first.
    pub demand: Curve,
    /// Sell curve, cheapest first.
    pub supply: Curve,
    /// Bids of this market whose price was imputed in this run.
    pub imputed_bids: usize,
}

impl MarketClearing {
    /// Demand curve as `(cumulative volume, price)` plot points.
    #[must_use]
    pub fn demand_series(&self) -> Vec<PlotPoint> {
        self.demand.plot_series()
    }

    /// Supply curve as `(cumulative volume, price)` plot points.
    #[must_use]
    pub fn supply_series(&self) -> Vec<PlotPoint> {
        self.supply.plot_series()
    }

    /// Point marking the equilibrium, if there is one.
    #[must_use]
    pub fn clearing_marker(&self) -> Option<PlotPoint> {
        self.result.marker()
    }
}

/// Result of clearing one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClearingRun {
    /// One entry per market, keyed by market code.
    pub markets: BTreeMap<String, MarketClearing>,
    /// Every price the imputer replaced, in input order.
    pub replaced: Vec<ReplacedPrice>,
}

impl ClearingRun {
    #[must_use]
    pub fn result(&self, market_code: &str) -> Option<&ClearingResult> {
        self.markets.get(market_code).map(|m| &m.result)
    }

    /// Just the clearing results, keyed by market code.
    #[must_use]
    pub fn results(&self) -> BTreeMap<String, ClearingResult> {
        self.markets
            .iter()
            .map(|(code, m)| (code.clone(), m.result.clone()))
            .collect()
    }

    #[must_use]
    pub fn cleared_markets(&self) -> usize {
        self.markets.values().filter(|m| m.result.is_cleared()).count()
    }
}

/// Results of every settlement period of one trading day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DailyClearing {
    /// Keyed by settlement period, ascending.
    pub periods: BTreeMap<u32, ClearingRun>,
}

impl DailyClearing {
    /// Clearing result of one market across all periods, in period order.
    /// Periods in which the market did not appear are skipped.
    #[must_use]
    pub fn market_profile(&self, market_code: &str) -> Vec<(u32, ClearingResult)> {
        self.periods
            .iter()
            .filter_map(|(period, run)| run.result(market_code).map(|r| (*period, r.clone())))
            .collect()
    }
}

/// Clears bid batches under a fixed [`EngineConfig`].
#[derive(Debug)]
pub struct ClearingEngine<R = StdRng> {
    config: EngineConfig,
    imputer: PriceImputer<R>,
}

impl ClearingEngine<StdRng> {
    /// Engine whose imputer draws from a `StdRng` seeded with `seed`.
    pub fn seeded(config: EngineConfig, seed: u64) -> Result<Self> {
        Self::new(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> ClearingEngine<R> {
    /// Create an engine. Fails if `config` is inconsistent.
    pub fn new(config: EngineConfig, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            imputer: PriceImputer::new(rng),
        })
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Clear `bids` as given, without imputation.
    pub fn clear(&self, bids: &[Bid]) -> Result<ClearingRun> {
        Ok(ClearingRun {
            markets: self.clear_markets(bids, &[])?,
            replaced: Vec::new(),
        })
    }

    /// Impute (if asked), group, build curves and solve every market.
    ///
    /// Every market present in the batch gets a result; one-sided markets
    /// report "not found". An empty batch gives an empty run.
    pub fn run(&mut self, bids: &[Bid], imputation: Option<&ImputationConfig>) -> Result<ClearingRun> {
        let run = match imputation {
            Some(config) => {
                let imputed = self.imputer.apply(bids, config)?;
                ClearingRun {
                    markets: self.clear_markets(&imputed.bids, &imputed.replaced)?,
                    replaced: imputed.replaced,
                }
            }
            None => self.clear(bids)?,
        };

        tracing::info!(
            bids = bids.len(),
            markets = run.markets.len(),
            cleared = run.cleared_markets(),
            replaced = run.replaced.len(),
            strategy = %self.config.solver.strategy,
            "Clearing run complete"
        );
        Ok(run)
    }

    /// [`run`](Self::run) with the imputation from the engine config.
    pub fn run_configured(&mut self, bids: &[Bid]) -> Result<ClearingRun> {
        let imputation = self.config.imputation.clone();
        self.run(bids, imputation.as_ref())
    }

    /// Clear the batch as-is and again after imputation, side by side.
    pub fn compare(&mut self, bids: &[Bid], imputation: &ImputationConfig) -> Result<ScenarioComparison> {
        let baseline = self.clear(bids)?;
        let scenario = self.run(bids, Some(imputation))?;
        ScenarioComparison::from_runs(baseline, scenario, self.config.histogram.bucket_size)
    }

    /// Run every settlement period independently, in period order.
    pub fn run_daily(
        &mut self,
        periods: &BTreeMap<u32, Vec<Bid>>,
        imputation: Option<&ImputationConfig>,
    ) -> Result<DailyClearing> {
        let mut daily = DailyClearing::default();
        for (period, bids) in periods {
            tracing::debug!(period, bids = bids.len(), "Clearing period");
            let run = self.run(bids, imputation)?;
            daily.periods.insert(*period, run);
        }
        Ok(daily)
    }

    fn clear_markets(&self, bids: &[Bid], replaced: &[ReplacedPrice]) -> Result<BTreeMap<String, MarketClearing>> {
        let strategy = self.config.solver.strategy;
        let decimals = self.config.rounding.decimals;
        let imputed_per_market = count_by_market(bids, replaced);

        group_markets(bids)
            .into_iter()
            .map(|(code, market)| -> Result<(String, MarketClearing)> {
                let demand = build_curve(Side::Buy, &market.buy)?;
                let supply = build_curve(Side::Sell, &market.sell)?;
                let result = match solve(strategy, &demand, &supply, decimals) {
                    Some(crossing) => ClearingResult::cleared(code.clone(), crossing.price, crossing.volume),
                    None => ClearingResult::not_found(code.clone()),
                };

                tracing::debug!(
                    market = %code,
                    buy_bids = demand.len(),
                    sell_bids = supply.len(),
                    price = ?result.price,
                    volume = ?result.volume,
                    "Market cleared"
                );

                let imputed_bids = imputed_per_market.get(&code).copied().unwrap_or(0);
                let clearing = MarketClearing {
                    result,
                    demand,
                    supply,
                    imputed_bids,
                };
                Ok((code, clearing))
            })
            .collect()
    }
}

/// Replaced-bid count per market, following the same grouping rule as
/// [`group_markets`].
fn count_by_market(bids: &[Bid], replaced: &[ReplacedPrice]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    if replaced.is_empty() {
        return counts;
    }
    if is_aggregate_batch(bids) {
        counts.insert(
            openclear_types::constants::AGGREGATE_MARKET_CODE.to_string(),
            replaced.len(),
        );
        return counts;
    }
    for r in replaced {
        *counts.entry(r.market_code.clone()).or_insert(0) += 1;
    }
    counts
}
