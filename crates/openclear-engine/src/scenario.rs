//! Baseline vs imputed-scenario comparison.

use std::collections::BTreeSet;

use openclear_types::{ClearingResult, Result};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::engine::ClearingRun;
use crate::histogram::{FrequencyBucket, frequency_distribution};
use crate::imputer::ReplacedPrice;

/// One market, cleared with and without imputation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonRow {
    pub market_code: String,
    pub baseline: ClearingResult,
    pub scenario: ClearingResult,
    /// Bids of this market whose price was imputed.
    pub replaced_bids: usize,
}

impl ComparisonRow {
    /// `true` when imputation moved the clearing price or volume.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.baseline.price != self.scenario.price || self.baseline.volume != self.scenario.volume
    }

    /// Scenario price minus baseline price, when both cleared and the
    /// difference is representable.
    #[must_use]
    pub fn price_delta(&self) -> Option<Decimal> {
        self.scenario.price?.checked_sub(self.baseline.price?)
    }
}

/// Side-by-side clearing of a batch before and after imputation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioComparison {
    /// One row per market of either run, in market-code order.
    pub rows: Vec<ComparisonRow>,
    /// Frequency distribution of the imputed prices.
    pub histogram: Vec<FrequencyBucket>,
    pub baseline: ClearingRun,
    pub scenario: ClearingRun,
}

impl ScenarioComparison {
    /// Pair up two runs market by market. A market missing from one run
    /// reports "not found" on that side.
    pub fn from_runs(baseline: ClearingRun, scenario: ClearingRun, bucket_size: Decimal) -> Result<Self> {
        let histogram = frequency_distribution(&replaced_prices(&scenario.replaced), bucket_size)?;

        let codes: BTreeSet<&String> = baseline.markets.keys().chain(scenario.markets.keys()).collect();
        let rows = codes
            .into_iter()
            .map(|code| ComparisonRow {
                market_code: code.clone(),
                baseline: result_or_not_found(&baseline, code),
                scenario: result_or_not_found(&scenario, code),
                replaced_bids: scenario.markets.get(code).map_or(0, |m| m.imputed_bids),
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            markets = rows.len(),
            changed = rows.iter().filter(|r| r.changed()).count(),
            replaced = scenario.replaced.len(),
            "Scenario compared"
        );

        Ok(Self {
            rows,
            histogram,
            baseline,
            scenario,
        })
    }

    /// Every imputed price, in input order.
    #[must_use]
    pub fn replaced_prices(&self) -> Vec<Decimal> {
        replaced_prices(&self.scenario.replaced)
    }

    #[must_use]
    pub fn row(&self, market_code: &str) -> Option<&ComparisonRow> {
        self.rows.iter().find(|r| r.market_code == market_code)
    }
}

fn replaced_prices(replaced: &[ReplacedPrice]) -> Vec<Decimal> {
    replaced.iter().map(|r| r.price).collect()
}

fn result_or_not_found(run: &ClearingRun, code: &str) -> ClearingResult {
    run.result(code)
        .cloned()
        .unwrap_or_else(|| ClearingResult::not_found(code))
}

#[cfg(test)]
mod tests {
    use openclear_types::{Bid, EngineConfig, ImputationConfig, PriceDistribution, SideFilter};

    use super::*;
    use crate::engine::ClearingEngine;

    fn dec(n: i64) -> Decimal {
        Decimal::new(n, 0)
    }

    fn fixed_sell(value: i64) -> ImputationConfig {
        ImputationConfig::new(PriceDistribution::Fixed { value: dec(value) }, SideFilter::Sell)
    }

    #[test]
    fn unchanged_market_without_replacements() {
        let bids = vec![
            // ES has a zero-priced sell bid.
            Bid::buy("ES", dec(10), dec(50)),
            Bid::sell("ES", dec(10), Decimal::ZERO),
            // PT is fully priced.
            Bid::buy("PT", dec(10), dec(50)),
            Bid::sell("PT", dec(10), dec(20)),
        ];
        let mut engine = ClearingEngine::seeded(EngineConfig::default(), 3).unwrap();
        let comparison = engine.compare(&bids, &fixed_sell(35)).unwrap();

        let es = comparison.row("ES").unwrap();
        assert_eq!(es.replaced_bids, 1);
        assert_eq!(es.baseline.price, Some(Decimal::ZERO));
        assert_eq!(es.scenario.price, Some(dec(35)));
        assert!(es.changed());
        assert_eq!(es.price_delta(), Some(dec(35)));

        let pt = comparison.row("PT").unwrap();
        assert_eq!(pt.replaced_bids, 0);
        assert!(!pt.changed());
        assert_eq!(pt.price_delta(), Some(Decimal::ZERO));
    }

    #[test]
    fn histogram_of_replaced_prices() {
        let bids = vec![
            Bid::sell("ES", dec(1), Decimal::ZERO),
            Bid::sell("ES", dec(1), Decimal::ZERO),
            Bid::buy("ES", dec(1), dec(90)),
        ];
        let mut engine = ClearingEngine::seeded(EngineConfig::default(), 3).unwrap();
        let comparison = engine.compare(&bids, &fixed_sell(35)).unwrap();
        assert_eq!(comparison.replaced_prices(), vec![dec(35), dec(35)]);
        assert_eq!(
            comparison.histogram,
            vec![FrequencyBucket { lower: dec(35), upper: dec(55), count: 2 }]
        );
    }

    #[test]
    fn market_missing_from_one_run_is_not_found() {
        let baseline = ClearingRun::default();
        let engine = ClearingEngine::seeded(EngineConfig::default(), 0).unwrap();
        let scenario = engine.clear(&[Bid::buy("FR", dec(1), dec(10)), Bid::sell("FR", dec(1), dec(5))]).unwrap();

        let comparison = ScenarioComparison::from_runs(baseline, scenario, dec(20)).unwrap();
        let fr = comparison.row("FR").unwrap();
        assert!(!fr.baseline.is_cleared());
        assert!(fr.scenario.is_cleared());
        assert_eq!(fr.price_delta(), None);
    }

    #[test]
    fn no_imputation_nothing_changes() {
        let bids = vec![Bid::buy("ES", dec(10), dec(50)), Bid::sell("ES", dec(10), dec(20))];
        let mut engine = ClearingEngine::seeded(EngineConfig::default(), 0).unwrap();
        let comparison = engine
            .compare(&bids, &ImputationConfig::new(PriceDistribution::None, SideFilter::Both))
            .unwrap();
        assert!(comparison.rows.iter().all(|r| !r.changed()));
        assert!(comparison.histogram.is_empty());
    }

    #[test]
    fn price_delta_past_decimal_range_is_none() {
        let row = ComparisonRow {
            market_code: "ES".into(),
            baseline: ClearingResult::cleared("ES", Decimal::MIN, dec(1)),
            scenario: ClearingResult::cleared("ES", Decimal::MAX, dec(1)),
            replaced_bids: 1,
        };
        assert!(row.changed());
        assert_eq!(row.price_delta(), None);
    }

    #[test]
    fn fixed_price_past_limit_is_rejected_before_clearing() {
        let bids = vec![Bid::buy("ES", dec(10), dec(50)), Bid::sell("ES", dec(10), Decimal::ZERO)];
        let mut engine = ClearingEngine::seeded(EngineConfig::default(), 0).unwrap();
        let imputation = ImputationConfig::new(PriceDistribution::Fixed { value: Decimal::MAX }, SideFilter::Sell);
        let err = engine.compare(&bids, &imputation).unwrap_err();
        assert!(matches!(err, openclear_types::OpenclearError::InvalidDistribution { .. }), "{err}");
    }
}
