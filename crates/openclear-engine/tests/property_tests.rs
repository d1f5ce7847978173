//! Property-based integration tests for curve building, imputation and
//! solving.
//!
//! These tests verify that universal properties hold across generated bid
//! batches, using the `proptest` crate for random test case generation.

use openclear_engine::{
    ClearingEngine, PriceImputer, build_curve, compute_run_digest, step_intersection, threshold_crossing,
    two_pointer,
};
use openclear_types::*;
use proptest::prelude::*;
use rust_decimal::Decimal;

// =============================================================================
// Generators
// =============================================================================

fn arb_side() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::Buy), Just(Side::Sell)]
}

fn arb_market() -> impl Strategy<Value = String> {
    prop_oneof![Just("ES".to_string()), Just("PT".to_string()), Just("FR".to_string())]
}

/// Volumes and prices with two decimals; about one price in five is the
/// missing-price sentinel.
fn arb_bid() -> impl Strategy<Value = Bid> {
    (
        arb_market(),
        arb_side(),
        0i64..50_000,                                  // volume, hundredths
        prop_oneof![1 => Just(0i64), 4 => 1i64..30_000], // price, hundredths
    )
        .prop_map(|(market, side, volume, price)| {
            Bid::new(market, side, Decimal::new(volume, 2), Decimal::new(price, 2))
        })
}

fn arb_bids(max_count: usize) -> impl Strategy<Value = Vec<Bid>> {
    proptest::collection::vec(arb_bid(), 0..=max_count)
}

fn arb_distribution() -> impl Strategy<Value = PriceDistribution> {
    prop_oneof![
        (1i64..500).prop_map(|v| PriceDistribution::Fixed { value: Decimal::new(v, 0) }),
        (0.0f64..100.0, 0.0f64..100.0).prop_map(|(a, b)| PriceDistribution::Uniform {
            min: a.min(b),
            max: a.max(b),
        }),
        (0.0f64..100.0, 0.1f64..20.0).prop_map(|(mean, stddev)| PriceDistribution::Normal { mean, stddev }),
        (0.0f64..5.0, 0.05f64..1.0).prop_map(|(mu, sigma)| PriceDistribution::LogNormal { mu, sigma }),
    ]
}

fn arb_side_filter() -> impl Strategy<Value = SideFilter> {
    prop_oneof![Just(SideFilter::Buy), Just(SideFilter::Sell), Just(SideFilter::Both)]
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Cumulative volume never decreases and ends at the side's total volume.
    #[test]
    fn curve_cumulative_volume_is_monotonic(bids in arb_bids(60), side in arb_side()) {
        let curve = build_curve(side, &bids).unwrap();
        let expected: Decimal = bids.iter().filter(|b| b.side == side).map(|b| b.volume).sum();

        prop_assert!(curve.points.windows(2).all(|w| w[0].cumulative_volume <= w[1].cumulative_volume));
        prop_assert_eq!(curve.total_volume(), expected);
        prop_assert_eq!(curve.len(), bids.iter().filter(|b| b.side == side).count());
    }

    /// Buy curves run from the highest price down, sell curves upward.
    #[test]
    fn curve_prices_are_ordered(bids in arb_bids(60)) {
        let demand = build_curve(Side::Buy, &bids).unwrap();
        let supply = build_curve(Side::Sell, &bids).unwrap();

        prop_assert!(demand.points.windows(2).all(|w| w[0].price >= w[1].price));
        prop_assert!(supply.points.windows(2).all(|w| w[0].price <= w[1].price));
    }

    /// A `none` imputation hands back an equal copy and leaves the input alone.
    #[test]
    fn none_imputation_is_identity(bids in arb_bids(40), filter in arb_side_filter(), seed in any::<u64>()) {
        let before = bids.clone();
        let out = PriceImputer::seeded(seed).impute(&bids, filter, &PriceDistribution::None).unwrap();
        prop_assert_eq!(&out.bids, &bids);
        prop_assert!(out.replaced.is_empty());
        prop_assert_eq!(bids, before);
    }

    /// Same seed, same input → same replaced prices.
    #[test]
    fn imputation_is_reproducible(
        bids in arb_bids(40),
        distribution in arb_distribution(),
        filter in arb_side_filter(),
        seed in any::<u64>(),
    ) {
        let a = PriceImputer::seeded(seed).impute(&bids, filter, &distribution).unwrap();
        let b = PriceImputer::seeded(seed).impute(&bids, filter, &distribution).unwrap();
        prop_assert_eq!(a.replaced_prices(), b.replaced_prices());
    }

    /// Only targeted zero-price bids are replaced.
    #[test]
    fn imputation_touches_only_missing_prices(
        bids in arb_bids(40),
        distribution in arb_distribution(),
        filter in arb_side_filter(),
    ) {
        let out = PriceImputer::seeded(1).impute(&bids, filter, &distribution).unwrap();
        let expected = bids.iter().filter(|b| b.has_missing_price() && filter.matches(b.side)).count();
        prop_assert_eq!(out.replaced.len(), expected);
        for (before, after) in bids.iter().zip(&out.bids) {
            if !before.has_missing_price() || !filter.matches(before.side) {
                prop_assert_eq!(before, after);
            }
        }
    }

    /// The solvers depend on nothing but the two curves.
    #[test]
    fn solvers_are_deterministic(bids in arb_bids(60)) {
        let demand = build_curve(Side::Buy, &bids).unwrap();
        let supply = build_curve(Side::Sell, &bids).unwrap();
        prop_assert_eq!(threshold_crossing(&demand, &supply, 2), threshold_crossing(&demand, &supply, 2));
        prop_assert_eq!(two_pointer(&demand, &supply, 2), two_pointer(&demand, &supply, 2));
    }

    /// A threshold crossing is a sell price some buyer accepts, and its
    /// volume never exceeds either side's total.
    #[test]
    fn threshold_crossing_is_feasible(bids in arb_bids(60)) {
        let demand = build_curve(Side::Buy, &bids).unwrap();
        let supply = build_curve(Side::Sell, &bids).unwrap();
        if let Some(crossing) = threshold_crossing(&demand, &supply, 2) {
            prop_assert!(crossing.volume > Decimal::ZERO);
            prop_assert!(crossing.volume <= demand.total_volume());
            prop_assert!(supply.points.iter().any(|p| p.price.round_dp(2) == crossing.price));
            prop_assert!(demand.points.iter().any(|p| p.price.round_dp(2) >= crossing.price));
        }
    }

    /// A step intersection trades a positive volume both sides can supply,
    /// at a price some seller asks and some buyer accepts.
    #[test]
    fn step_intersection_is_feasible(bids in arb_bids(60)) {
        let demand = build_curve(Side::Buy, &bids).unwrap();
        let supply = build_curve(Side::Sell, &bids).unwrap();
        if let Some(crossing) = step_intersection(&demand, &supply, 2) {
            prop_assert!(crossing.volume > Decimal::ZERO);
            prop_assert!(crossing.volume <= demand.total_volume().min(supply.total_volume()));
            prop_assert!(supply.points.iter().any(|p| p.price.round_dp(2) <= crossing.price));
            prop_assert!(demand.points.iter().any(|p| p.price.round_dp(2) >= crossing.price));
        }
    }

    /// Every market of the batch is reported, and seeded runs replay exactly.
    #[test]
    fn engine_runs_replay(bids in arb_bids(60), distribution in arb_distribution(), seed in any::<u64>()) {
        let imputation = ImputationConfig::new(distribution, SideFilter::Both);
        let a = ClearingEngine::seeded(EngineConfig::default(), seed).unwrap().run(&bids, Some(&imputation)).unwrap();
        let b = ClearingEngine::seeded(EngineConfig::default(), seed).unwrap().run(&bids, Some(&imputation)).unwrap();

        let mut codes: Vec<&str> = bids.iter().map(|b| b.market_code.as_str()).collect();
        codes.sort_unstable();
        codes.dedup();
        prop_assert_eq!(a.markets.keys().map(String::as_str).collect::<Vec<_>>(), codes);
        prop_assert_eq!(compute_run_digest(&a), compute_run_digest(&b));
    }
}
