//! Clearing point computation for one market.
//!
//! Given the demand curve (buy, descending price) and the supply curve
//! (sell, ascending price), find the price and volume where they meet.
//! Prices are compared after rounding to the configured number of decimals
//! so float-origin noise never drives a tie-break; volumes are compared
//! unrounded except where the two-pointer walk says otherwise.
//!
//! The algorithm is deterministic: same curves → same result.

use openclear_types::{Curve, SolverStrategy};
use rust_decimal::{Decimal, RoundingStrategy};

/// A found intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crossing {
    /// Clearing price, already rounded.
    pub price: Decimal,
    pub volume: Decimal,
}

/// Round half away from zero to `decimals` places.
#[must_use]
pub fn round_price(value: Decimal, decimals: u32) -> Decimal {
    value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero)
}

/// Dispatch to the selected strategy. `None` means the curves do not cross.
#[must_use]
pub fn solve(strategy: SolverStrategy, demand: &Curve, supply: &Curve, decimals: u32) -> Option<Crossing> {
    match strategy {
        SolverStrategy::ThresholdCrossing => threshold_crossing(demand, supply, decimals),
        SolverStrategy::TwoPointer => two_pointer(demand, supply, decimals),
        SolverStrategy::StepIntersection => step_intersection(demand, supply, decimals),
    }
}

/// Threshold-crossing clearing.
///
/// Algorithm:
/// 1. Walk supply points cheapest first
/// 2. `demand(p)` = total buy volume priced at or above the supply price `p`
/// 3. The first supply point whose cumulative volume covers a non-zero
///    `demand(p)` is the clearing point: price `p`, volume `demand(p)`
///
/// The demand curve is sorted by descending price, so `demand(p)` is the
/// cumulative volume of its last qualifying point. As `p` rises the cut
/// only moves towards the front, so a single pointer suffices and the walk
/// is linear in the combined curve length.
#[must_use]
pub fn threshold_crossing(demand: &Curve, supply: &Curve, decimals: u32) -> Option<Crossing> {
    let buys = &demand.points;
    // Number of leading buy points priced at or above the current sell price.
    let mut qualifying = buys.len();

    for sell in &supply.points {
        let sell_price = round_price(sell.price, decimals);
        while qualifying > 0 && round_price(buys[qualifying - 1].price, decimals) < sell_price {
            qualifying -= 1;
        }
        if qualifying == 0 {
            // No buyer will pay this much; pricier supply can only do worse.
            break;
        }

        let demand_at_price = buys[qualifying - 1].cumulative_volume;
        if demand_at_price > Decimal::ZERO && sell.cumulative_volume >= demand_at_price {
            return Some(Crossing {
                price: sell_price,
                volume: demand_at_price,
            });
        }
    }

    None
}

/// Two-pointer clearing, as run by the historical web tool.
///
/// Walk both curves at once. While the buy price is not below the sell
/// price, advance whichever side has the smaller (rounded) cumulative volume
/// (the sell side on a tie). At the first price crossing:
/// - if the buy pointer moved last: price = sell price, volume = buy cumulative volume
/// - otherwise: price = buy price, volume = sell cumulative volume
///
/// Running off the end of either curve without a price crossing means no
/// result. This does not agree with [`threshold_crossing`] on every input.
#[must_use]
pub fn two_pointer(demand: &Curve, supply: &Curve, decimals: u32) -> Option<Crossing> {
    let buys = &demand.points;
    let sells = &supply.points;

    let mut i = 0;
    let mut j = 0;
    let mut buy_moved_last = false;

    while i < buys.len() && j < sells.len() {
        let buy = &buys[i];
        let sell = &sells[j];

        let buy_price = round_price(buy.price, decimals);
        let sell_price = round_price(sell.price, decimals);
        if buy_price < sell_price {
            return Some(if buy_moved_last {
                Crossing {
                    price: sell_price,
                    volume: buy.cumulative_volume,
                }
            } else {
                Crossing {
                    price: buy_price,
                    volume: sell.cumulative_volume,
                }
            });
        }

        if round_price(buy.cumulative_volume, decimals) < round_price(sell.cumulative_volume, decimals) {
            i += 1;
            buy_moved_last = true;
        } else {
            j += 1;
            buy_moved_last = false;
        }
    }

    None
}

/// Intersection of the two curves drawn as step functions.
///
/// Each curve starts at volume 0 and runs horizontally at a bid's price up
/// to that bid's cumulative volume, then vertically to the next bid's price.
/// At volume `x` a curve therefore covers a closed price interval: a single
/// price on a horizontal run, the whole riser at a step. Demand only falls
/// and supply only rises, so the curves touch on one connected stretch, and
/// it begins at a cumulative volume of either curve (or at 0).
///
/// The clearing price is the lowest price of the first touching point. The
/// clearing volume is the furthest volume at which both curves still carry
/// that price, within the shorter curve. Touching only at volume 0 is not a
/// clearing, and curves that end before they meet give no result.
#[must_use]
pub fn step_intersection(demand: &Curve, supply: &Curve, decimals: u32) -> Option<Crossing> {
    let (Some(demand_end), Some(supply_end)) = (demand.points.last(), supply.points.last()) else {
        return None;
    };
    let limit = demand_end.cumulative_volume.min(supply_end.cumulative_volume);

    let mut breakpoints: Vec<Decimal> = std::iter::once(Decimal::ZERO)
        .chain(demand.points.iter().map(|p| p.cumulative_volume))
        .chain(supply.points.iter().map(|p| p.cumulative_volume))
        .filter(|x| *x <= limit)
        .collect();
    breakpoints.sort_unstable();
    breakpoints.dedup();

    let mut demand_span = StepSpan::default();
    let mut supply_span = StepSpan::default();
    let mut crossing: Option<Crossing> = None;

    for x in breakpoints {
        let (d_first, d_last) = demand_span.advance(demand, x);
        let (s_first, s_last) = supply_span.advance(supply, x);
        // Demand prices fall along the curve, supply prices rise.
        let (d_low, d_high) = (
            round_price(demand.points[d_last].price, decimals),
            round_price(demand.points[d_first].price, decimals),
        );
        let (s_low, s_high) = (
            round_price(supply.points[s_first].price, decimals),
            round_price(supply.points[s_last].price, decimals),
        );

        match crossing.as_mut() {
            None => {
                if d_low <= s_high && s_low <= d_high {
                    crossing = Some(Crossing {
                        price: d_low.max(s_low),
                        volume: x,
                    });
                }
            }
            Some(found) => {
                let carries = |low: Decimal, high: Decimal| low <= found.price && found.price <= high;
                if !(carries(d_low, d_high) && carries(s_low, s_high)) {
                    break;
                }
                found.volume = x;
            }
        }
    }

    crossing.filter(|c| c.volume > Decimal::ZERO)
}

/// Range of curve points whose step covers a given volume. Volumes only
/// grow between calls, so both ends only move forward.
#[derive(Debug, Default)]
struct StepSpan {
    first: usize,
    last: usize,
}

impl StepSpan {
    /// Points touching volume `x`: the first whose cumulative volume reaches
    /// `x`, through the last whose run starts at or before `x`. `x` must not
    /// pass the curve's total volume.
    fn advance(&mut self, curve: &Curve, x: Decimal) -> (usize, usize) {
        let points = &curve.points;
        while self.first + 1 < points.len() && points[self.first].cumulative_volume < x {
            self.first += 1;
        }
        while self.last + 1 < points.len() && points[self.last].cumulative_volume <= x {
            self.last += 1;
        }
        (self.first, self.last.max(self.first))
    }
}
