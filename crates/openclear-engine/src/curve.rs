//! Cumulative supply / demand curve construction.
//!
//! Bids are stable-sorted by price (buy: highest first, sell: cheapest
//! first), so bids at the same price keep their input order. The running sum
//! of volume gives each position its cumulative volume. Zero-volume bids keep
//! their position and leave the cumulative volume unchanged.
//!
//! A running sum that leaves `Decimal` range is an error, never a wrap or a
//! panic.

use openclear_types::{Bid, Curve, CurvePoint, OpenclearError, Result, Side};
use rust_decimal::Decimal;

/// Build the curve for `side` in its natural order: descending price for
/// buy, ascending for sell. Bids on the other side are ignored.
pub fn build_curve(side: Side, bids: &[Bid]) -> Result<Curve> {
    build_ordered(side, bids, side == Side::Sell)
}

/// Build a curve for `side` with an explicit price order.
pub fn build_ordered(side: Side, bids: &[Bid], ascending: bool) -> Result<Curve> {
    let mut sorted: Vec<&Bid> = bids.iter().filter(|b| b.side == side).collect();
    if ascending {
        sorted.sort_by(|a, b| a.price.cmp(&b.price));
    } else {
        sorted.sort_by(|a, b| b.price.cmp(&a.price));
    }

    let mut cumulative = Decimal::ZERO;
    let points = sorted
        .into_iter()
        .map(|bid| {
            cumulative = cumulative.checked_add(bid.volume).ok_or_else(|| {
                OpenclearError::Overflow(format!(
                    "{side} curve volume of market {} passes {cumulative} + {}",
                    bid.market_code, bid.volume
                ))
            })?;
            Ok(CurvePoint {
                price: bid.price,
                volume: bid.volume,
                cumulative_volume: cumulative,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Curve { side, points })
}
