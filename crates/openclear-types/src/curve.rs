//! Cumulative supply / demand curves and their plot representation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::Side;

/// One position on a curve: a bid's price and the running volume up to and
/// including that bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub price: Decimal,
    /// Volume of the bid at this position.
    pub volume: Decimal,
    pub cumulative_volume: Decimal,
}

/// A cumulative-volume curve for one side of one market.
///
/// Buy curves run from the highest price down, sell curves from the cheapest
/// up. `cumulative_volume` never decreases along the curve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Curve {
    pub side: Side,
    pub points: Vec<CurvePoint>,
}

impl Curve {
    /// An empty curve for `side`.
    #[must_use]
    pub fn empty(side: Side) -> Self {
        Self {
            side,
            points: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Final cumulative volume, zero for an empty curve.
    #[must_use]
    pub fn total_volume(&self) -> Decimal {
        self.points
            .last()
            .map_or(Decimal::ZERO, |p| p.cumulative_volume)
    }

    /// Points as `(cumulative_volume, price)` pairs, in curve order.
    #[must_use]
    pub fn plot_series(&self) -> Vec<PlotPoint> {
        self.points
            .iter()
            .map(|p| PlotPoint {
                x: p.cumulative_volume,
                y: p.price,
            })
            .collect()
    }
}

/// A chart point: `x` is cumulative volume, `y` is price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotPoint {
    pub x: Decimal,
    pub y: Decimal,
}
