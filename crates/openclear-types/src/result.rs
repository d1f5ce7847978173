//! Clearing outcome of a single market.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::PlotPoint;

/// Equilibrium of one market. Both fields are `None` when the curves do not
/// cross (no trade).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearingResult {
    pub market_code: String,
    /// Clearing price, rounded to the configured number of decimals.
    pub price: Option<Decimal>,
    /// Traded volume at the clearing price.
    pub volume: Option<Decimal>,
}

impl ClearingResult {
    #[must_use]
    pub fn cleared(market_code: impl Into<String>, price: Decimal, volume: Decimal) -> Self {
        Self {
            market_code: market_code.into(),
            price: Some(price),
            volume: Some(volume),
        }
    }

    /// A result with no intersection.
    #[must_use]
    pub fn not_found(market_code: impl Into<String>) -> Self {
        Self {
            market_code: market_code.into(),
            price: None,
            volume: None,
        }
    }

    #[must_use]
    pub fn is_cleared(&self) -> bool {
        self.price.is_some()
    }

    /// Single-point series marking the clearing point on a chart.
    #[must_use]
    pub fn marker(&self) -> Option<PlotPoint> {
        match (self.price, self.volume) {
            (Some(y), Some(x)) => Some(PlotPoint { x, y }),
            _ => None,
        }
    }
}
