//! Bid types for the OpenClear engine.
//!
//! A bid with price `0` has no submitted price ("accept market price").
//! A genuinely zero-priced bid cannot be told apart from a missing one; the
//! data source does not carry the distinction, so neither does this model.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Price value meaning "no explicit price submitted".
pub const MISSING_PRICE: Decimal = Decimal::ZERO;

/// Which side of the auction this bid is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Parse a side code as emitted by the market operator or the data store.
    ///
    /// `C` (compra) and `V` (venta) are the operator codes; `B`/`S` and the
    /// English words are accepted too. Matching is case-insensitive.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "C" | "B" | "BUY" => Some(Self::Buy),
            "V" | "S" | "SELL" => Some(Self::Sell),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// Which sides a price imputation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SideFilter {
    Buy,
    Sell,
    #[default]
    Both,
}

impl SideFilter {
    #[must_use]
    pub fn matches(self, side: Side) -> bool {
        match self {
            Self::Both => true,
            Self::Buy => side == Side::Buy,
            Self::Sell => side == Side::Sell,
        }
    }
}

impl fmt::Display for SideFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
            Self::Both => write!(f, "both"),
        }
    }
}

impl std::str::FromStr for SideFilter {
    type Err = crate::OpenclearError;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" => Ok(Self::Buy),
            "sell" => Ok(Self::Sell),
            "both" => Ok(Self::Both),
            other => Err(crate::OpenclearError::UnknownOption {
                field: "imputation.side_filter",
                value: other.to_string(),
            }),
        }
    }
}

/// A single buy or sell bid for one settlement period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    /// Country code, or `"MI"` for the merged market.
    pub market_code: String,
    pub side: Side,
    /// Offered or requested energy (MWh). Never negative once ingested.
    pub volume: Decimal,
    /// Limit price (EUR/MWh). [`MISSING_PRICE`] when none was submitted.
    pub price: Decimal,
}

impl Bid {
    #[must_use]
    pub fn new(market_code: impl Into<String>, side: Side, volume: Decimal, price: Decimal) -> Self {
        Self {
            market_code: market_code.into(),
            side,
            volume,
            price,
        }
    }

    #[must_use]
    pub fn buy(market_code: impl Into<String>, volume: Decimal, price: Decimal) -> Self {
        Self::new(market_code, Side::Buy, volume, price)
    }

    #[must_use]
    pub fn sell(market_code: impl Into<String>, volume: Decimal, price: Decimal) -> Self {
        Self::new(market_code, Side::Sell, volume, price)
    }

    /// `true` when the bid carries the missing-price sentinel.
    #[must_use]
    pub fn has_missing_price(&self) -> bool {
        self.price == MISSING_PRICE
    }
}

/// A bid as delivered by the ingestion gate, tagged with its session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidRow {
    pub session: crate::TradingSession,
    pub bid: Bid,
}

impl BidRow {
    #[must_use]
    pub fn new(session: crate::TradingSession, bid: Bid) -> Self {
        Self { session, bid }
    }

    /// Strip the session tag.
    #[must_use]
    pub fn into_bid(self) -> Bid {
        self.bid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_codes() {
        assert_eq!(Side::from_code("C"), Some(Side::Buy));
        assert_eq!(Side::from_code("v"), Some(Side::Sell));
        assert_eq!(Side::from_code(" Buy "), Some(Side::Buy));
        assert_eq!(Side::from_code("SELL"), Some(Side::Sell));
        assert_eq!(Side::from_code("X"), None);
        assert_eq!(Side::from_code(""), None);
    }

    #[test]
    fn side_display() {
        assert_eq!(format!("{}", Side::Buy), "BUY");
        assert_eq!(format!("{}", Side::Sell), "SELL");
    }

    #[test]
    fn side_filter_matching() {
        assert!(SideFilter::Both.matches(Side::Buy));
        assert!(SideFilter::Both.matches(Side::Sell));
        assert!(SideFilter::Sell.matches(Side::Sell));
        assert!(!SideFilter::Sell.matches(Side::Buy));
        assert!(!SideFilter::Buy.matches(Side::Sell));
    }

    #[test]
    fn side_filter_parse() {
        assert_eq!("SELL".parse::<SideFilter>().unwrap(), SideFilter::Sell);
        assert!("neither".parse::<SideFilter>().is_err());
        assert_eq!(SideFilter::default(), SideFilter::Both);
    }

    #[test]
    fn zero_price_is_missing() {
        let bid = Bid::sell("ES", Decimal::new(10, 0), Decimal::ZERO);
        assert!(bid.has_missing_price());
        let priced = Bid::sell("ES", Decimal::new(10, 0), Decimal::new(1, 2));
        assert!(!priced.has_missing_price());
    }

    #[test]
    fn bid_serde_shape() {
        let bid = Bid::buy("PT", Decimal::new(125, 1), Decimal::new(4550, 2));
        let json = serde_json::to_value(&bid).unwrap();
        assert_eq!(json["market_code"], "PT");
        assert_eq!(json["side"], "Buy");
        let back: Bid = serde_json::from_value(json).unwrap();
        assert_eq!(back, bid);
    }
}
