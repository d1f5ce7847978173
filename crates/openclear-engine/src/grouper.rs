//! Partition a bid batch into independently cleared markets.
//!
//! If any bid in the batch carries the aggregate code `"MI"`, the whole batch
//! is one market `"MI"` and country codes are ignored. Otherwise every
//! distinct market code is its own market. The choice is made once for the
//! batch.

use std::collections::BTreeMap;

use openclear_types::{Bid, Side, constants::AGGREGATE_MARKET_CODE};

/// The bids of one market, split by side, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarketBids {
    pub buy: Vec<Bid>,
    pub sell: Vec<Bid>,
}

impl MarketBids {
    fn push(&mut self, bid: Bid) {
        match bid.side {
            Side::Buy => self.buy.push(bid),
            Side::Sell => self.sell.push(bid),
        }
    }

    /// Number of bids on both sides.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buy.len() + self.sell.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buy.is_empty() && self.sell.is_empty()
    }
}

/// `true` if the batch is cleared as a single merged market.
#[must_use]
pub fn is_aggregate_batch(bids: &[Bid]) -> bool {
    bids.iter().any(|b| b.market_code == AGGREGATE_MARKET_CODE)
}

/// Group bids by market. Keys iterate in code order.
#[must_use]
pub fn group_markets(bids: &[Bid]) -> BTreeMap<String, MarketBids> {
    let mut markets: BTreeMap<String, MarketBids> = BTreeMap::new();

    if is_aggregate_batch(bids) {
        let merged = markets.entry(AGGREGATE_MARKET_CODE.to_string()).or_default();
        for bid in bids {
            merged.push(bid.clone());
        }
        return markets;
    }

    for bid in bids {
        markets
            .entry(bid.market_code.clone())
            .or_default()
            .push(bid.clone());
    }
    markets
}
