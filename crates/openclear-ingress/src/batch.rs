//! Validated bid batches and their split into settlement periods.

use std::collections::BTreeMap;

use openclear_types::{Bid, BidRow, constants};

/// Output of an ingestion pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Accepted rows in source order.
    pub rows: Vec<BidRow>,
    /// Rows dropped for an unknown side code.
    pub skipped_rows: usize,
    /// Numeric fields that were missing or malformed and read as `0`.
    pub defaulted_fields: usize,
}

impl IngestReport {
    /// The bids, without their session tags.
    #[must_use]
    pub fn bids(&self) -> Vec<Bid> {
        self.rows.iter().map(|r| r.bid.clone()).collect()
    }

    #[must_use]
    pub fn into_bids(self) -> Vec<Bid> {
        self.rows.into_iter().map(BidRow::into_bid).collect()
    }

    /// Keep only rows of settlement period `period`.
    #[must_use]
    pub fn retain_period(mut self, period: u32) -> Self {
        self.rows.retain(|r| r.session.period == Some(period));
        self
    }

    /// Bids grouped by settlement period. See [`split_by_period`].
    #[must_use]
    pub fn into_periods(self) -> BTreeMap<u32, Vec<Bid>> {
        split_by_period(self.rows)
    }
}

/// Group rows by settlement period, ascending. Rows without a period land in
/// [`UNSPECIFIED_PERIOD`](constants::UNSPECIFIED_PERIOD). Source order is kept
/// within each period.
#[must_use]
pub fn split_by_period(rows: Vec<BidRow>) -> BTreeMap<u32, Vec<Bid>> {
    let mut periods: BTreeMap<u32, Vec<Bid>> = BTreeMap::new();
    for row in rows {
        let period = row.session.period.unwrap_or(constants::UNSPECIFIED_PERIOD);
        periods.entry(period).or_default().push(row.bid);
    }
    periods
}
