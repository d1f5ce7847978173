//! Trading day / settlement period that a batch of bids belongs to.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Where a bid row sits in the market calendar. Either part may be unknown
/// when the supplier omits it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Default, Serialize, Deserialize)]
pub struct TradingSession {
    pub day: Option<NaiveDate>,
    /// Settlement period within the day (hourly periods are 1..=24).
    pub period: Option<u32>,
}

impl TradingSession {
    #[must_use]
    pub fn new(day: NaiveDate, period: u32) -> Self {
        Self {
            day: Some(day),
            period: Some(period),
        }
    }
}

impl fmt::Display for TradingSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.day, self.period) {
            (Some(day), Some(period)) => write!(f, "{day} P{period}"),
            (Some(day), None) => write!(f, "{day}"),
            (None, Some(period)) => write!(f, "P{period}"),
            (None, None) => write!(f, "-"),
        }
    }
}
