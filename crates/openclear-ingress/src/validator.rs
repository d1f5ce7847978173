//! Row validator: hard gate between raw rows and the engine.
//!
//! Every parsed row passes through the validator before it becomes a bid.
//!
//! ## Rules
//!
//! - **Reject**: non-finite or negative volume, non-finite price, a volume
//!   above [`MAX_BID_VOLUME`](constants::MAX_BID_VOLUME) or a price beyond
//!   ±[`MAX_ABS_PRICE`](constants::MAX_ABS_PRICE). The whole batch fails;
//!   these are data-quality faults, not something to clamp.
//! - **Default**: a missing or malformed volume or price reads as `0`. A zero
//!   price is the missing-price sentinel, so such bids are imputable.
//! - **Skip**: rows whose side code is neither buy nor sell.

use openclear_types::{Bid, BidRow, OpenclearError, Result, Side, TradingSession, constants};
use rust_decimal::Decimal;

use crate::batch::IngestReport;
use crate::lenient::Field;

/// One row as read from the source, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub market_code: String,
    pub side_code: String,
    pub volume: Field,
    pub price: Field,
    pub session: TradingSession,
}

/// Validates rows and accumulates the accepted ones.
#[derive(Debug, Default)]
pub struct RowValidator {
    rows: Vec<BidRow>,
    skipped_rows: usize,
    defaulted_fields: usize,
}

impl RowValidator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate row number `row` (1-based, for messages) and keep it if it
    /// is a bid.
    ///
    /// # Errors
    /// - `InvalidRow` if the market code is blank
    /// - `NonFiniteVolume` / `NegativeVolume` for bad volumes
    /// - `NonFinitePrice` for a NaN or infinite price
    /// - `VolumeOutOfRange` / `PriceOutOfRange` past the ingestion limits
    pub fn push(&mut self, row: usize, raw: RawRow) -> Result<()> {
        let Some(side) = Side::from_code(&raw.side_code) else {
            tracing::warn!(row, side = %raw.side_code, "Skipping row with unknown side code");
            self.skipped_rows += 1;
            return Ok(());
        };

        let market_code = raw.market_code.trim();
        if market_code.is_empty() {
            return Err(OpenclearError::InvalidRow {
                row,
                reason: "empty market code".to_string(),
            });
        }

        let volume = match raw.volume {
            Field::Value(v) if v.is_sign_negative() && !v.is_zero() => {
                return Err(OpenclearError::NegativeVolume {
                    row,
                    value: v.to_string(),
                });
            }
            Field::Value(v) if v > Decimal::from(constants::MAX_BID_VOLUME) => {
                return Err(volume_out_of_range(row, v.to_string()));
            }
            Field::Value(v) => v,
            Field::OutOfRange(value) => return Err(volume_out_of_range(row, value)),
            Field::NonFinite(value) => return Err(OpenclearError::NonFiniteVolume { row, value }),
            Field::Missing => self.default_field(row, "volume", None),
            Field::Malformed(text) => self.default_field(row, "volume", Some(&text)),
        };

        let price = match raw.price {
            Field::Value(p) if p.abs() > Decimal::from(constants::MAX_ABS_PRICE) => {
                return Err(price_out_of_range(row, p.to_string()));
            }
            Field::Value(p) => p,
            Field::OutOfRange(value) => return Err(price_out_of_range(row, value)),
            Field::NonFinite(value) => return Err(OpenclearError::NonFinitePrice { row, value }),
            Field::Missing => self.default_field(row, "price", None),
            Field::Malformed(text) => self.default_field(row, "price", Some(&text)),
        };

        self.rows.push(BidRow::new(
            raw.session,
            Bid::new(market_code, side, volume, price),
        ));
        Ok(())
    }

    /// Number of rows accepted so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Close the batch.
    #[must_use]
    pub fn finish(self) -> IngestReport {
        tracing::info!(
            rows = self.rows.len(),
            skipped = self.skipped_rows,
            defaulted = self.defaulted_fields,
            "Bid rows ingested"
        );
        IngestReport {
            rows: self.rows,
            skipped_rows: self.skipped_rows,
            defaulted_fields: self.defaulted_fields,
        }
    }

    fn default_field(&mut self, row: usize, field: &'static str, text: Option<&str>) -> Decimal {
        self.defaulted_fields += 1;
        if let Some(text) = text {
            tracing::warn!(row, field, value = %text, "Malformed number read as 0");
        }
        Decimal::ZERO
    }
}

fn volume_out_of_range(row: usize, value: String) -> OpenclearError {
    OpenclearError::VolumeOutOfRange {
        row,
        value,
        max: constants::MAX_BID_VOLUME,
    }
}

fn price_out_of_range(row: usize, value: String) -> OpenclearError {
    OpenclearError::PriceOutOfRange {
        row,
        value,
        max: constants::MAX_ABS_PRICE,
    }
}
