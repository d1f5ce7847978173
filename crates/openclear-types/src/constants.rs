//! System-wide constants for the OpenClear engine.

/// Market code that, when present on any bid, merges every bid of the
/// batch into a single aggregate market.
pub const AGGREGATE_MARKET_CODE: &str = "MI";

/// Default number of decimal places used for price comparison and for the
/// reported clearing price.
pub const DEFAULT_PRICE_DECIMALS: u32 = 2;

/// Largest accepted `rounding.decimals`.
pub const MAX_PRICE_DECIMALS: u32 = 8;

/// Largest accepted bid volume (MWh). Keeps cumulative curve volumes far
/// inside `Decimal` range for any realistic batch.
pub const MAX_BID_VOLUME: i64 = 1_000_000_000_000;

/// Largest accepted absolute price (EUR/MWh), for submitted and imputed
/// prices alike.
pub const MAX_ABS_PRICE: i64 = 1_000_000_000;

/// Default width of a replaced-price frequency bucket (EUR/MWh).
pub const DEFAULT_BUCKET_SIZE: i64 = 20;

/// Uniform draws at or below this value are rejected by the Box-Muller
/// transform to keep `ln(u)` finite.
pub const BOX_MULLER_MIN_UNIFORM: f64 = 1e-10;

/// Period assigned to rows that carry no settlement period.
pub const UNSPECIFIED_PERIOD: u32 = 0;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "OpenClear";
