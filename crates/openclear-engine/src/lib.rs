//! # openclear-engine
//!
//! **Pure deterministic clearing engine for OpenClear.**
//!
//! The engine is the compute plane: it takes a materialised batch of bids
//! and produces per-market clearing results plus the curves behind them. It
//! has:
//!
//! - **Zero side effects**: no I/O, no global state
//! - **Caller-owned randomness**: imputation draws from an injected generator,
//!   so a seeded run is reproducible
//! - **Deterministic output**: stable sorts and ordered maps throughout
//! - **Independent markets**: each market is cleared from its own curves only
//!
//! Pipeline: [`PriceImputer`] → [`group_markets`] → [`build_curve`] (both
//! sides) → [`solve`] → [`ClearingResult`](openclear_types::ClearingResult).

pub mod clearing;
pub mod curve;
pub mod determinism;
pub mod engine;
pub mod grouper;
pub mod histogram;
pub mod imputer;
pub mod scenario;

pub use clearing::{
    Crossing, round_price, solve, step_intersection, threshold_crossing, two_pointer,
};
pub use curve::{build_curve, build_ordered};
pub use determinism::{compute_run_digest, run_digest_hex, verify_run_digest};
pub use engine::{ClearingEngine, ClearingRun, DailyClearing, MarketClearing};
pub use grouper::{MarketBids, group_markets, is_aggregate_batch};
pub use histogram::{FrequencyBucket, frequency_distribution};
pub use imputer::{Imputation, PriceImputer, ReplacedPrice};
pub use scenario::{ComparisonRow, ScenarioComparison};
