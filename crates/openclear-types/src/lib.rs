//! # openclear-types
//!
//! Shared types, errors, and configuration for the **OpenClear** auction
//! clearing engine.
//!
//! This crate is the leaf dependency of the workspace: every other crate
//! depends on it. It defines:
//!
//! - **Bid model**: [`Bid`], [`BidRow`], [`Side`], [`SideFilter`], [`MISSING_PRICE`]
//! - **Curves**: [`Curve`], [`CurvePoint`], [`PlotPoint`]
//! - **Results**: [`ClearingResult`]
//! - **Calendar**: [`TradingSession`]
//! - **Configuration**: [`EngineConfig`], [`ImputationConfig`], [`PriceDistribution`], [`SolverStrategy`]
//! - **Errors**: [`OpenclearError`] with `OC_ERR_` prefix codes
//! - **Constants**: system-wide defaults

pub mod bid;
pub mod config;
pub mod constants;
pub mod curve;
pub mod error;
pub mod result;
pub mod session;

// Re-export all primary types at crate root for ergonomic imports:
//   use openclear_types::{Bid, Side, Curve, ClearingResult, ...};

pub use bid::*;
pub use config::*;
pub use curve::*;
pub use error::*;
pub use result::*;
pub use session::*;

// Constants are accessed via `openclear_types::constants::FOO`
// (not re-exported to avoid name collisions).
