//! # openclear-ingress
//!
//! **Ingestion gate**: turns rows from the data-fetch collaborator into
//! validated bids for the engine.
//!
//! ## Flow
//!
//! ```text
//! JSON rows / curve file → lenient number parsing → RowValidator
//!     → IngestReport → split_by_period → ClearingEngine
//! ```
//!
//! 1. **Readers**: [`parse_json_rows`] for store row sets, [`parse_curve_file`]
//!    for the operator's semicolon-separated curve files
//! 2. **Lenient parsing**: missing or malformed numbers read as `0`
//! 3. **RowValidator**: hard gate that rejects non-finite or negative
//!    volumes and non-finite prices, and skips rows with unknown side codes
//! 4. **IngestReport**: accepted rows plus skip / default counters
//!
//! Data-quality faults are rejected here so the engine never has to clamp.

pub mod batch;
pub mod curve_file;
pub mod json_rows;
pub mod lenient;
pub mod validator;

pub use batch::{IngestReport, split_by_period};
pub use curve_file::{CurveFileFilter, decode_text, parse_curve_file};
pub use json_rows::parse_json_rows;
pub use lenient::{Field, parse_european, parse_plain};
pub use validator::{RawRow, RowValidator};
