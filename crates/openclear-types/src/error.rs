//! Error types for the OpenClear engine.
//!
//! All errors use the `OC_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Ingestion / data-quality errors
//! - 2xx: Imputation / distribution errors
//! - 3xx: Engine configuration errors
//! - 9xx: General / internal errors
//!
//! "No crossing" is not an error: the solver reports it as a
//! [`ClearingResult`](crate::ClearingResult) with neither price nor volume.

use thiserror::Error;

/// Central error enum for all OpenClear operations.
#[derive(Debug, Error)]
pub enum OpenclearError {
    // =================================================================
    // Ingestion Errors (1xx)
    // =================================================================
    /// A row could not be turned into a bid at all.
    #[error("OC_ERR_100: Invalid bid row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },

    /// The volume is NaN or infinite.
    #[error("OC_ERR_101: Non-finite volume in row {row}: {value}")]
    NonFiniteVolume { row: usize, value: String },

    /// The volume is below zero.
    #[error("OC_ERR_102: Negative volume in row {row}: {value}")]
    NegativeVolume { row: usize, value: String },

    /// The price is NaN or infinite.
    #[error("OC_ERR_103: Non-finite price in row {row}: {value}")]
    NonFinitePrice { row: usize, value: String },

    /// The curve file has no header row with the required columns.
    #[error("OC_ERR_104: Curve file header not found (missing column {column})")]
    MissingColumn { column: String },

    /// The volume is finite but beyond the accepted bid volume.
    #[error("OC_ERR_105: Volume out of range in row {row}: {value} (max {max})")]
    VolumeOutOfRange { row: usize, value: String, max: i64 },

    /// The price is finite but beyond the accepted absolute price.
    #[error("OC_ERR_106: Price out of range in row {row}: {value} (max abs {max})")]
    PriceOutOfRange { row: usize, value: String, max: i64 },

    // =================================================================
    // Imputation Errors (2xx)
    // =================================================================
    /// Distribution parameters are inconsistent (min > max, stddev <= 0, ...).
    #[error("OC_ERR_200: Invalid distribution: {reason}")]
    InvalidDistribution { reason: String },

    /// A drawn sample cannot be represented as a price.
    #[error("OC_ERR_201: Sampled price is not representable: {value}")]
    UnrepresentableSample { value: f64 },

    // =================================================================
    // Engine Configuration Errors (3xx)
    // =================================================================
    /// Rounding precision outside the supported range.
    #[error("OC_ERR_300: Invalid rounding precision {decimals} (max {max})")]
    InvalidPrecision { decimals: u32, max: u32 },

    /// Unknown strategy / kind / side-filter name.
    #[error("OC_ERR_301: Unknown {field} value: {value}")]
    UnknownOption { field: &'static str, value: String },

    /// Histogram bucket width must be positive.
    #[error("OC_ERR_302: Invalid histogram bucket size: {0}")]
    InvalidBucketSize(String),

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("OC_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("OC_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config file, missing fields, etc.).
    #[error("OC_ERR_902: Configuration error: {0}")]
    Configuration(String),

    /// A `Decimal` computation left the representable range.
    #[error("OC_ERR_904: Arithmetic overflow: {0}")]
    Overflow(String),

    /// I/O error.
    #[error("OC_ERR_903: I/O error: {0}")]
    Io(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, OpenclearError>;

impl From<std::io::Error> for OpenclearError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for OpenclearError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
