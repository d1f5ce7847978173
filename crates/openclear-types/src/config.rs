//! Configuration types for the clearing engine.
//!
//! ```json
//! {
//!   "imputation": { "kind": "normal", "mean": 40.0, "stddev": 8.0, "side_filter": "sell" },
//!   "solver": { "strategy": "threshold_crossing" },
//!   "rounding": { "decimals": 2 },
//!   "histogram": { "bucket_size": 20 }
//! }
//! ```

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{MISSING_PRICE, OpenclearError, Result, SideFilter, constants};

/// Distribution that replaces missing prices.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PriceDistribution {
    /// Leave missing prices as they are.
    #[default]
    None,
    /// Every replaced price becomes `value`.
    Fixed { value: Decimal },
    /// Independent draws from `[min, max)`.
    Uniform { min: f64, max: f64 },
    /// Independent draws from `N(mean, stddev²)`.
    Normal { mean: f64, stddev: f64 },
    /// `exp(z)` with `z ~ N(mu, sigma²)`.
    LogNormal { mu: f64, sigma: f64 },
}

impl PriceDistribution {
    /// Reject parameter sets that would produce silently wrong samples.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::None => Ok(()),
            Self::Fixed { value } => {
                if value == MISSING_PRICE {
                    return Err(invalid(format!("fixed value {value} is the missing-price sentinel")));
                }
                if value.abs() > Decimal::from(constants::MAX_ABS_PRICE) {
                    return Err(invalid(format!(
                        "fixed value {value} exceeds the price limit {}",
                        constants::MAX_ABS_PRICE
                    )));
                }
                Ok(())
            }
            Self::Uniform { min, max } => {
                if !min.is_finite() || !max.is_finite() {
                    return Err(invalid(format!("uniform bounds must be finite (min {min}, max {max})")));
                }
                if min > max {
                    return Err(invalid(format!("uniform min {min} > max {max}")));
                }
                #[allow(clippy::cast_precision_loss)]
                let limit = constants::MAX_ABS_PRICE as f64;
                if min.abs() > limit || max.abs() > limit {
                    return Err(invalid(format!(
                        "uniform bounds [{min}, {max}) exceed the price limit {limit}"
                    )));
                }
                Ok(())
            }
            Self::Normal { mean, stddev } => check_location_scale("normal", "mean", mean, "stddev", stddev),
            Self::LogNormal { mu, sigma } => check_location_scale("lognormal", "mu", mu, "sigma", sigma),
        }
    }

    /// `true` for every kind except [`PriceDistribution::None`].
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Display for PriceDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Fixed { value } => write!(f, "fixed({value})"),
            Self::Uniform { min, max } => write!(f, "uniform[{min}, {max})"),
            Self::Normal { mean, stddev } => write!(f, "normal(mean={mean}, stddev={stddev})"),
            Self::LogNormal { mu, sigma } => write!(f, "lognormal(mu={mu}, sigma={sigma})"),
        }
    }
}

fn invalid(reason: String) -> OpenclearError {
    OpenclearError::InvalidDistribution { reason }
}

fn check_location_scale(kind: &str, loc_name: &str, loc: f64, scale_name: &str, scale: f64) -> Result<()> {
    if !loc.is_finite() {
        return Err(invalid(format!("{kind} {loc_name} must be finite, got {loc}")));
    }
    if !scale.is_finite() || scale <= 0.0 {
        return Err(invalid(format!("{kind} {scale_name} must be positive, got {scale}")));
    }
    Ok(())
}

/// Which bids get their missing price replaced, and with what.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImputationConfig {
    #[serde(flatten)]
    pub distribution: PriceDistribution,
    #[serde(default)]
    pub side_filter: SideFilter,
}

impl ImputationConfig {
    #[must_use]
    pub fn new(distribution: PriceDistribution, side_filter: SideFilter) -> Self {
        Self {
            distribution,
            side_filter,
        }
    }
}

/// Algorithm used to locate the supply/demand intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverStrategy {
    /// First supply point whose cumulative volume covers the demand priced
    /// at or above it.
    #[default]
    ThresholdCrossing,
    /// Simultaneous walk over both curves, stopping where the buy price
    /// drops below the sell price.
    TwoPointer,
    /// First point where the two step curves, drawn with their horizontal
    /// and vertical segments, touch.
    StepIntersection,
}

impl fmt::Display for SolverStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ThresholdCrossing => write!(f, "threshold_crossing"),
            Self::TwoPointer => write!(f, "two_pointer"),
            Self::StepIntersection => write!(f, "step_intersection"),
        }
    }
}

impl std::str::FromStr for SolverStrategy {
    type Err = OpenclearError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "threshold_crossing" => Ok(Self::ThresholdCrossing),
            "two_pointer" => Ok(Self::TwoPointer),
            "step_intersection" => Ok(Self::StepIntersection),
            other => Err(OpenclearError::UnknownOption {
                field: "solver.strategy",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SolverConfig {
    #[serde(default)]
    pub strategy: SolverStrategy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundingConfig {
    /// Decimal places for price comparison and the reported clearing price.
    pub decimals: u32,
}

impl Default for RoundingConfig {
    fn default() -> Self {
        Self {
            decimals: constants::DEFAULT_PRICE_DECIMALS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistogramConfig {
    /// Width of a replaced-price frequency bucket.
    pub bucket_size: Decimal,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            bucket_size: Decimal::new(constants::DEFAULT_BUCKET_SIZE, 0),
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Scenario imputation applied by default; `None` clears bids as given.
    #[serde(default)]
    pub imputation: Option<ImputationConfig>,
    #[serde(default)]
    pub solver: SolverConfig,
    #[serde(default)]
    pub rounding: RoundingConfig,
    #[serde(default)]
    pub histogram: HistogramConfig,
}

impl EngineConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)
            .map_err(|e| OpenclearError::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Fail fast on any inconsistent setting.
    pub fn validate(&self) -> Result<()> {
        if let Some(imputation) = &self.imputation {
            imputation.distribution.validate()?;
        }
        if self.rounding.decimals > constants::MAX_PRICE_DECIMALS {
            return Err(OpenclearError::InvalidPrecision {
                decimals: self.rounding.decimals,
                max: constants::MAX_PRICE_DECIMALS,
            });
        }
        if self.histogram.bucket_size <= Decimal::ZERO {
            return Err(OpenclearError::InvalidBucketSize(
                self.histogram.bucket_size.to_string(),
            ));
        }
        Ok(())
    }
}
