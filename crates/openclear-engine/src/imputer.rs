//! Missing-price imputation.
//!
//! Bids submitted without a price carry [`MISSING_PRICE`](openclear_types::MISSING_PRICE).
//! For counterfactual scenarios the imputer replaces those prices with draws
//! from a configured distribution. The random generator is owned by the
//! imputer and handed in by the caller, so a seeded generator gives a
//! reproducible scenario.
//!
//! The input slice is never touched: the imputer returns a fresh bid list
//! plus a record of every replacement.

use std::f64::consts::PI;

use openclear_types::{
    Bid, ImputationConfig, MISSING_PRICE, OpenclearError, PriceDistribution, Result, Side, SideFilter,
    constants,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::Serialize;

/// A single replaced price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplacedPrice {
    /// Position of the bid in the input batch.
    pub index: usize,
    pub market_code: String,
    pub side: Side,
    pub price: Decimal,
}

/// Output of [`PriceImputer::impute`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Imputation {
    /// Copy of the input with targeted missing prices replaced.
    pub bids: Vec<Bid>,
    /// Replacements in input order.
    pub replaced: Vec<ReplacedPrice>,
}

impl Imputation {
    /// Just the replacement prices, in input order.
    #[must_use]
    pub fn replaced_prices(&self) -> Vec<Decimal> {
        self.replaced.iter().map(|r| r.price).collect()
    }
}

/// Replaces missing prices using a caller-supplied random generator.
#[derive(Debug)]
pub struct PriceImputer<R> {
    rng: R,
}

impl PriceImputer<StdRng> {
    /// Imputer backed by a `StdRng` seeded with `seed`.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> PriceImputer<R> {
    #[must_use]
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Give the generator back to the caller.
    pub fn into_inner(self) -> R {
        self.rng
    }

    /// Replace the missing price of every bid on a side matched by
    /// `side_filter` with a draw from `distribution`.
    ///
    /// Fails before touching any bid if the distribution parameters are
    /// inconsistent, and fails if a draw cannot be represented as a price.
    pub fn impute(
        &mut self,
        bids: &[Bid],
        side_filter: SideFilter,
        distribution: &PriceDistribution,
    ) -> Result<Imputation> {
        distribution.validate()?;

        let mut out = bids.to_vec();
        let mut replaced = Vec::new();
        if !distribution.is_active() {
            return Ok(Imputation { bids: out, replaced });
        }

        let mut sampler = Sampler::new(&mut self.rng);
        for (index, bid) in out.iter_mut().enumerate() {
            if !bid.has_missing_price() || !side_filter.matches(bid.side) {
                continue;
            }
            let price = sampler.draw(distribution)?;
            bid.price = price;
            replaced.push(ReplacedPrice {
                index,
                market_code: bid.market_code.clone(),
                side: bid.side,
                price,
            });
        }

        tracing::debug!(
            replaced = replaced.len(),
            total = bids.len(),
            %distribution,
            %side_filter,
            "Imputed missing prices"
        );

        Ok(Imputation { bids: out, replaced })
    }

    /// [`impute`](Self::impute) driven by an [`ImputationConfig`].
    pub fn apply(&mut self, bids: &[Bid], config: &ImputationConfig) -> Result<Imputation> {
        self.impute(bids, config.side_filter, &config.distribution)
    }
}

/// Per-call sampling state. The spare Box-Muller deviate lives here so
/// nothing leaks from one imputation into the next.
struct Sampler<'a, R> {
    rng: &'a mut R,
    spare_normal: Option<f64>,
}

impl<'a, R: Rng> Sampler<'a, R> {
    fn new(rng: &'a mut R) -> Self {
        Self {
            rng,
            spare_normal: None,
        }
    }

    fn draw(&mut self, distribution: &PriceDistribution) -> Result<Decimal> {
        let sample = match *distribution {
            PriceDistribution::None => return Err(OpenclearError::Internal(
                "draw requested from an inactive distribution".into(),
            )),
            PriceDistribution::Fixed { value } => return Ok(value),
            PriceDistribution::Uniform { min, max } if min < max => self.rng.gen_range(min..max),
            PriceDistribution::Uniform { min, .. } => min,
            PriceDistribution::Normal { mean, stddev } => mean + stddev * self.standard_normal(),
            PriceDistribution::LogNormal { mu, sigma } => (mu + sigma * self.standard_normal()).exp(),
        };
        to_price(sample)
    }

    /// Box-Muller transform: two uniforms give two independent standard
    /// normal deviates; the second is kept for the next call.
    fn standard_normal(&mut self) -> f64 {
        if let Some(z) = self.spare_normal.take() {
            return z;
        }
        let mut u1: f64 = self.rng.r#gen();
        while u1 <= constants::BOX_MULLER_MIN_UNIFORM {
            u1 = self.rng.r#gen();
        }
        let u2: f64 = self.rng.r#gen();
        let radius = (-2.0 * u1.ln()).sqrt();
        let theta = 2.0 * PI * u2;
        self.spare_normal = Some(radius * theta.sin());
        radius * theta.cos()
    }
}

/// A draw becomes a price only if it survives the conversion as a usable,
/// in-range value. A non-zero draw that rounds to the missing-price
/// sentinel would read as "still missing" downstream.
fn to_price(sample: f64) -> Result<Decimal> {
    let unrepresentable = || OpenclearError::UnrepresentableSample { value: sample };
    let price = Decimal::from_f64(sample).ok_or_else(unrepresentable)?;
    if price == MISSING_PRICE && sample != 0.0 {
        return Err(unrepresentable());
    }
    if price.abs() > Decimal::from(constants::MAX_ABS_PRICE) {
        return Err(unrepresentable());
    }
    Ok(price)
}
