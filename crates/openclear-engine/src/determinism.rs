//! Reproducibility checks for clearing runs.
//!
//! A seeded scenario must give the same clearing run every time it is
//! replayed. The run digest is a SHA-256 over everything a run reports, so
//! two runs can be compared without diffing full payloads.

use openclear_types::Curve;
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};

use crate::engine::ClearingRun;

/// Compute the digest of a clearing run.
///
/// The hash depends on:
/// - Market codes (in code order)
/// - Clearing price and volume of each market
/// - Every demand and supply curve point
/// - Imputed prices (in input order)
///
/// Decimals are hashed by value, so `45` and `45.00` hash alike.
#[must_use]
pub fn compute_run_digest(run: &ClearingRun) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(b"openclear:run:v1:");
    hasher.update((run.markets.len() as u64).to_le_bytes());

    for (code, market) in &run.markets {
        hash_str(&mut hasher, code);
        hash_optional(&mut hasher, market.result.price);
        hash_optional(&mut hasher, market.result.volume);
        hash_curve(&mut hasher, &market.demand);
        hash_curve(&mut hasher, &market.supply);
    }

    hasher.update((run.replaced.len() as u64).to_le_bytes());
    for replaced in &run.replaced {
        hasher.update((replaced.index as u64).to_le_bytes());
        hash_decimal(&mut hasher, replaced.price);
    }

    let result = hasher.finalize();
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&result);
    digest
}

/// Hex form of [`compute_run_digest`].
#[must_use]
pub fn run_digest_hex(run: &ClearingRun) -> String {
    hex::encode(compute_run_digest(run))
}

/// Recompute the digest of `run` and compare with `expected`.
#[must_use]
pub fn verify_run_digest(run: &ClearingRun, expected: &[u8; 32]) -> bool {
    compute_run_digest(run) == *expected
}

fn hash_str(hasher: &mut Sha256, value: &str) {
    hasher.update((value.len() as u64).to_le_bytes());
    hasher.update(value.as_bytes());
}

fn hash_decimal(hasher: &mut Sha256, value: Decimal) {
    hash_str(hasher, &value.normalize().to_string());
}

fn hash_optional(hasher: &mut Sha256, value: Option<Decimal>) {
    match value {
        Some(v) => {
            hasher.update([1u8]);
            hash_decimal(hasher, v);
        }
        None => hasher.update([0u8]),
    }
}

fn hash_curve(hasher: &mut Sha256, curve: &Curve) {
    hasher.update((curve.points.len() as u64).to_le_bytes());
    for point in &curve.points {
        hash_decimal(hasher, point.price);
        hash_decimal(hasher, point.volume);
        hash_decimal(hasher, point.cumulative_volume);
    }
}
