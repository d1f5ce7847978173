//! Frequency distribution of imputed prices.

use std::collections::BTreeMap;

use openclear_types::{OpenclearError, Result};
use rust_decimal::Decimal;
use serde::Serialize;

/// One histogram bar: prices in `[lower, upper)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrequencyBucket {
    pub lower: Decimal,
    pub upper: Decimal,
    pub count: usize,
}

/// Count `prices` into buckets of width `bucket_size`.
///
/// Buckets start at `floor(min)` and run up to `ceil(max)`. Only non-empty
/// buckets are returned, lowest first. No prices gives no buckets.
pub fn frequency_distribution(prices: &[Decimal], bucket_size: Decimal) -> Result<Vec<FrequencyBucket>> {
    if bucket_size <= Decimal::ZERO {
        return Err(OpenclearError::InvalidBucketSize(bucket_size.to_string()));
    }
    let Some(min) = prices.iter().min() else {
        return Ok(Vec::new());
    };
    let start = min.floor();

    // Bucket index → count. Indices are whole numbers so they order like the buckets.
    let mut counts: BTreeMap<Decimal, usize> = BTreeMap::new();
    for price in prices {
        let index = price
            .checked_sub(start)
            .ok_or_else(|| OpenclearError::Overflow(format!("price {price} minus bucket start {start}")))?
            .checked_div(bucket_size)
            .ok_or_else(|| {
                OpenclearError::InvalidBucketSize(format!("{bucket_size} is too small for price {price}"))
            })?
            .floor();
        *counts.entry(index).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(index, count)| {
            let lower = index
                .checked_mul(bucket_size)
                .and_then(|offset| start.checked_add(offset))
                .ok_or_else(|| OpenclearError::Overflow(format!("lower bound of bucket {index}")))?;
            let upper = lower
                .checked_add(bucket_size)
                .ok_or_else(|| OpenclearError::Overflow(format!("upper bound of bucket {lower} + {bucket_size}")))?;
            Ok(FrequencyBucket { lower, upper, count })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(n: i64) -> Decimal {
        Decimal::new(n, 0)
    }

    #[test]
    fn empty_input_no_buckets() {
        assert!(frequency_distribution(&[], dec(20)).unwrap().is_empty());
    }

    #[test]
    fn buckets_from_floor_of_min() {
        let prices = [Decimal::new(125, 1), dec(20), dec(31), Decimal::new(325, 1), dec(79)];
        let buckets = frequency_distribution(&prices, dec(20)).unwrap();
        // start = 12: [12,32) holds 12.5, 20, 31; [32,52) holds 32.5; [72,92) holds 79
        assert_eq!(
            buckets,
            vec![
                FrequencyBucket { lower: dec(12), upper: dec(32), count: 3 },
                FrequencyBucket { lower: dec(32), upper: dec(52), count: 1 },
                FrequencyBucket { lower: dec(72), upper: dec(92), count: 1 },
            ]
        );
    }

    #[test]
    fn upper_bound_is_exclusive() {
        let buckets = frequency_distribution(&[dec(10), dec(30)], dec(20)).unwrap();
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[1].lower, dec(30));
        assert_eq!(buckets[1].count, 1);
    }

    #[test]
    fn identical_prices_single_bucket() {
        let buckets = frequency_distribution(&[dec(35); 4], dec(20)).unwrap();
        assert_eq!(buckets, vec![FrequencyBucket { lower: dec(35), upper: dec(55), count: 4 }]);
    }

    #[test]
    fn counts_sum_to_input_len() {
        let prices: Vec<Decimal> = (0..97).map(|i| Decimal::new(i * 37 % 500, 1)).collect();
        let buckets = frequency_distribution(&prices, Decimal::new(25, 1)).unwrap();
        assert_eq!(buckets.iter().map(|b| b.count).sum::<usize>(), prices.len());
        assert!(buckets.windows(2).all(|w| w[0].upper <= w[1].lower));
    }

    #[test]
    fn non_positive_bucket_rejected() {
        let err = frequency_distribution(&[dec(1)], Decimal::ZERO).unwrap_err();
        assert!(matches!(err, OpenclearError::InvalidBucketSize(_)));
        assert!(frequency_distribution(&[dec(1)], dec(-5)).is_err());
    }

    #[test]
    fn bucket_bounds_past_decimal_range_are_errors() {
        let err = frequency_distribution(&[Decimal::MAX], dec(20)).unwrap_err();
        assert!(matches!(err, OpenclearError::Overflow(_)), "{err}");

        let err = frequency_distribution(&[Decimal::MIN, Decimal::MAX], Decimal::MAX).unwrap_err();
        assert!(matches!(err, OpenclearError::Overflow(_)), "{err}");
    }
}
