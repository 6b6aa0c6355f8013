//! Combining partial hit counts into the final estimate.

use std::f64::consts::PI;

use crate::error::{EstimateError, Result};

/// Total hits over total samples, and the π estimate derived from them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AggregateResult {
    inside: u64,
    sampled: u64,
    estimate: f64,
}

impl AggregateResult {
    /// Points that landed inside the unit circle.
    pub fn inside(&self) -> u64 {
        self.inside
    }

    /// Points actually drawn across all workers.
    pub fn sampled(&self) -> u64 {
        self.sampled
    }

    /// `4 * inside / sampled`.
    pub fn estimate(&self) -> f64 {
        self.estimate
    }

    /// Distance of the estimate from π.
    pub fn abs_error(&self) -> f64 {
        (PI - self.estimate).abs()
    }

    /// Binomial standard error of the estimate, `4 * sqrt(p (1 - p) / n)`.
    pub fn standard_error(&self) -> f64 {
        let n = self.sampled as f64;
        let p = self.inside as f64 / n;
        4.0 * (p * (1.0 - p) / n).sqrt()
    }
}

/// Sums `partials` and divides by `sampled_total`.
///
/// `sampled_total` must be the number of samples really drawn, i.e. the sum
/// of the chunks handed to the workers.
///
/// # Errors
///
/// - [`EstimateError::EmptySample`] if `sampled_total` is 0
/// - [`EstimateError::Overflow`] if the hit count does not fit in `u64`
/// - [`EstimateError::InconsistentPartials`] if the hits exceed `sampled_total`
pub fn reduce(partials: &[u64], sampled_total: u64) -> Result<AggregateResult> {
    if sampled_total == 0 {
        return Err(EstimateError::EmptySample);
    }

    let inside = partials
        .iter()
        .try_fold(0u64, |acc, &hits| acc.checked_add(hits))
        .ok_or(EstimateError::Overflow)?;

    if inside > sampled_total {
        return Err(EstimateError::InconsistentPartials {
            inside,
            sampled: sampled_total,
        });
    }

    Ok(AggregateResult {
        inside,
        sampled: sampled_total,
        estimate: 4.0 * inside as f64 / sampled_total as f64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_reduce_basic() {
        let agg = reduce(&[3], 4).unwrap();
        assert_eq!(agg.inside(), 3);
        assert_eq!(agg.sampled(), 4);
        assert_relative_eq!(agg.estimate(), 3.0);
    }

    #[test]
    fn test_reduce_sums_partials() {
        let agg = reduce(&[785, 786, 784, 787], 4000).unwrap();
        assert_eq!(agg.inside(), 3142);
        assert_relative_eq!(agg.estimate(), 3.142);
        assert_relative_eq!(agg.abs_error(), (PI - 3.142).abs());
    }

    #[test]
    fn test_zero_denominator_is_fatal() {
        assert!(matches!(reduce(&[], 0), Err(EstimateError::EmptySample)));
    }

    #[test]
    fn test_overflow_detected() {
        assert!(matches!(
            reduce(&[u64::MAX, 1], u64::MAX),
            Err(EstimateError::Overflow)
        ));
    }

    #[test]
    fn test_more_hits_than_samples_rejected() {
        assert!(matches!(
            reduce(&[5, 5], 9),
            Err(EstimateError::InconsistentPartials {
                inside: 10,
                sampled: 9
            })
        ));
    }

    #[test]
    fn test_standard_error() {
        let agg = reduce(&[785_398], 1_000_000).unwrap();
        let p: f64 = 0.785_398;
        assert_relative_eq!(
            agg.standard_error(),
            4.0 * (p * (1.0 - p) / 1e6).sqrt(),
            epsilon = 1e-12
        );
    }

    proptest! {
        #[test]
        fn prop_reduce_is_permutation_invariant(
            mut partials in proptest::collection::vec(0u64..1_000_000, 1..32),
            rotate in 0usize..32,
        ) {
            let total: u64 = partials.iter().sum::<u64>() + 1;
            let before = reduce(&partials, total).unwrap();
            let k = rotate % partials.len();
            partials.rotate_left(k);
            partials.reverse();
            let after = reduce(&partials, total).unwrap();
            prop_assert_eq!(before, after);
        }
    }
}
