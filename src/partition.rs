//! Splitting a global sample count across workers.
//!
//! The remainder of `total / workers` is handed out one sample at a time to
//! the leading workers, so the chunks always sum to `total` and the reducer
//! can divide by the number of samples that were actually drawn.

use crate::error::ConfigError;

/// Per-worker sample counts for one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Partition {
    chunks: Vec<u64>,
    total: u64,
}

impl Partition {
    /// Chunk sizes in worker order.
    pub fn chunks(&self) -> &[u64] {
        &self.chunks
    }

    /// Sum of all chunks.
    pub fn total(&self) -> u64 {
        self.total
    }

}

/// Splits `total` samples into `workers` chunks.
///
/// The first `total % workers` chunks are one larger than the rest. When
/// `workers > total` the trailing chunks are empty.
///
/// # Errors
///
/// Returns [`ConfigError::ZeroWorkers`] if `workers` is 0.
pub fn partition(total: u64, workers: usize) -> Result<Partition, ConfigError> {
    if workers == 0 {
        return Err(ConfigError::ZeroWorkers(workers));
    }

    let n = workers as u64;
    let base = total / n;
    let remainder = total % n;

    let chunks = (0..n)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect();

    Ok(Partition { chunks, total })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_even_split() {
        let p = partition(100, 4).unwrap();
        assert_eq!(p.chunks(), &[25, 25, 25, 25]);
        assert_eq!(p.total(), 100);
    }

    #[test]
    fn test_remainder_goes_to_leading_workers() {
        let p = partition(10, 4).unwrap();
        assert_eq!(p.chunks(), &[3, 3, 2, 2]);
    }

    #[test]
    fn test_more_workers_than_samples() {
        let p = partition(2, 5).unwrap();
        assert_eq!(p.chunks(), &[1, 1, 0, 0, 0]);
        assert_eq!(p.chunks().len(), 5);
    }

    #[test]
    fn test_single_worker_gets_everything() {
        let p = partition(100_000_000, 1).unwrap();
        assert_eq!(p.chunks(), &[100_000_000]);
    }

    #[test]
    fn test_zero_workers_rejected() {
        assert_eq!(partition(10, 0), Err(ConfigError::ZeroWorkers(0)));
    }

    proptest! {
        #[test]
        fn prop_chunks_sum_to_total(total in 0u64..10_000_000, workers in 1usize..256) {
            let p = partition(total, workers).unwrap();
            prop_assert_eq!(p.chunks().len(), workers);
            prop_assert_eq!(p.chunks().iter().sum::<u64>(), total);
        }

        #[test]
        fn prop_chunks_differ_by_at_most_one(total in 0u64..1_000_000, workers in 1usize..128) {
            let p = partition(total, workers).unwrap();
            let max = p.chunks().iter().max().copied().unwrap_or(0);
            let min = p.chunks().iter().min().copied().unwrap_or(0);
            prop_assert!(max - min <= 1);
        }
    }
}
