//! Local Monte Carlo sampler.
//!
//! Each worker owns its own generator. Nothing here is shared between
//! threads; a worker builds its [`UniformPoints`] from a seed it was handed
//! and drops it when its chunk is done.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Golden-ratio increment used to spread worker seeds apart.
const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Source of 2D points in the unit square.
pub trait PointSource {
    fn next_point(&mut self) -> (f64, f64);
}

/// Points drawn uniformly from `[0, 1) x [0, 1)`.
#[derive(Debug)]
pub struct UniformPoints<R> {
    rng: R,
}

impl<R: Rng> UniformPoints<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl UniformPoints<StdRng> {
    /// Seeded generator for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Generator seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> PointSource for UniformPoints<R> {
    #[inline]
    fn next_point(&mut self) -> (f64, f64) {
        let x: f64 = self.rng.gen();
        let y: f64 = self.rng.gen();
        (x, y)
    }
}

/// Draws `n` points from `source` and counts those with `x² + y² <= 1`.
pub fn count_inside<P: PointSource + ?Sized>(source: &mut P, n: u64) -> u64 {
    let mut inside = 0;

    for _ in 0..n {
        let (x, y) = source.next_point();
        if x * x + y * y <= 1.0 {
            inside += 1;
        }
    }

    inside
}

/// Counts hits for `n` points from a fresh generator seeded with `seed`.
pub fn sample(n: u64, seed: u64) -> u64 {
    count_inside(&mut UniformPoints::seeded(seed), n)
}

/// How each worker's generator is seeded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SeedStrategy {
    /// Every worker seeds from OS entropy; runs are not reproducible.
    #[default]
    Entropy,
    /// Worker seeds are derived from a master seed and the worker index.
    Fixed(u64),
}

impl SeedStrategy {
    /// Builds the point source for worker `index`.
    pub fn points_for(&self, index: usize) -> UniformPoints<StdRng> {
        match self {
            Self::Entropy => UniformPoints::from_entropy(),
            Self::Fixed(master) => UniformPoints::seeded(worker_seed(*master, index)),
        }
    }
}

/// Seed for worker `index` under master seed `master`.
///
/// Consecutive indices map to well-separated seeds; `StdRng::seed_from_u64`
/// then expands each through its own mixing step.
pub fn worker_seed(master: u64, index: usize) -> u64 {
    master.wrapping_add((index as u64).wrapping_add(1).wrapping_mul(SEED_STRIDE))
}
