//! Run configuration.
//!
//! Immutable once built. Use [`RunConfig::builder`] to construct instances;
//! validation happens at build time so a bad configuration is rejected
//! before any worker is spawned.

use std::num::NonZeroUsize;
use std::thread;

use crate::error::ConfigError;
use crate::executor::Backend;
use crate::sampler::SeedStrategy;

/// Sample count used when none is given.
pub const DEFAULT_SAMPLES: u64 = 100_000_000;

/// Parameters of one estimation run.
///
/// # Examples
///
/// ```rust
/// use pi_estimator::config::RunConfig;
///
/// let config = RunConfig::builder()
///     .total_samples(1_000_000)
///     .workers(4)
///     .seed(42)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.workers(), 4);
/// ```
#[derive(Clone, Debug)]
pub struct RunConfig {
    total_samples: u64,
    workers: usize,
    seed: SeedStrategy,
    backend: Backend,
}

impl RunConfig {
    #[inline]
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder::default()
    }

    /// Global number of points to draw.
    #[inline]
    pub fn total_samples(&self) -> u64 {
        self.total_samples
    }

    /// Requested number of workers.
    #[inline]
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Workers actually spawned; never more than there are samples.
    #[inline]
    pub fn effective_workers(&self) -> usize {
        let cap = usize::try_from(self.total_samples).unwrap_or(usize::MAX);
        self.workers.min(cap).max(1)
    }

    #[inline]
    pub fn seed(&self) -> SeedStrategy {
        self.seed
    }

    #[inline]
    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the sample count or worker count is 0.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total_samples == 0 {
            return Err(ConfigError::ZeroSamples(self.total_samples));
        }
        if self.workers == 0 {
            return Err(ConfigError::ZeroWorkers(self.workers));
        }
        Ok(())
    }
}

/// Worker count used when none is given: the machine's available parallelism.
pub fn default_workers() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Builder for [`RunConfig`].
#[derive(Clone, Debug, Default)]
pub struct RunConfigBuilder {
    total_samples: Option<u64>,
    workers: Option<usize>,
    seed: SeedStrategy,
    backend: Backend,
}

impl RunConfigBuilder {
    #[inline]
    pub fn total_samples(mut self, total_samples: u64) -> Self {
        self.total_samples = Some(total_samples);
        self
    }

    #[inline]
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Derives every worker's seed from `seed`, making the run reproducible.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = SeedStrategy::Fixed(seed);
        self
    }

    #[inline]
    pub fn backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Builds the configuration, filling unset fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the resulting configuration is invalid.
    pub fn build(self) -> Result<RunConfig, ConfigError> {
        let config = RunConfig {
            total_samples: self.total_samples.unwrap_or(DEFAULT_SAMPLES),
            workers: self.workers.unwrap_or_else(default_workers),
            seed: self.seed,
            backend: self.backend,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = RunConfig::builder().build().unwrap();
        assert_eq!(config.total_samples(), DEFAULT_SAMPLES);
        assert_eq!(config.workers(), default_workers());
        assert_eq!(config.seed(), SeedStrategy::Entropy);
        assert_eq!(config.backend(), Backend::Threads);
    }

    #[test]
    fn test_builder_with_seed_and_backend() {
        let config = RunConfig::builder()
            .total_samples(1000)
            .workers(3)
            .seed(42)
            .backend(Backend::Tokio)
            .build()
            .unwrap();

        assert_eq!(config.seed(), SeedStrategy::Fixed(42));
        assert_eq!(config.backend(), Backend::Tokio);
    }

    #[test]
    fn test_zero_samples_rejected() {
        let result = RunConfig::builder().total_samples(0).workers(4).build();
        assert!(matches!(result, Err(ConfigError::ZeroSamples(0))));
    }

    #[test]
    fn test_zero_workers_rejected() {
        let result = RunConfig::builder().total_samples(10).workers(0).build();
        assert!(matches!(result, Err(ConfigError::ZeroWorkers(0))));
    }

    #[test]
    fn test_effective_workers_clamped_to_samples() {
        let config = RunConfig::builder()
            .total_samples(3)
            .workers(8)
            .build()
            .unwrap();
        assert_eq!(config.effective_workers(), 3);

        let config = RunConfig::builder()
            .total_samples(1_000)
            .workers(8)
            .build()
            .unwrap();
        assert_eq!(config.effective_workers(), 8);
    }
}
