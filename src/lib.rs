//! Parallel Monte Carlo estimation of π.
//!
//! Points are drawn uniformly in the unit square and the fraction landing in
//! the inscribed quarter circle approaches π / 4. The sample budget is split
//! across a fixed set of workers, each with a private random generator, and
//! their hit counts are summed once every worker has finished.
//!
//! ```rust
//! use pi_estimator::{partition, reduce, sampler};
//!
//! let split = partition::partition(10_000, 4).unwrap();
//! let partials: Vec<u64> = split
//!     .chunks()
//!     .iter()
//!     .enumerate()
//!     .map(|(i, &n)| sampler::sample(n, sampler::worker_seed(7, i)))
//!     .collect();
//! let result = reduce::reduce(&partials, split.total()).unwrap();
//! assert!((result.estimate() - std::f64::consts::PI).abs() < 0.2);
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod executor;
pub mod partition;
pub mod reduce;
pub mod result_log;
pub mod sampler;
pub mod sensor;

pub use config::RunConfig;
pub use driver::{RunDriver, RunReport};
pub use error::{ConfigError, EstimateError, LogWriteError, SensorError};
pub use executor::{Backend, Executor, WorkerFn, WorkerTask};
pub use reduce::AggregateResult;
pub use sampler::SeedStrategy;
