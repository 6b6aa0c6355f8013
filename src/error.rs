//! Error types for the estimation engine.
//!
//! Fatal errors ([`EstimateError`]) abort a run before any estimate is
//! reported. The collaborator errors ([`SensorError`], [`LogWriteError`]) are
//! best-effort: the driver downgrades them to warnings.

use std::path::PathBuf;
use thiserror::Error;

/// Invalid run inputs, reported before any work starts.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid sample count {0}: must be at least 1")]
    ZeroSamples(u64),

    #[error("Invalid worker count {0}: must be at least 1")]
    ZeroWorkers(usize),
}

/// Fatal failure of an estimation run.
#[derive(Debug, Error)]
pub enum EstimateError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("worker {worker} failed: {reason}")]
    WorkerFailure { worker: usize, reason: String },

    #[error("cannot estimate from an empty sample")]
    EmptySample,

    #[error("hit count overflowed while reducing partial results")]
    Overflow,

    #[error("{inside} hits reported for only {sampled} samples")]
    InconsistentPartials { inside: u64, sampled: u64 },

    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("tokio backend needs a multi-thread runtime when called from async context")]
    CurrentThreadRuntime,
}

impl EstimateError {
    /// Returns true if the error came from a worker rather than the inputs.
    pub fn is_worker_failure(&self) -> bool {
        matches!(self, Self::WorkerFailure { .. })
    }
}

/// Temperature sensor could not be read.
#[derive(Debug, Error)]
pub enum SensorError {
    #[error("no temperature sensor configured")]
    Unavailable,

    #[error("failed to run `{command}`: {source}")]
    Command {
        command: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unrecognised sensor output: {0:?}")]
    Parse(String),
}

/// The result log could not be appended to.
#[derive(Debug, Error)]
#[error("failed to append to result log {path}: {source}")]
pub struct LogWriteError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

pub type Result<T, E = EstimateError> = std::result::Result<T, E>;
