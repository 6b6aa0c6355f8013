//! Orchestrates one estimation run.
//!
//! partition -> execute -> reduce, timed, with the temperature read on either
//! side of the run and the outcome appended to the result log. Only the
//! estimation pipeline can fail the run; sensor and log problems are
//! downgraded to warnings.

use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::config::RunConfig;
use crate::error::Result;
use crate::executor::{sampling_worker, Executor, WorkerFn};
use crate::partition::{partition, Partition};
use crate::reduce::{reduce, AggregateResult};
use crate::result_log::{ResultSink, RunRecord};
use crate::sensor::{read_or_placeholder, TemperatureSensor};

/// Outcome of a successful run.
#[derive(Clone, Debug)]
pub struct RunReport {
    pub aggregate: AggregateResult,
    pub partition: Partition,
    pub elapsed: Duration,
    pub temperature_before: String,
    pub temperature_after: String,
    /// Set when the result could not be appended to the log.
    pub log_warning: Option<String>,
}

impl RunReport {
    pub fn estimate(&self) -> f64 {
        self.aggregate.estimate()
    }
}

pub struct RunDriver {
    config: RunConfig,
    sensor: Box<dyn TemperatureSensor>,
    sink: Box<dyn ResultSink>,
}

impl RunDriver {
    pub fn new(
        config: RunConfig,
        sensor: Box<dyn TemperatureSensor>,
        sink: Box<dyn ResultSink>,
    ) -> Self {
        Self {
            config,
            sensor,
            sink,
        }
    }

    /// Runs the estimation with the seeded local sampler in every worker.
    pub fn run(&self) -> Result<RunReport> {
        self.run_with(sampling_worker(self.config.seed()))
    }

    /// Runs the estimation with `worker` computing each chunk.
    pub fn run_with(&self, worker: WorkerFn) -> Result<RunReport> {
        self.config.validate()?;

        let temperature_before = read_or_placeholder(self.sensor.as_ref());

        let workers = self.config.effective_workers();
        let partition = partition(self.config.total_samples(), workers)?;
        info!(
            samples = self.config.total_samples(),
            workers,
            backend = %self.config.backend(),
            "starting estimation"
        );

        let start = Instant::now();
        let partials = Executor::new(self.config.backend()).run(partition.chunks(), worker)?;
        let aggregate = reduce(&partials, partition.total())?;
        let elapsed = start.elapsed();

        info!(
            estimate = aggregate.estimate(),
            inside = aggregate.inside(),
            elapsed_secs = elapsed.as_secs_f64(),
            "estimation complete"
        );

        let temperature_after = read_or_placeholder(self.sensor.as_ref());

        let record = RunRecord {
            sample_count: aggregate.sampled(),
            execution_time: elapsed,
            temperature: temperature_before.clone(),
            pi_estimate: aggregate.estimate(),
        };
        let log_warning = match self.sink.append_record(&record) {
            Ok(()) => None,
            Err(e) => {
                warn!(error = %e, "result not recorded");
                Some(e.to_string())
            }
        };

        Ok(RunReport {
            aggregate,
            partition,
            elapsed,
            temperature_before,
            temperature_after,
            log_warning,
        })
    }
}
