//! Command line entry point: estimate π across all cores and log the run.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pi_estimator::config::{default_workers, DEFAULT_SAMPLES};
use pi_estimator::result_log::{FileResultLog, NullSink, ResultSink, DEFAULT_LOG_FILE};
use pi_estimator::sensor::{NoSensor, TemperatureSensor, ThermalZone, Vcgencmd};
use pi_estimator::{Backend, RunConfig, RunDriver, RunReport};

/// Monte Carlo estimation of π on a fixed pool of workers
#[derive(Parser, Debug)]
#[command(name = "pi-estimator")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Total number of points to sample
    #[arg(short = 'n', long, env = "PI_SAMPLES", default_value_t = DEFAULT_SAMPLES)]
    samples: u64,

    /// Number of parallel workers (defaults to available parallelism)
    #[arg(short, long, env = "PI_WORKERS")]
    workers: Option<usize>,

    /// Master seed; makes the run reproducible
    #[arg(long, env = "PI_SEED")]
    seed: Option<u64>,

    /// Concurrency backend: threads or tokio
    #[arg(short, long, default_value_t = Backend::Threads, value_parser = str::parse::<Backend>)]
    backend: Backend,

    /// Temperature source
    #[arg(long, value_enum, default_value_t = SensorArg::Vcgencmd)]
    sensor: SensorArg,

    /// File the run result is appended to
    #[arg(long, env = "PI_LOG_FILE", default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    /// Do not append the result to the log file
    #[arg(long)]
    no_log: bool,

    /// Enable debug output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SensorArg {
    Vcgencmd,
    ThermalZone,
    #[value(name = "none")]
    Off,
}

impl SensorArg {
    fn build(self) -> Box<dyn TemperatureSensor> {
        match self {
            SensorArg::Vcgencmd => Box::new(Vcgencmd),
            SensorArg::ThermalZone => Box::new(ThermalZone::default()),
            SensorArg::Off => Box::new(NoSensor),
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<RunReport> {
    let mut builder = RunConfig::builder()
        .total_samples(cli.samples)
        .workers(cli.workers.unwrap_or_else(default_workers))
        .backend(cli.backend);
    if let Some(seed) = cli.seed {
        builder = builder.seed(seed);
    }
    let config = builder.build().context("invalid configuration")?;

    let sink: Box<dyn ResultSink> = if cli.no_log {
        Box::new(NullSink)
    } else {
        Box::new(FileResultLog::new(cli.log_file))
    };

    let driver = RunDriver::new(config, cli.sensor.build(), sink);
    driver.run().context("estimation failed")
}

fn print_report(report: &RunReport) {
    let aggregate = &report.aggregate;

    println!("Temperature before run: {}", report.temperature_before);
    println!("Total samples: {}", aggregate.sampled());
    println!("Points inside circle: {}", aggregate.inside());
    println!("Estimated Pi: {}", aggregate.estimate());
    println!(
        "Error: {:.6} (standard error {:.6})",
        aggregate.abs_error(),
        aggregate.standard_error()
    );
    println!("Execution time: {} seconds", report.elapsed.as_secs_f64());
    println!("Temperature after run: {}", report.temperature_after);
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(report) => {
            print_report(&report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
