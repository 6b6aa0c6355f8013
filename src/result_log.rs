//! Append-only log of run results.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::LogWriteError;

/// Default result log file, relative to the working directory.
pub const DEFAULT_LOG_FILE: &str = "execution_times.txt";

/// One line in the result log.
#[derive(Clone, Debug, PartialEq)]
pub struct RunRecord {
    pub sample_count: u64,
    pub execution_time: Duration,
    pub temperature: String,
    pub pi_estimate: f64,
}

impl fmt::Display for RunRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Num Samples: {}, Execution Time: {}, Temperature: {}, Pi Estimate: {}",
            self.sample_count,
            self.execution_time.as_secs_f64(),
            self.temperature,
            self.pi_estimate
        )
    }
}

/// Durable destination for run records.
pub trait ResultSink: Send + Sync {
    fn append_record(&self, record: &RunRecord) -> Result<(), LogWriteError>;
}

/// Appends one line per record to a text file, creating it if needed.
#[derive(Clone, Debug)]
pub struct FileResultLog {
    path: PathBuf,
}

impl FileResultLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileResultLog {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_FILE)
    }
}

impl ResultSink for FileResultLog {
    fn append_record(&self, record: &RunRecord) -> Result<(), LogWriteError> {
        let wrap = |source| LogWriteError {
            path: self.path.clone(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(wrap)?;

        writeln!(file, "{record}").map_err(wrap)
    }
}

/// Discards every record.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl ResultSink for NullSink {
    fn append_record(&self, _record: &RunRecord) -> Result<(), LogWriteError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn record(n: u64) -> RunRecord {
        RunRecord {
            sample_count: n,
            execution_time: Duration::from_millis(1500),
            temperature: "48.3°C".to_string(),
            pi_estimate: 3.0,
        }
    }

    #[test]
    fn test_record_format() {
        assert_eq!(
            record(4).to_string(),
            "Num Samples: 4, Execution Time: 1.5, Temperature: 48.3°C, Pi Estimate: 3"
        );
    }

    #[test]
    fn test_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let log = FileResultLog::new(dir.path().join("times.txt"));

        log.append_record(&record(10)).unwrap();
        log.append_record(&record(20)).unwrap();

        let contents = fs::read_to_string(log.path()).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Num Samples: 10,"));
        assert!(lines[1].starts_with("Num Samples: 20,"));
    }

    #[test]
    fn test_unwritable_path_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let log = FileResultLog::new(dir.path().join("no/such/dir/times.txt"));
        let err = log.append_record(&record(1)).unwrap_err();
        assert!(err.to_string().contains("times.txt"));
    }
}
