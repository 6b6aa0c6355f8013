//! Board temperature readings.
//!
//! Reading the temperature is best-effort. [`read_or_placeholder`] turns any
//! failure into a warning and the [`UNAVAILABLE`] marker so the estimation
//! itself is never held up by a missing sensor.

use std::fs;
use std::path::PathBuf;
use std::process::Command;

use tracing::warn;

use crate::error::SensorError;

/// Marker reported in place of a temperature when the sensor fails.
pub const UNAVAILABLE: &str = "unavailable";

/// Default Linux thermal zone for the SoC.
pub const DEFAULT_THERMAL_ZONE: &str = "/sys/class/thermal/thermal_zone0/temp";

const VCGENCMD: &str = "vcgencmd";

/// Something that can report a temperature as a display string.
pub trait TemperatureSensor: Send + Sync {
    fn read_temperature(&self) -> Result<String, SensorError>;
}

/// Raspberry Pi firmware sensor queried through `vcgencmd measure_temp`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Vcgencmd;

impl TemperatureSensor for Vcgencmd {
    fn read_temperature(&self) -> Result<String, SensorError> {
        let output = Command::new(VCGENCMD)
            .arg("measure_temp")
            .output()
            .map_err(|source| SensorError::Command {
                command: VCGENCMD,
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() {
            return Err(SensorError::Parse(stdout.into_owned()));
        }
        parse_vcgencmd(&stdout)
    }
}

/// Parses `temp=48.3'C` into `48.3°C`.
pub fn parse_vcgencmd(raw: &str) -> Result<String, SensorError> {
    let line = raw.lines().next().unwrap_or_default().trim();
    let value = line
        .strip_prefix("temp=")
        .and_then(|rest| rest.strip_suffix("'C"))
        .ok_or_else(|| SensorError::Parse(raw.to_string()))?;

    value
        .parse::<f64>()
        .map_err(|_| SensorError::Parse(raw.to_string()))?;

    Ok(format!("{value}°C"))
}

/// Linux sysfs thermal zone reporting millidegrees Celsius.
#[derive(Clone, Debug)]
pub struct ThermalZone {
    path: PathBuf,
}

impl ThermalZone {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for ThermalZone {
    fn default() -> Self {
        Self::new(DEFAULT_THERMAL_ZONE)
    }
}

impl TemperatureSensor for ThermalZone {
    fn read_temperature(&self) -> Result<String, SensorError> {
        let raw = fs::read_to_string(&self.path).map_err(|source| SensorError::Read {
            path: self.path.clone(),
            source,
        })?;
        parse_millidegrees(&raw)
    }
}

/// Parses `48312\n` into `48.3°C`.
pub fn parse_millidegrees(raw: &str) -> Result<String, SensorError> {
    let milli: i64 = raw
        .trim()
        .parse()
        .map_err(|_| SensorError::Parse(raw.to_string()))?;
    Ok(format!("{:.1}°C", milli as f64 / 1000.0))
}

/// No sensor at all; every read fails.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSensor;

impl TemperatureSensor for NoSensor {
    fn read_temperature(&self) -> Result<String, SensorError> {
        Err(SensorError::Unavailable)
    }
}

/// Reads the sensor, falling back to [`UNAVAILABLE`] with a warning.
pub fn read_or_placeholder(sensor: &dyn TemperatureSensor) -> String {
    match sensor.read_temperature() {
        Ok(temperature) => temperature,
        Err(e) => {
            warn!(error = %e, "temperature sensor unavailable");
            UNAVAILABLE.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_vcgencmd() {
        assert_eq!(parse_vcgencmd("temp=48.3'C\n").unwrap(), "48.3°C");
        assert_eq!(parse_vcgencmd("temp=61.0'C").unwrap(), "61.0°C");
    }

    #[test]
    fn test_parse_vcgencmd_rejects_garbage() {
        assert!(matches!(
            parse_vcgencmd("VCHI initialization failed"),
            Err(SensorError::Parse(_))
        ));
        assert!(parse_vcgencmd("temp=hot'C").is_err());
        assert!(parse_vcgencmd("").is_err());
    }

    #[test]
    fn test_parse_millidegrees() {
        assert_eq!(parse_millidegrees("48312\n").unwrap(), "48.3°C");
        assert_eq!(parse_millidegrees("-1500").unwrap(), "-1.5°C");
        assert!(parse_millidegrees("n/a").is_err());
    }

    #[test]
    fn test_thermal_zone_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "52000").unwrap();
        let sensor = ThermalZone::new(file.path());
        assert_eq!(sensor.read_temperature().unwrap(), "52.0°C");
    }

    #[test]
    fn test_missing_thermal_zone_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let sensor = ThermalZone::new(dir.path().join("missing"));
        assert!(matches!(
            sensor.read_temperature(),
            Err(SensorError::Read { .. })
        ));
        assert_eq!(read_or_placeholder(&sensor), UNAVAILABLE);
    }

    #[test]
    fn test_no_sensor_placeholder() {
        assert_eq!(read_or_placeholder(&NoSensor), UNAVAILABLE);
    }
}
