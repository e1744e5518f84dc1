//! Linux sysfs connectors
//!
//! Thermal zones report millidegrees Celsius, cpufreq reports kHz; both as
//! a single decimal integer followed by a newline. Reads go straight to the
//! file each time, there is no caching.
//!
//! Writing `scaling_max_freq` needs root (or a udev rule granting write
//! access). A denied write surfaces as `ActuatorWriteFailed` and the
//! controller keeps running.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use thermguard_core::constants::sensors::{KHZ_PER_GHZ, MILLIDEGREES_PER_C};
use thermguard_core::{ActuatorPort, ControlError, ControlResult, SensorChannel, SensorPort};

use crate::{ConnectorError, ConnectorResult};

/// Default thermal zone directory
pub const DEFAULT_THERMAL_ZONE: &str = "/sys/class/thermal/thermal_zone0";
/// Default CPU directory
pub const DEFAULT_CPU: &str = "/sys/devices/system/cpu/cpu0";

/// The three files the connectors touch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SysfsPaths {
    /// Zone temperature (millidegrees C)
    pub temperature: PathBuf,
    /// Current CPU frequency (kHz)
    pub current_freq: PathBuf,
    /// Frequency ceiling (kHz), read and written
    pub max_freq: PathBuf,
}

impl SysfsPaths {
    /// Files under a thermal zone directory and a cpu directory
    ///
    /// `cpu` is the `cpuN` directory; the cpufreq files are looked up in
    /// its `cpufreq/` subdirectory.
    pub fn from_dirs(thermal_zone: impl AsRef<Path>, cpu: impl AsRef<Path>) -> Self {
        let cpufreq = cpu.as_ref().join("cpufreq");
        Self {
            temperature: thermal_zone.as_ref().join("temp"),
            current_freq: cpufreq.join("scaling_cur_freq"),
            max_freq: cpufreq.join("scaling_max_freq"),
        }
    }
}

impl Default for SysfsPaths {
    fn default() -> Self {
        Self::from_dirs(DEFAULT_THERMAL_ZONE, DEFAULT_CPU)
    }
}

/// Read a sysfs attribute holding one decimal integer
pub fn read_integer(path: &Path) -> ConnectorResult<i64> {
    let raw = fs::read_to_string(path).map_err(|err| ConnectorError::io(path, err))?;
    let trimmed = raw.trim();
    trimmed
        .parse::<i64>()
        .map_err(|_| ConnectorError::parse(path, format!("expected integer, got {:?}", trimmed)))
}

/// Write one decimal integer to a sysfs attribute
pub fn write_integer(path: &Path, value: i64) -> ConnectorResult<()> {
    fs::write(path, value.to_string()).map_err(|err| ConnectorError::io(path, err))
}

/// Temperature and frequency from sysfs
#[derive(Debug, Clone, Default)]
pub struct SysfsSensor {
    paths: SysfsPaths,
}

impl SysfsSensor {
    /// Sensor reading from `paths`
    pub fn new(paths: SysfsPaths) -> Self {
        Self { paths }
    }

    /// Files in use
    pub fn paths(&self) -> &SysfsPaths {
        &self.paths
    }

    fn read_channel(&self, channel: SensorChannel, path: &Path) -> ControlResult<i64> {
        read_integer(path).map_err(|err| {
            warn!("{} sensor read failed: {}", channel, err);
            err.into_sensor_error(channel)
        })
    }
}

impl SensorPort for SysfsSensor {
    fn read_temperature_celsius(&mut self) -> ControlResult<f32> {
        let millidegrees = self.read_channel(SensorChannel::Temperature, &self.paths.temperature)?;
        Ok(millidegrees as f32 / MILLIDEGREES_PER_C)
    }

    fn read_frequency_ghz(&mut self) -> ControlResult<f32> {
        let khz = self.read_channel(SensorChannel::Frequency, &self.paths.current_freq)?;
        Ok(khz as f32 / KHZ_PER_GHZ)
    }
}

/// Frequency ceiling through cpufreq `scaling_max_freq`
#[derive(Debug, Clone)]
pub struct SysfsActuator {
    path: PathBuf,
}

impl SysfsActuator {
    /// Actuator on the ceiling file in `paths`
    pub fn new(paths: &SysfsPaths) -> Self {
        Self { path: paths.max_freq.clone() }
    }

    /// Ceiling file in use
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for SysfsActuator {
    fn default() -> Self {
        Self::new(&SysfsPaths::default())
    }
}

impl ActuatorPort for SysfsActuator {
    fn read_ceiling_khz(&mut self) -> ControlResult<u32> {
        let khz = read_integer(&self.path).map_err(|err| {
            warn!("Ceiling read failed: {}", err);
            ControlError::ActuatorReadFailed { reason: err.reason() }
        })?;
        u32::try_from(khz).map_err(|_| {
            warn!("Ceiling {} kHz in {} is out of range", khz, self.path.display());
            ControlError::ActuatorReadFailed { reason: "ceiling out of range" }
        })
    }

    fn write_ceiling_khz(&mut self, ceiling_khz: u32) -> ControlResult<()> {
        write_integer(&self.path, i64::from(ceiling_khz)).map_err(|err| {
            warn!("Ceiling write failed: {}", err);
            ControlError::ActuatorWriteFailed { ceiling_khz, reason: err.reason() }
        })?;
        debug!("Wrote {} kHz to {}", ceiling_khz, self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fake_tree(temp: &str, cur: &str, max: &str) -> (TempDir, SysfsPaths) {
        let dir = TempDir::new().unwrap();
        let zone = dir.path().join("thermal_zone0");
        let cpu = dir.path().join("cpu0");
        fs::create_dir_all(&zone).unwrap();
        fs::create_dir_all(cpu.join("cpufreq")).unwrap();

        let paths = SysfsPaths::from_dirs(&zone, &cpu);
        fs::write(&paths.temperature, temp).unwrap();
        fs::write(&paths.current_freq, cur).unwrap();
        fs::write(&paths.max_freq, max).unwrap();
        (dir, paths)
    }

    #[test]
    fn default_paths_match_kernel_layout() {
        let paths = SysfsPaths::default();
        assert_eq!(paths.temperature, Path::new("/sys/class/thermal/thermal_zone0/temp"));
        assert_eq!(
            paths.current_freq,
            Path::new("/sys/devices/system/cpu/cpu0/cpufreq/scaling_cur_freq")
        );
        assert_eq!(
            paths.max_freq,
            Path::new("/sys/devices/system/cpu/cpu0/cpufreq/scaling_max_freq")
        );
    }

    #[test]
    fn sensor_converts_units() {
        let (_dir, paths) = fake_tree("76500\n", "2000000\n", "3000000\n");
        let mut sensor = SysfsSensor::new(paths);

        assert_eq!(sensor.read_temperature_celsius(), Ok(76.5));
        assert_eq!(sensor.read_frequency_ghz(), Ok(2.0));
    }

    #[test]
    fn missing_file_is_sensor_unavailable() {
        let (_dir, paths) = fake_tree("50000", "2000000", "3000000");
        fs::remove_file(&paths.temperature).unwrap();
        let mut sensor = SysfsSensor::new(paths);

        assert_eq!(
            sensor.read_temperature_celsius(),
            Err(ControlError::SensorUnavailable {
                channel: SensorChannel::Temperature,
                reason: "file not found",
            })
        );
        assert_eq!(sensor.read_frequency_ghz(), Ok(2.0));
    }

    #[test]
    fn garbage_is_unparseable() {
        let (_dir, paths) = fake_tree("50000", "n/a", "3000000");
        let mut sensor = SysfsSensor::new(paths);

        assert_eq!(
            sensor.read_frequency_ghz(),
            Err(ControlError::frequency("unparseable value"))
        );
    }

    #[test]
    fn actuator_reads_and_writes_ceiling() {
        let (_dir, paths) = fake_tree("50000", "2000000", "3000000\n");
        let mut actuator = SysfsActuator::new(&paths);

        assert_eq!(actuator.read_ceiling_khz(), Ok(3_000_000));
        actuator.write_ceiling_khz(2_100_000).unwrap();
        assert_eq!(fs::read_to_string(&paths.max_freq).unwrap(), "2100000");
        assert_eq!(actuator.read_ceiling_khz(), Ok(2_100_000));
    }

    #[test]
    fn negative_ceiling_is_read_failure() {
        let (_dir, paths) = fake_tree("50000", "2000000", "-1");
        let mut actuator = SysfsActuator::new(&paths);

        assert_eq!(
            actuator.read_ceiling_khz(),
            Err(ControlError::ActuatorReadFailed { reason: "ceiling out of range" })
        );
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let paths = SysfsPaths::from_dirs(dir.path().join("zone"), dir.path().join("nocpu"));
        let mut actuator = SysfsActuator::new(&paths);

        assert_eq!(
            actuator.write_ceiling_khz(2_100_000),
            Err(ControlError::ActuatorWriteFailed {
                ceiling_khz: 2_100_000,
                reason: "file not found",
            })
        );
    }
}
