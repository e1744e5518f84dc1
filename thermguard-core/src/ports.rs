//! Host Capabilities the Controller Depends On
//!
//! The core never touches files or syscalls. Everything it reads or writes
//! goes through one of these traits, so production code can back them with
//! sysfs (see `thermguard-connectors`) and tests with in-memory fakes that
//! inject failures on demand.
//!
//! ## Units
//!
//! | Capability | Unit |
//! |------------|------|
//! | temperature | °C |
//! | current frequency | GHz |
//! | frequency ceiling | kHz (integer, as cpufreq exposes it) |
//! | utilization | fraction in [0, 1] |
//!
//! ## Example Fake
//!
//! ```rust
//! use thermguard_core::{ActuatorPort, ControlError, ControlResult};
//!
//! struct ReadOnlyCeiling(u32);
//!
//! impl ActuatorPort for ReadOnlyCeiling {
//!     fn read_ceiling_khz(&mut self) -> ControlResult<u32> {
//!         Ok(self.0)
//!     }
//!
//!     fn write_ceiling_khz(&mut self, ceiling_khz: u32) -> ControlResult<()> {
//!         Err(ControlError::ActuatorWriteFailed { ceiling_khz, reason: "read-only" })
//!     }
//! }
//! ```

use crate::constants::thermal::DEFAULT_UTILIZATION;
use crate::errors::ControlResult;

/// Supplies the two measurements the model needs; either may fail
pub trait SensorPort {
    /// Current package temperature in °C
    fn read_temperature_celsius(&mut self) -> ControlResult<f32>;

    /// Current CPU frequency in GHz
    fn read_frequency_ghz(&mut self) -> ControlResult<f32>;
}

/// Reads and writes the frequency ceiling; both may fail
pub trait ActuatorPort {
    /// Current ceiling in kHz
    fn read_ceiling_khz(&mut self) -> ControlResult<u32>;

    /// Replace the ceiling
    fn write_ceiling_khz(&mut self, ceiling_khz: u32) -> ControlResult<()>;
}

/// Estimates CPU utilization for the power model
///
/// Implementations should return a value in [0, 1]; the loop clamps
/// whatever comes back.
pub trait UtilizationSource {
    /// Utilization for the current tick
    fn estimate_utilization(&mut self) -> f32;
}

impl<S: SensorPort + ?Sized> SensorPort for &mut S {
    fn read_temperature_celsius(&mut self) -> ControlResult<f32> {
        (**self).read_temperature_celsius()
    }

    fn read_frequency_ghz(&mut self) -> ControlResult<f32> {
        (**self).read_frequency_ghz()
    }
}

impl<A: ActuatorPort + ?Sized> ActuatorPort for &mut A {
    fn read_ceiling_khz(&mut self) -> ControlResult<u32> {
        (**self).read_ceiling_khz()
    }

    fn write_ceiling_khz(&mut self, ceiling_khz: u32) -> ControlResult<()> {
        (**self).write_ceiling_khz(ceiling_khz)
    }
}

/// Any closure works as a utilization source, handy for scripted tests
impl<F: FnMut() -> f32> UtilizationSource for F {
    fn estimate_utilization(&mut self) -> f32 {
        self()
    }
}

/// Fixed utilization estimate
///
/// Default is [`DEFAULT_UTILIZATION`], used until a real estimator is wired in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantUtilization(pub f32);

impl Default for ConstantUtilization {
    fn default() -> Self {
        Self(DEFAULT_UTILIZATION)
    }
}

impl UtilizationSource for ConstantUtilization {
    fn estimate_utilization(&mut self) -> f32 {
        self.0
    }
}

/// One tick's raw reading; each channel fails independently
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Temperature in °C, or why it is missing
    pub temperature: ControlResult<f32>,
    /// Frequency in GHz, or why it is missing
    pub frequency: ControlResult<f32>,
}

impl Sample {
    /// Both values, or the first failure (temperature checked first)
    pub fn values(&self) -> ControlResult<(f32, f32)> {
        Ok((self.temperature?, self.frequency?))
    }
}
