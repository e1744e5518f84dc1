//! Controller configuration
//!
//! Immutable parameters set once at startup. Defaults come from
//! [`crate::constants`]; every struct can be partially overridden from a
//! config file (missing fields keep their default) and must pass
//! [`ControllerConfig::validate`] before a loop is built from it.

use crate::constants::{sensors, thermal, time};
use crate::errors::ConfigError;

fn invalid(name: &'static str, reason: &'static str) -> ConfigError {
    ConfigError::InvalidParameter { name, reason }
}

fn finite(name: &'static str, value: f32) -> Result<f32, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(invalid(name, "must be a finite number"))
    }
}

/// First-order RC model parameters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ThermalModelParams {
    /// Thermal resistance R (°C/W), > 0
    pub resistance: f32,
    /// Thermal capacitance C (J/°C), > 0
    pub capacitance: f32,
    /// Ambient temperature (°C)
    pub ambient_temp: f32,
    /// Control interval / prediction step dt (s), > 0
    pub control_interval_s: f32,
}

impl Default for ThermalModelParams {
    fn default() -> Self {
        Self {
            resistance: thermal::THERMAL_RESISTANCE,
            capacitance: thermal::THERMAL_CAPACITANCE,
            ambient_temp: thermal::AMBIENT_TEMP_C,
            control_interval_s: thermal::CONTROL_INTERVAL_S,
        }
    }
}

impl ThermalModelParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(finite("resistance", self.resistance)? > 0.0) {
            return Err(invalid("resistance", "must be > 0"));
        }
        if !(finite("capacitance", self.capacitance)? > 0.0) {
            return Err(invalid("capacitance", "must be > 0"));
        }
        finite("ambient_temp", self.ambient_temp)?;
        if !(finite("control_interval_s", self.control_interval_s)? > 0.0) {
            return Err(invalid("control_interval_s", "must be > 0"));
        }
        Ok(())
    }
}

/// Power model parameters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PowerModelParams {
    /// Scaling constant α (W/GHz at full utilization), >= 0
    pub scaling_constant: f32,
}

impl Default for PowerModelParams {
    fn default() -> Self {
        Self { scaling_constant: thermal::POWER_SCALING_ALPHA }
    }
}

impl PowerModelParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if finite("scaling_constant", self.scaling_constant)? < 0.0 {
            return Err(invalid("scaling_constant", "must be >= 0"));
        }
        Ok(())
    }
}

/// Hysteresis band, critical level and actuator cooldown
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SafetyThresholds {
    /// Enable mitigation above this predicted temperature (°C)
    pub high_watermark: f32,
    /// Release mitigation below this predicted temperature (°C)
    pub low_watermark: f32,
    /// Report critical above this predicted temperature (°C)
    pub critical_watermark: f32,
    /// Minimum time between actuator writes (s), >= 0
    pub cooldown_s: f32,
}

impl Default for SafetyThresholds {
    fn default() -> Self {
        Self {
            high_watermark: thermal::HIGH_WATERMARK_C,
            low_watermark: thermal::LOW_WATERMARK_C,
            critical_watermark: thermal::CRITICAL_WATERMARK_C,
            cooldown_s: thermal::ACTION_COOLDOWN_S,
        }
    }
}

impl SafetyThresholds {
    /// Invariant: low < high < critical, cooldown >= 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        let low = finite("low_watermark", self.low_watermark)?;
        let high = finite("high_watermark", self.high_watermark)?;
        let critical = finite("critical_watermark", self.critical_watermark)?;

        if !(low < high) {
            return Err(invalid("low_watermark", "must be below high_watermark"));
        }
        if !(high < critical) {
            return Err(invalid("critical_watermark", "must be above high_watermark"));
        }
        if finite("cooldown_s", self.cooldown_s)? < 0.0 {
            return Err(invalid("cooldown_s", "must be >= 0"));
        }
        Ok(())
    }

    /// Cooldown in whole milliseconds
    pub fn cooldown_ms(&self) -> u64 {
        crate::time::seconds_to_ms(self.cooldown_s)
    }
}

/// How mitigation is applied and released
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MitigationPolicy {
    /// Fraction of the original ceiling kept while mitigating, in (0, 1)
    pub reduction_factor: f64,
    /// Put the original ceiling back on clean shutdown
    pub restore_on_shutdown: bool,
}

impl Default for MitigationPolicy {
    fn default() -> Self {
        Self {
            reduction_factor: thermal::CEILING_REDUCTION_FACTOR,
            restore_on_shutdown: thermal::RESTORE_ON_SHUTDOWN,
        }
    }
}

impl MitigationPolicy {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let factor = self.reduction_factor;
        if !factor.is_finite() {
            return Err(invalid("reduction_factor", "must be a finite number"));
        }
        if !(factor > 0.0 && factor < 1.0) {
            return Err(invalid("reduction_factor", "must be strictly between 0 and 1"));
        }
        Ok(())
    }

    /// Ceiling to write while mitigating, truncated to whole kHz
    pub fn reduced_ceiling(&self, original_khz: u32) -> u32 {
        (f64::from(original_khz) * self.reduction_factor) as u32
    }
}

/// Plausible sensor ranges; readings outside are failed reads
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SensorLimits {
    /// Lowest believable temperature (°C)
    pub temp_min_c: f32,
    /// Highest believable temperature (°C)
    pub temp_max_c: f32,
    /// Lowest believable frequency (GHz)
    pub freq_min_ghz: f32,
    /// Highest believable frequency (GHz)
    pub freq_max_ghz: f32,
}

impl Default for SensorLimits {
    fn default() -> Self {
        Self {
            temp_min_c: sensors::TEMP_PLAUSIBLE_MIN_C,
            temp_max_c: sensors::TEMP_PLAUSIBLE_MAX_C,
            freq_min_ghz: sensors::FREQ_PLAUSIBLE_MIN_GHZ,
            freq_max_ghz: sensors::FREQ_PLAUSIBLE_MAX_GHZ,
        }
    }
}

impl SensorLimits {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(finite("temp_min_c", self.temp_min_c)? < finite("temp_max_c", self.temp_max_c)?) {
            return Err(invalid("temp_min_c", "must be below temp_max_c"));
        }
        let freq_min = finite("freq_min_ghz", self.freq_min_ghz)?;
        if freq_min < 0.0 {
            return Err(invalid("freq_min_ghz", "must be >= 0"));
        }
        if !(freq_min < finite("freq_max_ghz", self.freq_max_ghz)?) {
            return Err(invalid("freq_min_ghz", "must be below freq_max_ghz"));
        }
        Ok(())
    }
}

/// Everything a control loop needs, set once at startup
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ControllerConfig {
    /// RC predictor
    pub thermal: ThermalModelParams,
    pub power: PowerModelParams,
    pub thresholds: SafetyThresholds,
    pub policy: MitigationPolicy,
    pub sensors: SensorLimits,
    /// Budget for one sensor read (ms); slower reads count as failed
    pub io_timeout_ms: u64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            thermal: ThermalModelParams::default(),
            power: PowerModelParams::default(),
            thresholds: SafetyThresholds::default(),
            policy: MitigationPolicy::default(),
            sensors: SensorLimits::default(),
            io_timeout_ms: time::DEFAULT_IO_TIMEOUT_MS,
        }
    }
}

impl ControllerConfig {
    pub fn with_thermal(mut self, thermal: ThermalModelParams) -> Self {
        self.thermal = thermal;
        self
    }

    pub fn with_power(mut self, power: PowerModelParams) -> Self {
        self.power = power;
        self
    }

    pub fn with_thresholds(mut self, thresholds: SafetyThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_policy(mut self, policy: MitigationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_sensor_limits(mut self, sensors: SensorLimits) -> Self {
        self.sensors = sensors;
        self
    }

    pub fn with_cooldown_s(mut self, cooldown_s: f32) -> Self {
        self.thresholds.cooldown_s = cooldown_s;
        self
    }

    pub fn with_io_timeout_ms(mut self, io_timeout_ms: u64) -> Self {
        self.io_timeout_ms = io_timeout_ms;
        self
    }

    /// Check every section; the first violation wins
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.thermal.validate()?;
        self.power.validate()?;
        self.thresholds.validate()?;
        self.policy.validate()?;
        self.sensors.validate()?;
        if self.io_timeout_ms == 0 {
            return Err(invalid("io_timeout_ms", "must be > 0"));
        }
        Ok(())
    }

    /// Tick period in whole milliseconds (at least 1)
    pub fn interval_ms(&self) -> u64 {
        crate::time::seconds_to_ms(self.thermal.control_interval_s).max(1)
    }
}
