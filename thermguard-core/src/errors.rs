//! Error Types for the Control Loop
//!
//! ## Design Philosophy
//!
//! Every error here is recovered locally by the control loop. None of them
//! aborts the process, so they are built to be cheap to return every tick,
//! store in a status report and compare in tests:
//!
//! 1. **Small Size**: no heap data, only `&'static str` reasons.
//! 2. **Copy Semantics**: errors travel by value into reports.
//! 3. **Actionable Information**: each variant says which side of the loop
//!    failed (sensor or actuator) and what the loop did about it.
//!
//! ## Error Categories
//!
//! ### Sensor Side
//! - `SensorUnavailable`: temperature or frequency could not be read, was not
//!   plausible, or took longer than the I/O budget. Forces the fail-safe
//!   de-mitigation attempt and skips prediction for the tick.
//!
//! ### Actuator Side
//! - `ActuatorReadFailed`: the current ceiling could not be read (or was not
//!   positive) when starting mitigation. The enable is aborted.
//! - `ActuatorWriteFailed`: writing a ceiling failed. The transition does not
//!   complete, so the state stays where it was.
//!
//! ## Handling Strategy
//!
//! ```rust
//! use thermguard_core::{ControlError, SensorChannel};
//!
//! fn describe(err: ControlError) -> &'static str {
//!     match err {
//!         ControlError::SensorUnavailable { channel: SensorChannel::Temperature, .. } => {
//!             "no temperature; falling back to un-throttled"
//!         }
//!         ControlError::SensorUnavailable { .. } => "no frequency; falling back to un-throttled",
//!         ControlError::ActuatorReadFailed { .. } => "enable aborted",
//!         ControlError::ActuatorWriteFailed { .. } => "transition retried on a later tick",
//!     }
//! }
//! ```

use core::fmt;

use thiserror_no_std::Error;

/// Result type for control operations
pub type ControlResult<T> = Result<T, ControlError>;

/// Which sensor channel a failure refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SensorChannel {
    /// Die / zone temperature in °C
    Temperature,
    /// Current CPU frequency in GHz
    Frequency,
}

impl fmt::Display for SensorChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Temperature => f.write_str("temperature"),
            Self::Frequency => f.write_str("frequency"),
        }
    }
}

/// Control errors - all recoverable, all reported
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum ControlError {
    /// A sensor channel gave no usable reading this tick
    #[error("Sensor unavailable ({channel}): {reason}")]
    SensorUnavailable {
        /// Channel that failed
        channel: SensorChannel,
        /// Short cause
        reason: &'static str,
    },

    /// The frequency ceiling could not be read before mitigating
    #[error("Actuator read failed: {reason}")]
    ActuatorReadFailed {
        /// Short cause
        reason: &'static str,
    },

    /// Writing a frequency ceiling failed
    #[error("Actuator write of {ceiling_khz} kHz failed: {reason}")]
    ActuatorWriteFailed {
        /// Ceiling that was being written
        ceiling_khz: u32,
        /// Short cause
        reason: &'static str,
    },
}

impl ControlError {
    /// Sensor failure on the temperature channel
    pub fn temperature(reason: &'static str) -> Self {
        Self::SensorUnavailable { channel: SensorChannel::Temperature, reason }
    }

    /// Sensor failure on the frequency channel
    pub fn frequency(reason: &'static str) -> Self {
        Self::SensorUnavailable { channel: SensorChannel::Frequency, reason }
    }

    /// True for errors coming from the sensor side of the loop
    pub fn is_sensor(&self) -> bool {
        matches!(self, Self::SensorUnavailable { .. })
    }

    /// True for errors coming from the actuator side of the loop
    pub fn is_actuator(&self) -> bool {
        !self.is_sensor()
    }
}

/// Rejected configuration
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// A parameter violates its constraint
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Parameter name as it appears in config files
        name: &'static str,
        /// Constraint that was violated
        reason: &'static str,
    },
}
