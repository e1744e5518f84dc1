//! Core control engine for ThermGuard
//!
//! Keeps a CPU inside a thermal safety band by predicting temperature one
//! control interval ahead and capping the frequency ceiling when needed.
//! Never touches scheduling policy and never kills anything; the only knob
//! is the externally exposed frequency ceiling.
//!
//! Per tick:
//! - sensor port -> (temperature, frequency)
//! - power estimate from utilization and frequency
//! - first-order RC prediction of the next-interval temperature
//! - hysteresis + cooldown state machine decides enable/disable of the cap
//!
//! ```no_run
//! use thermguard_core::{ControlLoop, ControllerConfig, ConstantUtilization};
//! use thermguard_core::time::MonotonicClock;
//! # use thermguard_core::{SensorPort, ActuatorPort, ControlResult};
//! # struct Sensor; struct Actuator;
//! # impl SensorPort for Sensor {
//! #     fn read_temperature_celsius(&mut self) -> ControlResult<f32> { Ok(50.0) }
//! #     fn read_frequency_ghz(&mut self) -> ControlResult<f32> { Ok(2.0) }
//! # }
//! # impl ActuatorPort for Actuator {
//! #     fn read_ceiling_khz(&mut self) -> ControlResult<u32> { Ok(3_000_000) }
//! #     fn write_ceiling_khz(&mut self, _: u32) -> ControlResult<()> { Ok(()) }
//! # }
//!
//! let mut control = ControlLoop::new(
//!     ControllerConfig::default(),
//!     Sensor,
//!     Actuator,
//!     ConstantUtilization::default(),
//!     MonotonicClock::new(),
//! )
//! .expect("default config is valid");
//!
//! let report = control.tick();
//! println!("{}", report);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod macros;

pub mod config;
pub mod constants;
pub mod control_loop;
pub mod controller;
pub mod errors;
pub mod ports;
pub mod power;
pub mod predictor;
pub mod report;
pub mod time;
pub mod validators;

// Public API
pub use config::{
    ControllerConfig, MitigationPolicy, PowerModelParams, SafetyThresholds, SensorLimits,
    ThermalModelParams,
};
pub use control_loop::{ControlLoop, ControlStats};
pub use controller::{HoldReason, MitigationController, MitigationPhase, MitigationState, TransitionOutcome};
pub use errors::{ConfigError, ControlError, ControlResult, SensorChannel};
pub use ports::{ActuatorPort, ConstantUtilization, Sample, SensorPort, UtilizationSource};
pub use power::PowerEstimator;
pub use predictor::ThermalPredictor;
pub use report::StatusReport;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
