//! Reading Plausibility Checks
//!
//! A sensor port can hand back a number that is not a measurement: kernel
//! drivers report "no reading" as a negative value, hotplugged cores report
//! zero or garbage, and a parse of a half-written file can yield anything.
//! The loop runs each raw reading through a validator before it reaches the
//! model. A rejected reading is a failed read, so it takes the fail-safe
//! path exactly like an unreadable file.
//!
//! ## Validation Layers
//!
//! 1. **Numeric**: NaN and infinities are rejected outright.
//! 2. **Range**: the value must sit inside the plausible physical range for
//!    its channel (see [`crate::constants::sensors`]).

use crate::errors::ControlResult;

pub mod frequency;
pub mod temperature;
pub mod utils;

pub use frequency::FrequencyValidator;
pub use temperature::TemperatureValidator;

/// Range a validator accepts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatorConstraints {
    /// Minimum valid value
    pub min_value: f32,
    /// Maximum valid value
    pub max_value: f32,
}

/// Plausibility check for one sensor channel
pub trait Validator {
    /// Return the reading unchanged if it is believable
    fn validate(&self, value: f32) -> ControlResult<f32>;

    /// Range this validator accepts
    fn constraints(&self) -> ValidatorConstraints;
}
