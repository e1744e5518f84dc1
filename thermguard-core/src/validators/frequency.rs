//! Frequency reading validator

use crate::{
    config::SensorLimits,
    constants::sensors::{FREQ_PLAUSIBLE_MAX_GHZ, FREQ_PLAUSIBLE_MIN_GHZ},
    errors::{ControlError, ControlResult},
};

use super::{utils, Validator, ValidatorConstraints};

/// Validator for current CPU frequency in GHz
#[derive(Debug, Clone)]
pub struct FrequencyValidator {
    min_ghz: f32,
    max_ghz: f32,
}

impl Default for FrequencyValidator {
    fn default() -> Self {
        Self {
            min_ghz: FREQ_PLAUSIBLE_MIN_GHZ,
            max_ghz: FREQ_PLAUSIBLE_MAX_GHZ,
        }
    }
}

impl FrequencyValidator {
    pub fn from_limits(limits: &SensorLimits) -> Self {
        Self {
            // Frequency is never negative whatever the config says
            min_ghz: limits.freq_min_ghz.max(0.0),
            max_ghz: limits.freq_max_ghz,
        }
    }
}

impl Validator for FrequencyValidator {
    fn validate(&self, value: f32) -> ControlResult<f32> {
        utils::check_range(value, self.min_ghz, self.max_ghz).map_err(ControlError::frequency)
    }

    fn constraints(&self) -> ValidatorConstraints {
        ValidatorConstraints {
            min_value: self.min_ghz,
            max_value: self.max_ghz,
        }
    }
}
