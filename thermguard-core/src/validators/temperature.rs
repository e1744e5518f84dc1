//! Temperature reading validator
//!
//! Rejects readings no running CPU package can produce. The lower bound also
//! catches thermal_zone drivers that signal "no reading" with a negative
//! millidegree value.

use crate::{
    config::SensorLimits,
    constants::sensors::{TEMP_PLAUSIBLE_MAX_C, TEMP_PLAUSIBLE_MIN_C},
    errors::{ControlError, ControlResult},
};

use super::{utils, Validator, ValidatorConstraints};

/// Validator for package temperature in Celsius
#[derive(Debug, Clone)]
pub struct TemperatureValidator {
    /// Minimum valid temperature in Celsius
    min_celsius: f32,

    /// Maximum valid temperature in Celsius
    max_celsius: f32,
}

impl Default for TemperatureValidator {
    fn default() -> Self {
        Self {
            min_celsius: TEMP_PLAUSIBLE_MIN_C,
            max_celsius: TEMP_PLAUSIBLE_MAX_C,
        }
    }
}

impl TemperatureValidator {
    /// Create validator with custom limits
    pub fn new_with_limits(min: f32, max: f32) -> Self {
        // Sanity check: can't have min > max
        let (min, max) = if min > max { (max, min) } else { (min, max) };

        Self {
            min_celsius: min.max(-273.15), // Can't go below absolute zero
            max_celsius: max,
        }
    }

    pub fn from_limits(limits: &SensorLimits) -> Self {
        Self::new_with_limits(limits.temp_min_c, limits.temp_max_c)
    }
}

impl Validator for TemperatureValidator {
    fn validate(&self, value: f32) -> ControlResult<f32> {
        utils::check_range(value, self.min_celsius, self.max_celsius)
            .map_err(ControlError::temperature)
    }

    fn constraints(&self) -> ValidatorConstraints {
        ValidatorConstraints {
            min_value: self.min_celsius,
            max_value: self.max_celsius,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SensorChannel;

    #[test]
    fn valid_temperature() {
        let validator = TemperatureValidator::default();
        assert_eq!(validator.validate(62.5), Ok(62.5));
    }

    #[test]
    fn negative_driver_sentinel_rejected() {
        let validator = TemperatureValidator::default();

        // thermal_zone read of -1 millidegree after a driver error
        let result = validator.validate(-0.001);
        assert_eq!(
            result,
            Err(ControlError::SensorUnavailable {
                channel: SensorChannel::Temperature,
                reason: "reading below plausible range",
            })
        );
        assert!(validator.validate(-40.0).is_err());
    }

    #[test]
    fn zero_celsius_is_a_reading() {
        assert_eq!(TemperatureValidator::default().validate(0.0), Ok(0.0));
    }

    #[test]
    fn swapped_limits_are_reordered() {
        let validator = TemperatureValidator::new_with_limits(120.0, -500.0);
        let constraints = validator.constraints();
        assert_eq!(constraints.min_value, -273.15);
        assert_eq!(constraints.max_value, 120.0);
    }
}
