//! Power estimate from utilization and frequency

use crate::config::PowerModelParams;

/// Instantaneous power model: `power = α · utilization · frequency_ghz`
///
/// Pure and infallible. Clamping utilization into [0, 1] is the caller's
/// job; out-of-range input is passed straight through the product.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerEstimator {
    alpha: f32,
}

impl PowerEstimator {
    pub fn new(params: PowerModelParams) -> Self {
        Self { alpha: params.scaling_constant }
    }

    /// Estimated power (W)
    pub fn estimate(&self, utilization: f32, frequency_ghz: f32) -> f32 {
        self.alpha * utilization * frequency_ghz
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }
}

impl Default for PowerEstimator {
    fn default() -> Self {
        Self::new(PowerModelParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_model_matches_reference_tick() {
        // α=5, util=0.7, 2 GHz
        let power = PowerEstimator::default().estimate(0.7, 2.0);
        assert!(libm::fabsf(power - 7.0) < 1e-5);
    }

    #[test]
    fn idle_or_stopped_core_draws_nothing() {
        let estimator = PowerEstimator::default();
        assert_eq!(estimator.estimate(0.0, 3.2), 0.0);
        assert_eq!(estimator.estimate(1.0, 0.0), 0.0);
    }

    #[test]
    fn out_of_range_utilization_not_clamped_here() {
        let estimator = PowerEstimator::new(PowerModelParams { scaling_constant: 1.0 });
        assert_eq!(estimator.estimate(2.0, 1.0), 2.0);
    }
}
