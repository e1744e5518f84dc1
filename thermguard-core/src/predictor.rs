//! First-order RC thermal prediction
//!
//! ## Model
//!
//! The package is one thermal mass `C` connected to ambient through one
//! resistance `R`. Over a step `dt` with power `P` flowing in:
//!
//! ```text
//! T(t+dt) = T + (dt / C) · (P − (T − T_amb) / R)
//! ```
//!
//! A single-pole lag is crude next to a real multi-node package model, but
//! the one-step lookahead is closed-form, O(1), and stable for
//! `dt < R·C`, which is what a fixed-interval control loop needs.
//!
//! ## Numerics
//!
//! Plain `f32`, no special cases. NaN and infinities propagate; the
//! controller treats a non-finite prediction as "prediction unavailable".

use crate::config::ThermalModelParams;

/// One-step temperature predictor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermalPredictor {
    params: ThermalModelParams,
}

impl ThermalPredictor {
    pub fn new(params: ThermalModelParams) -> Self {
        Self { params }
    }

    /// Predicted temperature one control interval ahead (°C)
    pub fn predict(&self, current_temp: f32, power: f32) -> f32 {
        predict_temperature(current_temp, power, &self.params)
    }

    /// Temperature the model settles at under constant power (°C)
    pub fn steady_state(&self, power: f32) -> f32 {
        self.params.ambient_temp + power * self.params.resistance
    }

    /// Time constant τ = R·C (seconds)
    pub fn time_constant(&self) -> f32 {
        self.params.resistance * self.params.capacitance
    }

    pub fn params(&self) -> &ThermalModelParams {
        &self.params
    }
}

impl Default for ThermalPredictor {
    fn default() -> Self {
        Self::new(ThermalModelParams::default())
    }
}

/// Discrete RC recurrence, free-function form
pub fn predict_temperature(current_temp: f32, power: f32, params: &ThermalModelParams) -> f32 {
    let ThermalModelParams { resistance, capacitance, ambient_temp, control_interval_s } = *params;
    current_temp
        + (control_interval_s / capacitance) * (power - (current_temp - ambient_temp) / resistance)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        libm::fabsf(a - b) < 1e-4
    }

    #[test]
    fn equilibrium_at_ambient_without_power() {
        let predictor = ThermalPredictor::default();
        assert_eq!(predictor.predict(30.0, 0.0), 30.0);
    }

    #[test]
    fn reference_tick_at_70c() {
        // 70 + 0.1 · (7 − 40) = 66.7
        let predictor = ThermalPredictor::default();
        assert!(close(predictor.predict(70.0, 7.0), 66.7));
    }

    #[test]
    fn reference_tick_at_76c() {
        // 76 + 0.1 · (7 − 46) = 72.1
        let predictor = ThermalPredictor::default();
        assert!(close(predictor.predict(76.0, 7.0), 72.1));
    }

    #[test]
    fn steady_state_is_a_fixed_point() {
        let predictor = ThermalPredictor::default();
        let settled = predictor.steady_state(12.0);
        assert!(close(settled, 42.0));
        assert!(close(predictor.predict(settled, 12.0), settled));
    }

    #[test]
    fn time_constant_is_rc() {
        assert_eq!(ThermalPredictor::default().time_constant(), 10.0);
    }

    #[test]
    fn nan_propagates() {
        let predictor = ThermalPredictor::default();
        assert!(predictor.predict(f32::NAN, 7.0).is_nan());
        assert!(predictor.predict(50.0, f32::NAN).is_nan());
    }
}
