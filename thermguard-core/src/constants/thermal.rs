//! Thermal Model and Mitigation Defaults
//!
//! Defaults for a single-zone, single-pole RC model of a laptop/desktop CPU
//! package, plus the hysteresis band that drives mitigation.

// ===== RC MODEL =====

/// Thermal resistance between die and ambient (°C per W).
///
/// Models how quickly heat leaves the package. Higher resistance means the
/// chip settles further above ambient for the same power.
///
/// Source: hand-tuned for a passively sampled thermal_zone0
pub const THERMAL_RESISTANCE: f32 = 1.0;

/// Thermal capacitance of the package (J per °C).
///
/// Models thermal mass. Higher capacitance slows both heating and cooling.
pub const THERMAL_CAPACITANCE: f32 = 10.0;

/// Ambient temperature the package cools towards (°C).
pub const AMBIENT_TEMP_C: f32 = 30.0;

/// Control interval and prediction horizon (seconds).
///
/// One-step lookahead: the model predicts exactly one interval ahead and
/// the loop ticks once per interval.
pub const CONTROL_INTERVAL_S: f32 = 1.0;

// ===== POWER MODEL =====

/// Power scaling constant α (W per GHz at full utilization).
///
/// `power = α · utilization · frequency_ghz`
pub const POWER_SCALING_ALPHA: f32 = 5.0;

// ===== SAFETY BAND =====

/// Predicted temperature above which mitigation is enabled (°C).
pub const HIGH_WATERMARK_C: f32 = 75.0;

/// Predicted temperature below which mitigation is released (°C).
///
/// The 5°C gap to the high watermark is the dead band that stops the
/// controller from chattering around a single threshold.
pub const LOW_WATERMARK_C: f32 = 70.0;

/// Predicted temperature that raises the critical flag (°C).
///
/// Report-only: it does not trigger a stronger cap.
pub const CRITICAL_WATERMARK_C: f32 = 85.0;

/// Minimum time between two actuator writes (seconds).
pub const ACTION_COOLDOWN_S: f32 = 5.0;

// ===== MITIGATION =====

/// Fraction of the original ceiling kept while mitigating.
///
/// 0.7 caps a 3.0 GHz part at 2.1 GHz. Kept in double precision so the
/// capped ceiling truncates to the same whole kHz as a plain `f64` product.
pub const CEILING_REDUCTION_FACTOR: f64 = 0.7;

/// Whether a clean shutdown puts the original ceiling back by default.
///
/// Off: the process leaves the ceiling in its last-written state on exit.
pub const RESTORE_ON_SHUTDOWN: bool = false;

// ===== UTILIZATION =====

/// Utilization assumed when no estimator is wired in (fraction, 0..=1).
///
/// Busy but not saturated; biases the power estimate high rather than low.
pub const DEFAULT_UTILIZATION: f32 = 0.7;
