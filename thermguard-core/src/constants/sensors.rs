//! Sensor Plausibility Limits
//!
//! Bounds outside of which a raw reading is treated as a failed read rather
//! than a real measurement. Kernel drivers report errors in-band surprisingly
//! often (negative millidegrees, zero kHz after hotplug), so these limits
//! sit in front of the model.

// ===== TEMPERATURE =====

/// Lowest believable package temperature (°C).
///
/// thermal_zone drivers report negative values for "no reading", so any
/// negative temperature is a failed read. 0°C itself is accepted.
pub const TEMP_PLAUSIBLE_MIN_C: f32 = 0.0;

/// Highest believable package temperature (°C).
///
/// Silicon shuts itself down long before this (Tjmax is typically 100-110°C).
pub const TEMP_PLAUSIBLE_MAX_C: f32 = 150.0;

/// Sysfs thermal_zone units per °C (millidegrees).
pub const MILLIDEGREES_PER_C: f32 = 1000.0;

// ===== FREQUENCY =====

/// Lowest believable current frequency (GHz).
///
/// Zero is allowed: an idle, clock-gated core can legitimately report it.
pub const FREQ_PLAUSIBLE_MIN_GHZ: f32 = 0.0;

/// Highest believable current frequency (GHz).
pub const FREQ_PLAUSIBLE_MAX_GHZ: f32 = 10.0;

/// cpufreq units per GHz (kHz).
pub const KHZ_PER_GHZ: f32 = 1_000_000.0;
