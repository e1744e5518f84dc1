//! Constants for ThermGuard Core
//!
//! Every default the controller ships with lives here, with its unit and
//! where the number comes from. Configuration structs take their defaults
//! from these values; nothing else should hard-code them.
//!
//! ## Organization
//!
//! - **Thermal**: RC model, power model, watermarks, cooldown, mitigation
//! - **Sensors**: plausible ranges for sysfs temperature and frequency
//! - **Time**: unit conversions and I/O budgets

/// RC model, power model and safety band defaults.
pub mod thermal;

/// Plausibility limits for raw sensor readings.
pub mod sensors;

/// Time-related constants for intervals and timeouts.
pub mod time;

// Re-export commonly used constants for convenience
pub use thermal::{
    AMBIENT_TEMP_C, CONTROL_INTERVAL_S, THERMAL_CAPACITANCE, THERMAL_RESISTANCE,
    POWER_SCALING_ALPHA,
    HIGH_WATERMARK_C, LOW_WATERMARK_C, CRITICAL_WATERMARK_C, ACTION_COOLDOWN_S,
    CEILING_REDUCTION_FACTOR,
};

pub use sensors::{
    TEMP_PLAUSIBLE_MIN_C, TEMP_PLAUSIBLE_MAX_C,
    FREQ_PLAUSIBLE_MIN_GHZ, FREQ_PLAUSIBLE_MAX_GHZ,
};

pub use time::{MS_PER_SECOND, DEFAULT_IO_TIMEOUT_MS};
