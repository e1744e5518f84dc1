//! Time-Related Constants

// ===== TIME UNIT CONVERSIONS =====

/// Milliseconds per second.
pub const MS_PER_SECOND: u64 = 1000;

// ===== TIMEOUT VALUES =====

/// Default budget for a single sensor read (milliseconds).
///
/// Sysfs reads normally return in microseconds; a read that takes a quarter
/// of the default control interval is treated as failed.
pub const DEFAULT_IO_TIMEOUT_MS: u64 = 250;
