//! Shared validation helpers
//!
//! Pure functions, no allocation. Each returns the `&'static str` reason the
//! caller wraps into a channel-specific [`crate::ControlError`].

/// Reject NaN and infinities
pub fn check_finite(value: f32) -> Result<f32, &'static str> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err("reading is not a finite number")
    }
}

/// Check value sits inside `[min, max]`
pub fn check_range(value: f32, min: f32, max: f32) -> Result<f32, &'static str> {
    let value = check_finite(value)?;
    if value < min {
        Err("reading below plausible range")
    } else if value > max {
        Err("reading above plausible range")
    } else {
        Ok(value)
    }
}
