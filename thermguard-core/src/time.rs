//! Time management for the control loop
//!
//! Provides clock abstraction so cooldowns and I/O budgets can be measured
//! against whatever the host offers:
//! - Monotonic clock (preferred, immune to NTP steps)
//! - System wall clock
//! - Fixed / shared manual clocks for deterministic tests

/// Timestamp in milliseconds since epoch (or clock creation for monotonic)
pub type Timestamp = u64;

/// Source of time for the controller
pub trait TimeSource {
    /// Get current timestamp in milliseconds
    fn now(&self) -> Timestamp;

    /// Check if this source provides wall clock time (vs monotonic)
    fn is_wall_clock(&self) -> bool;

    /// Get precision in milliseconds
    fn precision_ms(&self) -> u32;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now(&self) -> Timestamp {
        (**self).now()
    }

    fn is_wall_clock(&self) -> bool {
        (**self).is_wall_clock()
    }

    fn precision_ms(&self) -> u32 {
        (**self).precision_ms()
    }
}

/// Milliseconds elapsed since `earlier`, zero if the clock went backwards
pub fn elapsed_ms(earlier: Timestamp, now: Timestamp) -> u64 {
    now.saturating_sub(earlier)
}

/// Convert fractional seconds into whole milliseconds, rounding to nearest
///
/// Negative and NaN inputs map to zero.
pub fn seconds_to_ms(seconds: f32) -> u64 {
    if seconds.is_nan() || seconds <= 0.0 {
        return 0;
    }
    libm::roundf(seconds * crate::constants::time::MS_PER_SECOND as f32) as u64
}

/// Monotonic time source backed by `std::time::Instant`
///
/// Starts at 0 on creation, always increases
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl MonotonicClock {
    pub fn new() -> Self {
        Self { origin: std::time::Instant::now() }
    }
}

#[cfg(feature = "std")]
impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl TimeSource for MonotonicClock {
    fn now(&self) -> Timestamp {
        self.origin.elapsed().as_millis() as Timestamp
    }

    fn is_wall_clock(&self) -> bool {
        false
    }

    fn precision_ms(&self) -> u32 {
        1
    }
}

/// System time source (requires std)
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct SystemTime;

#[cfg(feature = "std")]
impl TimeSource for SystemTime {
    fn now(&self) -> Timestamp {
        use std::time::{SystemTime as StdSystemTime, UNIX_EPOCH};

        StdSystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }

    fn is_wall_clock(&self) -> bool {
        true
    }

    fn precision_ms(&self) -> u32 {
        1
    }
}

/// Fixed time source for testing
#[derive(Debug, Clone)]
pub struct FixedTime {
    timestamp: Timestamp,
}

impl FixedTime {
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp }
    }

    pub fn set(&mut self, timestamp: Timestamp) {
        self.timestamp = timestamp;
    }

    pub fn advance(&mut self, ms: u64) {
        self.timestamp += ms;
    }
}

impl TimeSource for FixedTime {
    fn now(&self) -> Timestamp {
        self.timestamp
    }

    fn is_wall_clock(&self) -> bool {
        false
    }

    fn precision_ms(&self) -> u32 {
        1
    }
}

/// Manually driven clock that can be cloned and advanced from outside
///
/// Every clone observes the same time, so a test can hand one clone to a
/// `ControlLoop` and keep another to move time forward between ticks.
#[cfg(feature = "std")]
#[derive(Debug, Clone, Default)]
pub struct SharedTime {
    timestamp: std::sync::Arc<std::sync::atomic::AtomicU64>,
}

#[cfg(feature = "std")]
impl SharedTime {
    pub fn new(timestamp: Timestamp) -> Self {
        Self {
            timestamp: std::sync::Arc::new(std::sync::atomic::AtomicU64::new(timestamp)),
        }
    }

    pub fn set(&self, timestamp: Timestamp) {
        self.timestamp.store(timestamp, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn advance(&self, ms: u64) {
        self.timestamp.fetch_add(ms, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(feature = "std")]
impl TimeSource for SharedTime {
    fn now(&self) -> Timestamp {
        self.timestamp.load(std::sync::atomic::Ordering::SeqCst)
    }

    fn is_wall_clock(&self) -> bool {
        false
    }

    fn precision_ms(&self) -> u32 {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_time_advances() {
        let mut time = FixedTime::new(1000);
        assert_eq!(time.now(), 1000);

        time.advance(500);
        assert_eq!(time.now(), 1500);
    }

    #[test]
    fn elapsed_saturates_when_clock_steps_back() {
        assert_eq!(elapsed_ms(1000, 4000), 3000);
        assert_eq!(elapsed_ms(4000, 1000), 0);
    }

    #[test]
    fn seconds_conversion() {
        assert_eq!(seconds_to_ms(1.0), 1000);
        assert_eq!(seconds_to_ms(0.25), 250);
        assert_eq!(seconds_to_ms(-3.0), 0);
        assert_eq!(seconds_to_ms(f32::NAN), 0);
    }

    #[cfg(feature = "std")]
    #[test]
    fn shared_time_clones_see_same_clock() {
        let clock = SharedTime::new(0);
        let observer = clock.clone();

        clock.advance(2000);
        assert_eq!(observer.now(), 2000);

        observer.set(10);
        assert_eq!(clock.now(), 10);
    }

    #[cfg(feature = "std")]
    #[test]
    fn monotonic_clock_never_decreases() {
        let clock = MonotonicClock::new();
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
        assert!(!clock.is_wall_clock());
    }
}
