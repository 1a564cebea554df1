//! Monotonic clock readings for resolver timing.
//!
//! A reading is a `Duration` measured from the clock's own origin. Readings
//! are only meaningful as deltas against another reading of the same clock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Source of monotonic readings.
pub trait Clock: Send + Sync {
    /// Current reading, relative to the clock's origin.
    fn now(&self) -> Duration;
}

/// Clock backed by `std::time::Instant`.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    #[inline]
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock that only moves when told to.
///
/// Useful for deterministic tests and for replaying recorded timings.
#[derive(Debug, Default)]
pub struct ManualClock {
    nanos: AtomicU64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        self.nanos.fetch_add(to_nanos(by), Ordering::SeqCst);
    }

    /// Set the absolute reading.
    pub fn set(&self, reading: Duration) {
        self.nanos.store(to_nanos(reading), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }
}

/// Elapsed reading since `since`. Saturates at zero.
#[inline]
pub fn delta(clock: &dyn Clock, since: Duration) -> Duration {
    clock.now().saturating_sub(since)
}

/// Whole nanoseconds in `reading`, saturating at `u64::MAX`.
#[inline]
pub fn to_nanos(reading: Duration) -> u64 {
    u64::try_from(reading.as_nanos()).unwrap_or(u64::MAX)
}
