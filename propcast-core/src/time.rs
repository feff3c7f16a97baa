//! Wrapping millisecond time
//!
//! Provides the clock arithmetic used to decide whether a group is due, and
//! the stock [`TimeSource`] implementations:
//! - `MonotonicClock`: milliseconds since construction (std only)
//! - `MockTimeSource`: settable clock for tests and simulations

use core::sync::atomic::{AtomicU32, Ordering};

use crate::traits::TimeSource;

/// Milliseconds on a 32-bit wrapping counter
pub type Timestamp = u32;

/// Time elapsed between `last` and `now` on the wrapping counter.
///
/// When the counter has wrapped (`now < last`) the distance is measured as
/// `(u32::MAX - last) + now`, one millisecond short of the modular distance.
/// Due-ness comparisons in deployed firmware rely on exactly this value.
pub const fn elapsed_ms(last: Timestamp, now: Timestamp) -> u32 {
    if now >= last {
        now - last
    } else {
        (u32::MAX - last) + now
    }
}

/// Whether at least `period_ms` have elapsed since `last`
pub const fn is_due(last: Timestamp, now: Timestamp, period_ms: u32) -> bool {
    elapsed_ms(last, now) >= period_ms
}

/// Monotonic clock counting milliseconds since it was created
///
/// Truncated to 32 bits, so it wraps after ~49.7 days like a device tick
/// counter would.
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    start: std::time::Instant,
}

#[cfg(feature = "std")]
impl MonotonicClock {
    /// Start counting from now
    pub fn new() -> Self {
        Self { start: std::time::Instant::now() }
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
    fn now_ms(&self) -> Timestamp {
        self.start.elapsed().as_millis() as Timestamp
    }
}

/// Controllable clock for tests
///
/// Interior mutability lets a test keep a shared reference while the
/// scheduler owns another one.
#[derive(Debug, Default)]
pub struct MockTimeSource {
    now: AtomicU32,
}

impl MockTimeSource {
    /// Clock frozen at `now`
    pub const fn new(now: Timestamp) -> Self {
        Self { now: AtomicU32::new(now) }
    }

    /// Jump to an absolute time
    pub fn set(&self, now: Timestamp) {
        self.now.store(now, Ordering::Release);
    }

    /// Move forward, wrapping at `u32::MAX`
    pub fn advance(&self, ms: u32) {
        self.now.fetch_add(ms, Ordering::AcqRel);
    }
}

impl TimeSource for MockTimeSource {
    fn now_ms(&self) -> Timestamp {
        self.now.load(Ordering::Acquire)
    }
}
