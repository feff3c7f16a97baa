//! Time Source Abstraction
//!
//! The scheduler only needs a millisecond counter. It is 32 bits wide and is
//! expected to wrap, like an RTOS tick count converted to milliseconds; the
//! comparison helpers in [`crate::time`] handle the wrap explicitly.
//!
//! ## Example Implementation
//!
//! ```rust
//! use propcast_core::traits::TimeSource;
//! use propcast_core::time::Timestamp;
//!
//! struct TickCounter {
//!     ticks: u32,
//!     ms_per_tick: u32,
//! }
//!
//! impl TimeSource for TickCounter {
//!     fn now_ms(&self) -> Timestamp {
//!         self.ticks.wrapping_mul(self.ms_per_tick)
//!     }
//! }
//! ```

use crate::time::Timestamp;

/// Source of the wrapping millisecond clock
pub trait TimeSource {
    /// Current time in milliseconds, wrapping at `u32::MAX`
    fn now_ms(&self) -> Timestamp;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now_ms(&self) -> Timestamp {
        (**self).now_ms()
    }
}

#[cfg(target_has_atomic = "ptr")]
impl<T: TimeSource + ?Sized> TimeSource for alloc::sync::Arc<T> {
    fn now_ms(&self) -> Timestamp {
        (**self).now_ms()
    }
}
