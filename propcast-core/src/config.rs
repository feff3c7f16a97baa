//! Runtime configuration
//!
//! Plain structs with sensible defaults. With the `serde` feature they can be
//! loaded from any serde format; missing fields fall back to the defaults.

use crate::constants::{
    DEFAULT_PAYLOAD_CAPACITY, DEFAULT_PROPERTY_CHANGED, DEFAULT_PROPERTY_VALUE,
    DEFAULT_TICK_PERIOD_MS,
};

/// Initial state applied to properties when they are created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PropertyDefaults {
    /// Starting value of numeric properties
    pub value: i32,
    /// Whether new properties start out as changed
    pub changed: bool,
}

impl PropertyDefaults {
    /// Create defaults with an explicit value and changed state
    pub const fn new(value: i32, changed: bool) -> Self {
        Self { value, changed }
    }
}

impl Default for PropertyDefaults {
    fn default() -> Self {
        Self::new(DEFAULT_PROPERTY_VALUE, DEFAULT_PROPERTY_CHANGED)
    }
}

/// Scheduler configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SchedulerConfig {
    /// Fixed wake interval of the scheduler task
    pub tick_period_ms: u32,
    /// Maximum size of one payload in bytes, braces included.
    ///
    /// Must hold the largest single fragment. A string property whose
    /// `max_len` plus key and quoting exceeds this bound aborts every wake
    /// in which it is eligible, and the other properties of those wakes are
    /// held back with it.
    pub payload_capacity: usize,
}

impl SchedulerConfig {
    /// Set the wake interval
    pub fn with_tick_period_ms(mut self, tick_period_ms: u32) -> Self {
        self.tick_period_ms = tick_period_ms;
        self
    }

    /// Set the payload bound
    pub fn with_payload_capacity(mut self, payload_capacity: usize) -> Self {
        self.payload_capacity = payload_capacity;
        self
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: DEFAULT_TICK_PERIOD_MS,
            payload_capacity: DEFAULT_PAYLOAD_CAPACITY,
        }
    }
}
