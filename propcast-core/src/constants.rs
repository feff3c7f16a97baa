//! Capacities and Timing Defaults
//!
//! Registry sizes and buffer bounds are fixed at compile time so the whole
//! property model fits in static memory on the target device.

// ===== REGISTRY CAPACITIES =====

/// Maximum number of properties a [`PropertyStore`](crate::PropertyStore) can hold.
pub const MAX_PROPERTIES: usize = 30;

/// Maximum number of property groups a [`GroupRegistry`](crate::GroupRegistry) can hold.
pub const MAX_GROUPS: usize = 10;

/// Maximum property key length in bytes.
///
/// Keys must be strictly shorter than 20 bytes so they fit a 20-byte
/// NUL-terminated slot on the device side.
pub const MAX_KEY_LEN: usize = 19;

// ===== SCHEDULER =====

/// Default scheduler wake interval.
///
/// Independent of every group period; a group period shorter than the tick
/// is effectively rounded up to it.
pub const DEFAULT_TICK_PERIOD_MS: u32 = 100;

/// Default upper bound for one assembled payload, braces included.
///
/// 30 properties with 19-byte keys and 10-digit values need ~1 KB.
pub const DEFAULT_PAYLOAD_CAPACITY: usize = 1024;

// ===== PROPERTY DEFAULTS =====

/// Value given to numeric properties at creation unless overridden.
pub const DEFAULT_PROPERTY_VALUE: i32 = 0;

/// Initial `changed` state of new properties unless overridden.
///
/// `true` means every property appears in the first snapshot even when it
/// sits in an only-if-changed group.
pub const DEFAULT_PROPERTY_CHANGED: bool = true;
