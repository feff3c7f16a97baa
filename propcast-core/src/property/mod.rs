//! Property Model
//!
//! ## Overview
//!
//! A property is a named value published to the uplink. It is either numeric
//! (a signed 32-bit raw value plus formatting metadata) or a string with a
//! fixed maximum length chosen at creation.
//!
//! ```text
//! Property
//! ├── key          immutable, unique, < 20 bytes
//! ├── kind         immutable: Numeric(NumericFormat) | Text { max_len }
//! └── state        spin::Mutex
//!     ├── value / text
//!     ├── changed   differs from the last published value
//!     ├── disabled  skipped by every group
//!     └── revision  bumped on every change
//! ```
//!
//! ## Numeric formatting
//!
//! | scale | signed | published as |
//! |-------|--------|--------------|
//! | 1     | true   | `i32` decimal |
//! | 1     | false  | raw bits as `u32` decimal |
//! | n ≠ 1 | -      | `value / n` with `num_decimals` digits |
//!
//! ## Concurrency
//!
//! Each property guards its mutable state with its own lock. Updaters and the
//! scheduler never hold more than one property lock at a time. The revision
//! counter lets the scheduler clear `changed` only when nothing was written
//! between rendering a value and learning that it was delivered.

mod store;

pub use store::PropertyStore;

use alloc::string::String;
use core::num::NonZeroU16;

use spin::{Mutex, MutexGuard};

use crate::constants::MAX_KEY_LEN;
use crate::serializer::PropertyValue;

/// Property key storage
pub type Key = heapless::String<MAX_KEY_LEN>;

/// Handle to a property, 1-based and stable for the store's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PropertyId(NonZeroU16);

impl PropertyId {
    /// Wrap a raw 1-based id; `0` is never a valid handle
    pub const fn new(raw: u16) -> Option<Self> {
        match NonZeroU16::new(raw) {
            Some(raw) => Some(Self(raw)),
            None => None,
        }
    }

    /// Raw 1-based id
    pub const fn get(self) -> u16 {
        self.0.get()
    }

    pub(crate) const fn index(self) -> usize {
        self.0.get() as usize - 1
    }

    pub(crate) fn from_index(index: usize) -> Self {
        // Indices are bounded by MAX_PROPERTIES, far below u16::MAX
        Self(NonZeroU16::MIN.saturating_add(index as u16))
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PropertyId {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "P{}", self.get())
    }
}

/// Formatting metadata of a numeric property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumericFormat {
    /// Divisor applied when publishing; `1` means integer semantics
    pub scale: u16,
    /// Digits after the decimal point when `scale != 1`
    pub num_decimals: u8,
    /// Signed or unsigned interpretation when `scale == 1`
    pub signed: bool,
}

impl NumericFormat {
    /// Plain integer, signed or unsigned
    pub const fn integer(signed: bool) -> Self {
        Self { scale: 1, num_decimals: 0, signed }
    }

    /// Fixed-point value published as `raw / scale`
    pub const fn fixed(scale: u16, num_decimals: u8) -> Self {
        Self { scale, num_decimals, signed: true }
    }

    /// `true` when published as an integer
    pub const fn is_integer(&self) -> bool {
        self.scale == 1
    }

    /// View of `raw` as it will be published
    pub const fn view(&self, raw: i32) -> PropertyValue<'static> {
        if self.scale != 1 {
            PropertyValue::Fixed { raw, scale: self.scale, num_decimals: self.num_decimals }
        } else if self.signed {
            PropertyValue::Signed(raw)
        } else {
            PropertyValue::Unsigned(raw as u32)
        }
    }
}

/// What a property holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// Signed 32-bit raw value with formatting metadata
    Numeric(NumericFormat),
    /// String of at most `max_len` bytes
    Text {
        /// Longest string the property will store, in bytes
        max_len: usize,
    },
}

impl PropertyKind {
    /// Formatting metadata; string properties report a plain unsigned integer
    pub const fn format(&self) -> NumericFormat {
        match self {
            Self::Numeric(format) => *format,
            Self::Text { .. } => NumericFormat::integer(false),
        }
    }

    /// `true` for string properties
    pub const fn is_text(&self) -> bool {
        matches!(self, Self::Text { .. })
    }
}

/// Mutable part of a property, only reachable through its lock
#[derive(Debug)]
pub(crate) struct PropertyState {
    pub(crate) value: i32,
    pub(crate) text: String,
    pub(crate) changed: bool,
    pub(crate) disabled: bool,
    pub(crate) revision: u32,
}

impl PropertyState {
    fn mark_changed(&mut self) {
        self.changed = true;
        self.revision = self.revision.wrapping_add(1);
    }

    /// Included in a due group's payload?
    pub(crate) fn is_eligible(&self, only_if_changed: bool) -> bool {
        !self.disabled && (self.changed || !only_if_changed)
    }

    /// Clear `changed` if the published revision is still current
    pub(crate) fn acknowledge(&mut self, revision: u32) -> bool {
        if self.revision == revision {
            self.changed = false;
            true
        } else {
            false
        }
    }
}

/// One registered property
#[derive(Debug)]
pub struct Property {
    key: Key,
    kind: PropertyKind,
    state: Mutex<PropertyState>,
}

impl Property {
    pub(crate) fn new(key: Key, kind: PropertyKind, value: i32, changed: bool, text: String) -> Self {
        Self {
            key,
            kind,
            state: Mutex::new(PropertyState {
                value,
                text,
                changed,
                disabled: false,
                revision: 0,
            }),
        }
    }

    /// Unique key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Numeric or string
    pub fn kind(&self) -> PropertyKind {
        self.kind
    }

    /// Whether the value differs from the last published one
    pub fn is_changed(&self) -> bool {
        self.state.lock().changed
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, PropertyState> {
        self.state.lock()
    }

    /// Publishable view of a locked state
    pub(crate) fn view<'s>(&self, state: &'s PropertyState) -> PropertyValue<'s> {
        match self.kind {
            PropertyKind::Numeric(format) => format.view(state.value),
            PropertyKind::Text { .. } => PropertyValue::Text(&state.text),
        }
    }
}

/// Longest prefix of `s` that fits `max_len` bytes on a char boundary
pub(crate) fn truncate_to(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
