//! Payload Serialization
//!
//! ## Wire format
//!
//! A payload is one flat JSON-like object of comma-separated fragments:
//!
//! ```text
//! {"temp":23.15,"uptime":4294967295,"fw":"1.4.2"}
//!  └─fragment─┘ └─────fragment─────┘ └fragment┘
//! ```
//!
//! | property | fragment |
//! |----------|----------|
//! | signed integer `-3` | `"k":-3` |
//! | unsigned integer, raw `-1` | `"k":4294967295` |
//! | scale 100, 2 decimals, raw `12345` | `"k":123.45` |
//! | string `abc` | `"k":"abc"` |
//!
//! String values are written verbatim between quotes. Quotes, backslashes
//! and control characters are not escaped, so callers must keep them out of
//! string properties if the consumer expects strict JSON.

use alloc::string::String;
use core::fmt::{self, Write};

use crate::errors::{PropertyError, PropertyResult};

/// A property value as it will appear on the wire
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyValue<'a> {
    /// Signed decimal integer
    Signed(i32),
    /// Unsigned decimal integer (raw bits reinterpreted)
    Unsigned(u32),
    /// `raw / scale` with exactly `num_decimals` fractional digits
    Fixed {
        /// Raw stored value
        raw: i32,
        /// Divisor
        scale: u16,
        /// Fractional digits
        num_decimals: u8,
    },
    /// Quoted, unescaped string
    Text(&'a str),
}

impl fmt::Display for PropertyValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Signed(value) => write!(f, "{}", value),
            Self::Unsigned(value) => write!(f, "{}", value),
            Self::Fixed { raw, scale, num_decimals } => {
                let value = f64::from(raw) / f64::from(scale);
                write!(f, "{:.*}", usize::from(num_decimals), value)
            }
            Self::Text(text) => write!(f, "\"{}\"", text),
        }
    }
}

/// Write `"key":value` into `out`
pub fn write_fragment<W: Write>(out: &mut W, key: &str, value: &PropertyValue<'_>) -> fmt::Result {
    write!(out, "\"{}\":{}", key, value)
}

/// Render `"key":value` into a new string
pub fn render_fragment(key: &str, value: &PropertyValue<'_>) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_fragment(&mut out, key, value);
    out
}

/// Assembles one payload with a hard size limit
///
/// Fragments are appended comma-separated after an opening brace; the
/// closing brace is reserved up front so [`finish`](Self::finish) can never
/// exceed the capacity. A fragment that does not fit is rolled back and
/// reported instead of being truncated.
#[derive(Debug)]
pub struct PayloadBuilder {
    buf: String,
    capacity: usize,
    fragments: usize,
}

impl PayloadBuilder {
    /// Builder for payloads of at most `capacity` bytes
    pub fn new(capacity: usize) -> Self {
        let mut buf = String::with_capacity(capacity);
        buf.push('{');
        Self { buf, capacity, fragments: 0 }
    }

    /// Append one fragment.
    ///
    /// # Errors
    ///
    /// `PayloadOverflow` if the fragment plus the closing brace would not
    /// fit. The builder is left as it was before the call.
    pub fn push(&mut self, key: &str, value: &PropertyValue<'_>) -> PropertyResult<()> {
        let rollback = self.buf.len();
        if self.fragments > 0 {
            self.buf.push(',');
        }
        let written = write_fragment(&mut self.buf, key, value);

        let required = self.buf.len() + 1;
        if written.is_err() || required > self.capacity {
            self.buf.truncate(rollback);
            return Err(PropertyError::PayloadOverflow { required, capacity: self.capacity });
        }

        self.fragments += 1;
        Ok(())
    }

    /// Number of fragments appended so far
    pub fn fragments(&self) -> usize {
        self.fragments
    }

    /// `true` while no fragment has been appended
    pub fn is_empty(&self) -> bool {
        self.fragments == 0
    }

    /// Close the object; `None` when nothing was appended
    pub fn finish(mut self) -> Option<String> {
        if self.fragments == 0 {
            return None;
        }
        self.buf.push('}');
        Some(self.buf)
    }
}
