//! Error Types for Property and Group Management
//!
//! ## Error Categories
//!
//! ### Registration
//! - `RegistryFull`: property or group capacity exhausted
//! - `DuplicateKey`: a property with that key already exists
//! - `KeyTooLong`: key does not fit [`MAX_KEY_LEN`](crate::constants::MAX_KEY_LEN)
//! - `InvalidScale`: numeric property created with a zero divisor
//! - `AllocationFailed`: string buffer could not be reserved
//!
//! ### Handles
//! - `InvalidProperty` / `InvalidGroup`: id not issued by this registry
//! - `AlreadyMember`: property already belongs to the group
//!
//! ### Publication
//! - `PayloadOverflow`: assembled payload would exceed its capacity
//!
//! None of these are fatal. Creation errors are returned to the caller;
//! accessor misuse degrades to sentinel values; a payload overflow aborts
//! only the current wake.
//!
//! ```rust
//! use propcast_core::{PropertyError, PropertyStore};
//!
//! let mut store = PropertyStore::new();
//! store.create_numeric("rssi", 1, 0, true)?;
//!
//! match store.create_numeric("rssi", 1, 0, true) {
//!     Err(PropertyError::DuplicateKey) => {} // Pick another key
//!     other => panic!("unexpected {:?}", other),
//! }
//! # Ok::<(), PropertyError>(())
//! ```

use thiserror_no_std::Error;

/// Result type for property and group operations
pub type PropertyResult<T> = Result<T, PropertyError>;

/// Property errors - small and `Copy` so they can be returned from hot paths
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyError {
    /// Registry has no free slot
    #[error("Registry full: capacity {capacity}")]
    RegistryFull {
        /// Capacity of the registry that rejected the insertion
        capacity: usize,
    },

    /// Key already used by another property
    #[error("Duplicate property key")]
    DuplicateKey,

    /// Key longer than the allowed maximum
    #[error("Key length {len} exceeds maximum {max}")]
    KeyTooLong {
        /// Length of the rejected key in bytes
        len: usize,
        /// Maximum accepted length in bytes
        max: usize,
    },

    /// Numeric property scale of zero
    #[error("Scale must be non-zero")]
    InvalidScale,

    /// String buffer reservation failed
    #[error("Allocation of {requested} bytes failed")]
    AllocationFailed {
        /// Number of bytes that could not be reserved
        requested: usize,
    },

    /// Property id not issued by this store
    #[error("Invalid property id")]
    InvalidProperty,

    /// Group id not issued by this registry
    #[error("Invalid group id")]
    InvalidGroup,

    /// Property already a member of the group
    #[error("Property already in group")]
    AlreadyMember,

    /// Payload would not fit the assembly buffer
    #[error("Payload of {required} bytes exceeds capacity {capacity}")]
    PayloadOverflow {
        /// Bytes needed so far when the limit was hit
        required: usize,
        /// Configured payload capacity
        capacity: usize,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for PropertyError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::RegistryFull { capacity } =>
                defmt::write!(fmt, "Registry full ({})", capacity),
            Self::DuplicateKey =>
                defmt::write!(fmt, "Duplicate key"),
            Self::KeyTooLong { len, max } =>
                defmt::write!(fmt, "Key length {} > {}", len, max),
            Self::InvalidScale =>
                defmt::write!(fmt, "Zero scale"),
            Self::AllocationFailed { requested } =>
                defmt::write!(fmt, "Allocation of {} bytes failed", requested),
            Self::InvalidProperty =>
                defmt::write!(fmt, "Invalid property"),
            Self::InvalidGroup =>
                defmt::write!(fmt, "Invalid group"),
            Self::AlreadyMember =>
                defmt::write!(fmt, "Already in group"),
            Self::PayloadOverflow { required, capacity } =>
                defmt::write!(fmt, "Payload {} > {}", required, capacity),
        }
    }
}
