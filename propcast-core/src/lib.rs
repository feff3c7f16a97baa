//! Property registry and periodic publication engine for PropCast
//!
//! Keeps a bounded set of named numeric and string properties, groups them
//! under independent publication periods and, once per scheduler tick,
//! batches every eligible property into a single JSON object handed to an
//! external transport.
//!
//! Key constraints:
//! - Fixed-capacity registries (30 properties, 10 groups)
//! - One publish call per tick, regardless of how many groups are due
//! - Wraparound-safe 32-bit millisecond clock
//! - Value updates may come from any thread or interrupt-free context
//!
//! ```no_run
//! use propcast_core::{
//!     GroupRegistry, PropertyStore, Scheduler, SchedulerConfig,
//!     time::MonotonicClock, traits::Transport,
//! };
//!
//! struct Uplink;
//!
//! impl Transport for Uplink {
//!     fn is_ready(&self) -> bool { true }
//!     fn publish(&mut self, payload: &str) -> bool {
//!         println!("{payload}");
//!         true
//!     }
//! }
//!
//! let mut store = PropertyStore::new();
//! let temperature = store.create_numeric("temp", 100, 2, true)?;
//! let firmware = store.create_string("fw", 16)?;
//!
//! let mut groups = GroupRegistry::new();
//! let fast = groups.create(1_000, true)?;
//! let slow = groups.create(60_000, false)?;
//! groups.add_property(&store, temperature, fast)?;
//! groups.add_property(&store, firmware, slow)?;
//!
//! let mut scheduler = Scheduler::new(&store, groups, MonotonicClock::new(), SchedulerConfig::default());
//! store.update_numeric(temperature, 2_315);
//! scheduler.wake(&mut Uplink);
//! # Ok::<(), propcast_core::PropertyError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

extern crate alloc;

#[macro_use]
mod macros;

pub mod config;
pub mod constants;
pub mod errors;
pub mod group;
pub mod property;
pub mod scheduler;
pub mod serializer;
pub mod time;
pub mod traits;

// Public API
pub use config::{PropertyDefaults, SchedulerConfig};
pub use errors::{PropertyError, PropertyResult};
pub use group::{GroupId, GroupRegistry, PropertyGroup};
pub use property::{NumericFormat, PropertyId, PropertyKind, PropertyStore};
pub use scheduler::{Batch, Prepared, Scheduler, SchedulerStats, WakeOutcome};
pub use serializer::{PayloadBuilder, PropertyValue};
pub use traits::{TimeSource, Transport};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
