//! Tokio driver for the PropCast property scheduler
//!
//! ## Overview
//!
//! [`propcast_core::Scheduler`] knows what to publish and when; this crate
//! gives it a heartbeat. A [`PropertyTask`] wakes the scheduler on a fixed
//! tick and awaits the transport's publish between evaluation and commit,
//! so a slow uplink delays the next tick instead of overlapping it.
//!
//! ```text
//!  updaters ──► Arc<PropertyStore> ◄── Scheduler ◄── PropertyTask ──► AsyncTransport
//!                                                       ▲
//!                                    TaskHandle ────────┘ shutdown / join
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use propcast_core::{GroupRegistry, PropertyStore, Scheduler, SchedulerConfig};
//! use propcast_runtime::{ChannelTransport, PropertyTask, TokioClock};
//!
//! # async fn run() -> Result<(), propcast_runtime::RuntimeError> {
//! let mut store = PropertyStore::new();
//! let rssi = store.create_numeric("rssi", 1, 0, true)?;
//! let mut groups = GroupRegistry::new();
//! let radio = groups.create(5_000, true)?;
//! groups.add_property(&store, rssi, radio)?;
//! let store = Arc::new(store);
//!
//! let scheduler = Scheduler::new(Arc::clone(&store), groups, TokioClock::new(), SchedulerConfig::default());
//! let (transport, control, mut payloads) = ChannelTransport::new(8);
//! let task = PropertyTask::spawn(scheduler, transport);
//!
//! store.update_numeric(rssi, -67);
//! control.set_ready(true);
//! let payload = payloads.recv().await;
//!
//! let scheduler = task.shutdown().await?;
//! println!("{payload:?} after {} wakes", scheduler.stats().wakes);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod clock;
pub mod error;
pub mod task;
pub mod transport;

pub use clock::TokioClock;
pub use error::{RuntimeError, RuntimeResult};
pub use task::{wake, PropertyTask, TaskHandle};
pub use transport::{AsyncTransport, Blocking, ChannelTransport, TransportControl};
