//! Seams between the property engine and its environment
//!
//! - [`time`] - millisecond clock used for group due-ness
//! - [`transport`] - readiness query and publish call of the uplink

pub mod time;
pub mod transport;

pub use time::TimeSource;
pub use transport::Transport;
