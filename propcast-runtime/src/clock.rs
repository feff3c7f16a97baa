//! Tokio-backed time source

use propcast_core::time::Timestamp;
use propcast_core::TimeSource;
use tokio::time::Instant;

/// Milliseconds since creation on tokio's clock, wrapping at 32 bits
///
/// Follows tokio's paused time in tests, so group periods can be exercised
/// with `tokio::time::advance`.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    origin: Instant,
}

impl TokioClock {
    /// Start counting from now
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for TokioClock {
    fn now_ms(&self) -> Timestamp {
        // Truncation gives the same wrap as a 32-bit tick counter
        self.origin.elapsed().as_millis() as Timestamp
    }
}
