//! Uplink contract
//!
//! Connection management, framing and retries live outside this crate. The
//! scheduler asks whether the uplink can take a message, then hands it one
//! payload per wake and trusts the reported outcome as-is.

/// Synchronous uplink used by [`Scheduler::wake`](crate::Scheduler::wake)
pub trait Transport {
    /// Non-blocking readiness check, queried once per tick
    fn is_ready(&self) -> bool;

    /// Send one payload; may block. Returns whether delivery succeeded.
    fn publish(&mut self, payload: &str) -> bool;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }

    fn publish(&mut self, payload: &str) -> bool {
        (**self).publish(payload)
    }
}
