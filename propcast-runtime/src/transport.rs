//! Async transport contract and stock implementations
//!
//! | type | use |
//! |------|-----|
//! | [`AsyncTransport`] | uplinks whose publish awaits I/O |
//! | [`Blocking`] | wraps a synchronous [`Transport`] |
//! | [`ChannelTransport`] | hands payloads to another task over `mpsc` |

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use propcast_core::Transport;
use tokio::sync::mpsc;

/// Async version of [`Transport`]
///
/// `publish` is called at most once per wake and only after `is_ready`
/// returned `true` for that wake.
#[async_trait]
pub trait AsyncTransport: Send {
    /// Whether a publish attempt makes sense right now
    fn is_ready(&self) -> bool;

    /// Send one payload; `true` once it has been accepted
    async fn publish(&mut self, payload: &str) -> bool;
}

#[async_trait]
impl<T: AsyncTransport + ?Sized> AsyncTransport for Box<T> {
    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }

    async fn publish(&mut self, payload: &str) -> bool {
        (**self).publish(payload).await
    }
}

/// Adapter running a synchronous transport inside the async task
///
/// The publish runs inline on the runtime thread, so keep it short.
#[derive(Debug, Default)]
pub struct Blocking<T>(pub T);

#[async_trait]
impl<T: Transport + Send> AsyncTransport for Blocking<T> {
    fn is_ready(&self) -> bool {
        self.0.is_ready()
    }

    async fn publish(&mut self, payload: &str) -> bool {
        self.0.publish(payload)
    }
}

#[derive(Debug)]
struct Flags {
    ready: AtomicBool,
    rejecting: AtomicBool,
}

/// Transport forwarding payloads over an `mpsc` channel
///
/// Starts not ready. A publish fails when the transport is rejecting or the
/// receiver has been dropped.
#[derive(Debug)]
pub struct ChannelTransport {
    tx: mpsc::Sender<String>,
    flags: Arc<Flags>,
}

/// Remote control for a [`ChannelTransport`]
#[derive(Debug, Clone)]
pub struct TransportControl {
    flags: Arc<Flags>,
}

impl ChannelTransport {
    /// Transport, its control handle and the payload receiver
    pub fn new(buffer: usize) -> (Self, TransportControl, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(buffer);
        let flags = Arc::new(Flags {
            ready: AtomicBool::new(false),
            rejecting: AtomicBool::new(false),
        });
        let control = TransportControl { flags: Arc::clone(&flags) };
        (Self { tx, flags }, control, rx)
    }
}

#[async_trait]
impl AsyncTransport for ChannelTransport {
    fn is_ready(&self) -> bool {
        self.flags.ready.load(Ordering::Acquire) && !self.tx.is_closed()
    }

    async fn publish(&mut self, payload: &str) -> bool {
        if self.flags.rejecting.load(Ordering::Acquire) {
            return false;
        }
        self.tx.send(payload.to_owned()).await.is_ok()
    }
}

impl TransportControl {
    /// Mark the link up or down
    pub fn set_ready(&self, ready: bool) {
        self.flags.ready.store(ready, Ordering::Release);
    }

    /// Make publishes fail while the link stays up
    pub fn set_rejecting(&self, rejecting: bool) {
        self.flags.rejecting.store(rejecting, Ordering::Release);
    }

    /// Current readiness flag
    pub fn is_ready(&self) -> bool {
        self.flags.ready.load(Ordering::Acquire)
    }
}
