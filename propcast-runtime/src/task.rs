//! Periodic publication task
//!
//! The task sleeps one tick, wakes the scheduler, and repeats until asked to
//! stop. Ticks use [`MissedTickBehavior::Delay`]: when a publish runs past
//! the next tick, that missed tick fires as soon as the publish returns and
//! only the ticks after it shift. Publishes never overlap and never burst
//! to catch up.

use std::ops::Deref;
use std::time::Duration;

use log::{info, trace};
use propcast_core::{Prepared, PropertyStore, Scheduler, TimeSource, WakeOutcome};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::error::RuntimeResult;
use crate::transport::AsyncTransport;

/// Run one wake against an async transport
pub async fn wake<S, C, T>(scheduler: &mut Scheduler<S, C>, transport: &mut T) -> WakeOutcome
where
    S: Deref<Target = PropertyStore>,
    C: TimeSource,
    T: AsyncTransport + ?Sized,
{
    match scheduler.prepare(transport.is_ready()) {
        Prepared::Done(outcome) => outcome,
        Prepared::Publish(batch) => {
            let published = transport.publish(batch.payload()).await;
            scheduler.commit(batch, published)
        }
    }
}

/// Spawns the publication loop
pub struct PropertyTask;

impl PropertyTask {
    /// Start waking `scheduler` every tick on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Outside a tokio runtime.
    pub fn spawn<S, C, T>(scheduler: Scheduler<S, C>, transport: T) -> TaskHandle<S, C>
    where
        S: Deref<Target = PropertyStore> + Send + 'static,
        C: TimeSource + Send + 'static,
        T: AsyncTransport + 'static,
    {
        let (shutdown, signal) = watch::channel(false);
        let join = tokio::spawn(run(scheduler, transport, signal));
        TaskHandle { shutdown, join }
    }
}

async fn run<S, C, T>(
    mut scheduler: Scheduler<S, C>,
    mut transport: T,
    mut signal: watch::Receiver<bool>,
) -> Scheduler<S, C>
where
    S: Deref<Target = PropertyStore>,
    C: TimeSource,
    T: AsyncTransport,
{
    let tick_ms = scheduler.tick_period_ms().max(1);
    let mut ticker = interval(Duration::from_millis(u64::from(tick_ms)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // First tick completes immediately
    ticker.tick().await;

    info!(
        "property task started: {} properties, {} groups, tick {} ms",
        scheduler.store().len(),
        scheduler.groups().len(),
        tick_ms
    );

    loop {
        tokio::select! {
            changed = signal.changed() => {
                if changed.is_err() || *signal.borrow() {
                    break;
                }
            }
            _ = ticker.tick() => {
                let outcome = wake(&mut scheduler, &mut transport).await;
                trace!("wake finished: {:?}", outcome);
            }
        }
    }

    let stats = scheduler.stats();
    info!(
        "property task stopped after {} wakes: {} published, {} failed",
        stats.wakes, stats.payloads_published, stats.publish_failures
    );
    scheduler
}

/// Handle to a running [`PropertyTask`]
///
/// Dropping the handle stops the task.
#[derive(Debug)]
pub struct TaskHandle<S, C> {
    shutdown: watch::Sender<bool>,
    join: JoinHandle<Scheduler<S, C>>,
}

impl<S, C> TaskHandle<S, C> {
    /// Ask the task to stop and wait for it; yields the scheduler back
    pub async fn shutdown(self) -> RuntimeResult<Scheduler<S, C>> {
        // The task may already be gone; joining reports why
        let _ = self.shutdown.send(true);
        Ok(self.join.await?)
    }

    /// Whether the task has already stopped
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Cancel the task immediately; a later join reports the cancellation
    pub fn abort(&self) {
        self.join.abort();
    }
}
