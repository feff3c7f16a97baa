//! Periodic Publication Scheduler
//!
//! ## Overview
//!
//! The scheduler is driven by a fixed tick. Each wake runs through:
//!
//! ```text
//!   ┌────────────┐ transport not ready
//!   │ Idle-Wait  │◄──────────────────────────────┐
//!   └─────┬──────┘                               │
//!         │ tick                                 │
//!   ┌─────▼──────┐ nothing eligible              │
//!   │  Evaluate  ├───────────────────────────────┤
//!   └─────┬──────┘                               │
//!         │ Batch                                │
//!   ┌─────▼──────┐                               │
//!   │  Publish   │ (external, may block)         │
//!   └─────┬──────┘                               │
//!   ┌─────▼──────┐                               │
//!   │  Commit    ├───────────────────────────────┘
//!   └────────────┘
//! ```
//!
//! **Evaluate** visits every group. A group is due once its period has
//! elapsed on the wrapping clock, and every group is due until the initial
//! snapshot has gone out. Eligible members of all due groups are rendered
//! into one shared payload; a property reached through several due groups
//! is rendered once. Every due group's timestamp moves to `now` whatever
//! happens next.
//!
//! **Publish** hands the payload to the transport exactly once.
//!
//! **Commit** clears `changed` on the included properties if the transport
//! accepted the payload, and only for properties that were not updated again
//! in the meantime. On failure nothing is cleared, so the properties go out
//! again the next time one of their groups is due.
//!
//! [`Scheduler::wake`] runs all of it against a synchronous [`Transport`].
//! Async drivers call [`Scheduler::prepare`] and [`Scheduler::commit`] around
//! their own publish.

mod batch;
mod stats;

pub use batch::Batch;
pub use stats::SchedulerStats;

use core::ops::Deref;

use heapless::Vec;

use batch::Staged;

use crate::config::SchedulerConfig;
use crate::constants::MAX_PROPERTIES;
use crate::errors::{PropertyError, PropertyResult};
use crate::group::GroupRegistry;
use crate::property::PropertyStore;
use crate::serializer::PayloadBuilder;
use crate::traits::{TimeSource, Transport};

/// What a single wake did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeOutcome {
    /// Transport not ready; nothing was evaluated or mutated
    TransportNotReady,
    /// No due group had anything to send
    Idle,
    /// Payload accepted by the transport
    Published {
        /// Properties in the payload
        properties: usize,
        /// Payload length in bytes
        bytes: usize,
    },
    /// Payload rejected by the transport; changes stay pending
    PublishFailed {
        /// Properties in the rejected payload
        properties: usize,
    },
    /// Payload could not be assembled; nothing was sent
    Aborted(PropertyError),
}

/// Result of the evaluation half of a wake
#[derive(Debug)]
pub enum Prepared {
    /// Wake finished without publishing
    Done(WakeOutcome),
    /// Publish this batch, then pass it to [`Scheduler::commit`]
    Publish(Batch),
}

/// Drives property groups to the transport
///
/// Owns the group registry and is the only writer of group timestamps and
/// of the `changed` acknowledgements. The property store is shared: any
/// `Deref<Target = PropertyStore>` works, typically `&PropertyStore` or
/// `Arc<PropertyStore>`, so updaters can keep writing values while the
/// scheduler runs.
///
/// Every group is forced due until the initial snapshot is accepted. An
/// evaluation that finds nothing eligible also ends the forcing: there is no
/// snapshot left to deliver, and keeping every group due would publish each
/// first change immediately regardless of its group's period.
#[derive(Debug)]
pub struct Scheduler<S, C> {
    store: S,
    groups: GroupRegistry,
    clock: C,
    config: SchedulerConfig,
    snapshot_pending: bool,
    stats: SchedulerStats,
}

impl<S, C> Scheduler<S, C>
where
    S: Deref<Target = PropertyStore>,
    C: TimeSource,
{
    /// Take over `groups` and start counting group periods from now
    pub fn new(store: S, mut groups: GroupRegistry, clock: C, config: SchedulerConfig) -> Self {
        groups.align_to(clock.now_ms());
        Self {
            store,
            groups,
            clock,
            config,
            snapshot_pending: true,
            stats: SchedulerStats::default(),
        }
    }

    /// Run one complete wake against a synchronous transport
    pub fn wake<T: Transport + ?Sized>(&mut self, transport: &mut T) -> WakeOutcome {
        match self.prepare(transport.is_ready()) {
            Prepared::Done(outcome) => outcome,
            Prepared::Publish(batch) => {
                let published = transport.publish(batch.payload());
                self.commit(batch, published)
            }
        }
    }

    /// Evaluation half of a wake.
    ///
    /// With `transport_ready == false` the wake is skipped without touching
    /// any group or property.
    pub fn prepare(&mut self, transport_ready: bool) -> Prepared {
        self.stats.wakes += 1;
        if !transport_ready {
            self.stats.skipped_not_ready += 1;
            log_trace!("transport not ready, skipping wake");
            return Prepared::Done(WakeOutcome::TransportNotReady);
        }

        match self.evaluate() {
            Ok(Some(batch)) => Prepared::Publish(batch),
            Ok(None) => Prepared::Done(WakeOutcome::Idle),
            Err(err) => {
                self.stats.overflows += 1;
                log_error!("payload assembly aborted: {}", err);
                Prepared::Done(WakeOutcome::Aborted(err))
            }
        }
    }

    /// Commit half of a wake, given whether the transport accepted `batch`
    pub fn commit(&mut self, batch: Batch, published: bool) -> WakeOutcome {
        let properties = batch.len();
        if !published {
            self.stats.publish_failures += 1;
            log_warn!("publish of {} properties failed, keeping them pending", properties);
            return WakeOutcome::PublishFailed { properties };
        }

        for staged in batch.staged.iter() {
            if let Some(property) = self.store.get(staged.property) {
                if !property.lock().acknowledge(staged.revision) {
                    log_debug!("property {} changed while publishing", property.key());
                }
            }
        }

        let bytes = batch.payload.len();
        self.snapshot_pending = false;
        self.stats.payloads_published += 1;
        self.stats.fragments_sent += properties as u64;
        self.stats.bytes_sent += bytes as u64;
        log_debug!("published {} properties ({} bytes)", properties, bytes);

        WakeOutcome::Published { properties, bytes }
    }

    fn evaluate(&mut self) -> PropertyResult<Option<Batch>> {
        let now = self.clock.now_ms();
        let force = self.snapshot_pending;
        let store: &PropertyStore = &self.store;

        let mut payload = PayloadBuilder::new(self.config.payload_capacity);
        let mut staged: Vec<Staged, MAX_PROPERTIES> = Vec::new();
        let mut failure = None;

        for group in self.groups.groups_mut() {
            if !force && !group.is_due(now) {
                continue;
            }
            group.mark_evaluated(now);
            if failure.is_some() {
                continue;
            }

            let only_if_changed = group.only_if_changed();
            for &id in group.members() {
                if staged.iter().any(|s| s.property == id) {
                    continue;
                }
                let Some(property) = store.get(id) else {
                    continue;
                };

                let state = property.lock();
                if !state.is_eligible(only_if_changed) {
                    continue;
                }
                let revision = state.revision;
                let pushed = payload.push(property.key(), &property.view(&state));
                drop(state);

                let result = pushed.and_then(|()| {
                    staged
                        .push(Staged { property: id, revision })
                        .map_err(|_| PropertyError::RegistryFull { capacity: MAX_PROPERTIES })
                });
                if let Err(err) = result {
                    failure = Some(err);
                    break;
                }
            }
        }

        if let Some(err) = failure {
            return Err(err);
        }

        match payload.finish() {
            Some(payload) => Ok(Some(Batch { payload, staged })),
            None => {
                self.snapshot_pending = false;
                Ok(None)
            }
        }
    }

    /// Shared property store
    pub fn store(&self) -> &PropertyStore {
        &self.store
    }

    /// Group registry with current timestamps
    pub fn groups(&self) -> &GroupRegistry {
        &self.groups
    }

    /// Clock used for due-ness
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Active configuration
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Wake interval the driver should use
    pub fn tick_period_ms(&self) -> u32 {
        self.config.tick_period_ms
    }

    /// Counters since creation
    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }

    /// Every group is still forced due until the first snapshot goes out
    pub fn is_snapshot_pending(&self) -> bool {
        self.snapshot_pending
    }

    /// Give back the store handle, groups and clock
    pub fn into_parts(self) -> (S, GroupRegistry, C) {
        (self.store, self.groups, self.clock)
    }
}
