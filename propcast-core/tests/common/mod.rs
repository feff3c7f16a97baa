//! Shared fixtures for scheduler integration tests
//!
//! - [`RecordingTransport`]: scripted uplink that keeps every payload
//! - [`Fixture`]: store plus groups builder with a mock clock

#![allow(dead_code)]

use std::collections::VecDeque;

use propcast_core::{
    time::MockTimeSource, GroupId, GroupRegistry, PropertyDefaults, PropertyId, PropertyStore,
    Scheduler, SchedulerConfig, Transport,
};

/// Uplink that records payloads and answers from a script
#[derive(Debug, Default)]
pub struct RecordingTransport {
    pub offline: bool,
    /// Answers for upcoming publishes; accepted once exhausted
    pub script: VecDeque<bool>,
    pub payloads: Vec<String>,
    pub attempts: usize,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offline() -> Self {
        Self { offline: true, ..Self::default() }
    }

    /// Reject the next `n` publishes
    pub fn reject_next(&mut self, n: usize) {
        self.script.extend(std::iter::repeat(false).take(n));
    }

    pub fn last(&self) -> Option<&str> {
        self.payloads.last().map(String::as_str)
    }

    /// Parse the last payload as a JSON object
    pub fn last_json(&self) -> serde_json::Map<String, serde_json::Value> {
        let payload = self.last().expect("nothing published");
        match serde_json::from_str(payload).expect("payload is not valid JSON") {
            serde_json::Value::Object(map) => map,
            other => panic!("payload is not an object: {other}"),
        }
    }
}

impl Transport for RecordingTransport {
    fn is_ready(&self) -> bool {
        !self.offline
    }

    fn publish(&mut self, payload: &str) -> bool {
        self.attempts += 1;
        self.payloads.push(payload.to_owned());
        self.script.pop_front().unwrap_or(true)
    }
}

/// Store and groups under construction
pub struct Fixture {
    pub store: PropertyStore,
    pub groups: GroupRegistry,
}

impl Fixture {
    pub fn new() -> Self {
        Self { store: PropertyStore::new(), groups: GroupRegistry::new() }
    }

    /// New properties start unchanged
    pub fn quiet() -> Self {
        Self {
            store: PropertyStore::with_defaults(PropertyDefaults::new(0, false)),
            groups: GroupRegistry::new(),
        }
    }

    pub fn int(&mut self, name: &str) -> PropertyId {
        self.store.create_numeric(name, 1, 0, true).expect("create numeric")
    }

    pub fn group(&mut self, period_ms: u32, only_if_changed: bool, members: &[PropertyId]) -> GroupId {
        let group = self.groups.create(period_ms, only_if_changed).expect("create group");
        for &id in members {
            self.groups.add_property(&self.store, id, group).expect("add member");
        }
        group
    }

    pub fn scheduler<'a>(
        &'a self,
        clock: &'a MockTimeSource,
    ) -> Scheduler<&'a PropertyStore, &'a MockTimeSource> {
        Scheduler::new(&self.store, self.groups.clone(), clock, SchedulerConfig::default())
    }
}
