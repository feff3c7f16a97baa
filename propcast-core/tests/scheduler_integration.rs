//! End-to-end scheduler behavior against a recording transport

mod common;

use std::sync::Arc;
use std::thread;

use propcast_core::{
    time::MockTimeSource, PropertyStore, Scheduler, SchedulerConfig, WakeOutcome,
};

use common::{Fixture, RecordingTransport};

#[test]
fn changed_only_group_sends_just_the_changed_property() {
    let mut fx = Fixture::quiet();
    let p1 = fx.int("p1");
    let p2 = fx.int("p2");
    fx.group(1_000, true, &[p1, p2]);
    fx.store.update_numeric(p1, 42);

    let clock = MockTimeSource::new(0);
    let mut scheduler = fx.scheduler(&clock);
    let mut uplink = RecordingTransport::new();

    clock.set(1_000);
    scheduler.wake(&mut uplink);

    assert_eq!(uplink.payloads, [r#"{"p1":42}"#]);
    assert!(!fx.store.is_changed(p1));
    assert!(!fx.store.is_changed(p2));
}

#[test]
fn rejected_payload_is_resent_on_next_due_tick() {
    let mut fx = Fixture::new();
    let p = fx.int("p");
    fx.group(1_000, true, &[p]);

    let clock = MockTimeSource::new(0);
    let mut scheduler = fx.scheduler(&clock);
    let mut uplink = RecordingTransport::new();

    clock.set(100);
    scheduler.wake(&mut uplink);

    fx.store.update_numeric(p, 7);
    uplink.reject_next(1);
    clock.set(1_100);
    assert_eq!(scheduler.wake(&mut uplink), WakeOutcome::PublishFailed { properties: 1 });
    assert!(fx.store.is_changed(p));

    // Not due again before the period has elapsed
    clock.set(1_600);
    assert_eq!(scheduler.wake(&mut uplink), WakeOutcome::Idle);

    clock.set(2_100);
    assert!(matches!(scheduler.wake(&mut uplink), WakeOutcome::Published { .. }));
    assert_eq!(uplink.payloads, [r#"{"p":0}"#, r#"{"p":7}"#, r#"{"p":7}"#]);
    assert!(!fx.store.is_changed(p));
}

#[test]
fn periodic_group_resends_unchanged_values() {
    let mut fx = Fixture::quiet();
    let p = fx.int("uptime");
    fx.group(1_000, false, &[p]);

    let clock = MockTimeSource::new(0);
    let mut scheduler = fx.scheduler(&clock);
    let mut uplink = RecordingTransport::new();

    for tick in 1..=30 {
        clock.set(tick * 100);
        scheduler.wake(&mut uplink);
    }
    // Snapshot at 100, then every 1000 ms
    assert_eq!(uplink.payloads.len(), 3);
    assert!(uplink.payloads.iter().all(|p| p == r#"{"uptime":0}"#));
}

#[test]
fn property_outside_every_group_is_never_published() {
    let mut fx = Fixture::new();
    let member = fx.int("member");
    let orphan = fx.int("orphan");
    fx.group(500, false, &[member]);

    let clock = MockTimeSource::new(0);
    let mut scheduler = fx.scheduler(&clock);
    let mut uplink = RecordingTransport::new();

    for tick in 1..=20 {
        fx.store.update_numeric(orphan, tick as i32);
        clock.set(tick * 100);
        scheduler.wake(&mut uplink);
    }
    assert!(!uplink.payloads.is_empty());
    assert!(uplink.payloads.iter().all(|p| !p.contains("orphan")));
    assert!(fx.store.is_changed(orphan));
}

#[test]
fn disabled_property_resumes_after_reenable() {
    let mut fx = Fixture::new();
    let p = fx.int("p");
    let q = fx.int("q");
    fx.group(1_000, true, &[p, q]);
    fx.store.set_disabled(p, true);

    let clock = MockTimeSource::new(0);
    let mut scheduler = fx.scheduler(&clock);
    let mut uplink = RecordingTransport::new();

    clock.set(100);
    scheduler.wake(&mut uplink);
    assert_eq!(uplink.last(), Some(r#"{"q":0}"#));

    fx.store.update_numeric(p, 5);
    clock.set(1_100);
    assert_eq!(scheduler.wake(&mut uplink), WakeOutcome::Idle);

    fx.store.set_disabled(p, false);
    clock.set(2_100);
    scheduler.wake(&mut uplink);
    assert_eq!(uplink.last(), Some(r#"{"p":5}"#));
}

#[test]
fn offline_transport_defers_without_losing_state() {
    let mut fx = Fixture::new();
    let p = fx.int("p");
    let g = fx.group(1_000, true, &[p]);

    let clock = MockTimeSource::new(0);
    let mut scheduler = fx.scheduler(&clock);
    let mut uplink = RecordingTransport::offline();

    for tick in 1..=50 {
        clock.set(tick * 100);
        assert_eq!(scheduler.wake(&mut uplink), WakeOutcome::TransportNotReady);
    }
    assert_eq!(uplink.attempts, 0);
    assert_eq!(scheduler.groups().get(g).map(|g| g.last_publish_ms()), Some(0));

    uplink.offline = false;
    clock.set(5_100);
    assert!(matches!(scheduler.wake(&mut uplink), WakeOutcome::Published { properties: 1, .. }));
    assert_eq!(scheduler.stats().skipped_not_ready, 50);
}

#[test]
fn due_groups_share_one_payload() {
    let mut fx = Fixture::quiet();
    let a = fx.int("a");
    let b = fx.int("b");
    let c = fx.int("c");
    fx.group(1_000, false, &[a]);
    fx.group(1_000, false, &[b, a]);
    fx.group(3_000, false, &[c]);

    let clock = MockTimeSource::new(0);
    let mut scheduler = fx.scheduler(&clock);
    let mut uplink = RecordingTransport::new();

    clock.set(100);
    scheduler.wake(&mut uplink);
    assert_eq!(uplink.last(), Some(r#"{"a":0,"b":0,"c":0}"#));

    clock.set(1_100);
    scheduler.wake(&mut uplink);
    assert_eq!(uplink.last(), Some(r#"{"a":0,"b":0}"#));
    assert_eq!(uplink.attempts, 2);
}

#[test]
fn schedule_survives_clock_wraparound() {
    let mut fx = Fixture::quiet();
    let p = fx.int("p");
    let g = fx.group(1_000, false, &[p]);

    let clock = MockTimeSource::new(u32::MAX - 650);
    let mut scheduler = fx.scheduler(&clock);
    let mut uplink = RecordingTransport::new();

    // Snapshot right before the wrap
    clock.advance(100);
    scheduler.wake(&mut uplink);
    let last = scheduler.groups().get(g).map(|g| g.last_publish_ms());
    assert_eq!(last, Some(u32::MAX - 550));

    // Past zero but short of the period
    clock.advance(895);
    assert_eq!(scheduler.wake(&mut uplink), WakeOutcome::Idle);

    // The wrapped difference runs one short of the plain one
    clock.advance(106);
    assert!(matches!(scheduler.wake(&mut uplink), WakeOutcome::Published { .. }));
    assert_eq!(uplink.payloads.len(), 2);
}

#[test]
fn fixed_point_and_text_values_on_the_wire() {
    let mut fx = Fixture::quiet();
    let temp = fx.store.create_numeric("temp", 100, 2, true).unwrap();
    let volts = fx.store.create_numeric("volts", 1_000, 3, false).unwrap();
    let fw = fx.store.create_string("fw", 8).unwrap();
    fx.group(1_000, true, &[temp, volts, fw]);

    fx.store.update_numeric(temp, -1_234);
    fx.store.update_numeric(volts, 3_300);
    fx.store.update_string(fw, "v1.2.3-rc1");

    let clock = MockTimeSource::new(0);
    let mut scheduler = fx.scheduler(&clock);
    let mut uplink = RecordingTransport::new();

    clock.set(100);
    scheduler.wake(&mut uplink);
    assert_eq!(uplink.last(), Some(r#"{"temp":-12.34,"volts":3.300,"fw":"v1.2.3-r"}"#));

    let json = uplink.last_json();
    assert_eq!(json["temp"], serde_json::json!(-12.34));
    assert_eq!(json["fw"], "v1.2.3-r");
}

#[test]
fn overflow_is_reported_and_nothing_is_acknowledged() {
    let mut fx = Fixture::new();
    let names = ["first_property", "second_property", "third_property"];
    let ids: Vec<_> = names.iter().map(|n| fx.int(n)).collect();
    fx.group(1_000, true, &ids);

    let clock = MockTimeSource::new(0);
    let config = SchedulerConfig::default().with_payload_capacity(40);
    let mut scheduler = Scheduler::new(&fx.store, fx.groups.clone(), &clock, config);
    let mut uplink = RecordingTransport::new();

    clock.set(100);
    assert!(matches!(scheduler.wake(&mut uplink), WakeOutcome::Aborted(_)));
    assert_eq!(uplink.attempts, 0);
    assert!(ids.iter().all(|&id| fx.store.is_changed(id)));
    assert_eq!(scheduler.stats().overflows, 1);
}

#[test]
fn concurrent_updates_are_never_lost() {
    let mut store = PropertyStore::new();
    let counter = store.create_numeric("counter", 1, 0, false).unwrap();
    let mut groups = propcast_core::GroupRegistry::new();
    let g = groups.create(0, true).unwrap();
    groups.add_property(&store, counter, g).unwrap();
    let store = Arc::new(store);

    let clock = MockTimeSource::new(0);
    let mut scheduler = Scheduler::new(Arc::clone(&store), groups, &clock, SchedulerConfig::default());

    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for value in 1..=2_000 {
                store.update_numeric(counter, value);
            }
        })
    };

    let mut uplink = RecordingTransport::new();
    while !writer.is_finished() {
        clock.advance(100);
        scheduler.wake(&mut uplink);
    }
    writer.join().unwrap();

    // Drain whatever the writer left pending
    clock.advance(100);
    scheduler.wake(&mut uplink);

    assert_eq!(uplink.last(), Some(r#"{"counter":2000}"#));
    assert!(!store.is_changed(counter));
    clock.advance(100);
    assert_eq!(scheduler.wake(&mut uplink), WakeOutcome::Idle);
}
