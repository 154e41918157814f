//! Ordering specs
//!
//! Entities run in registration order, whichever lane they live in.

use crate::prelude::*;
use similar_asserts::assert_eq;
use tempo_core::ProcessAffinity;

#[test]
fn frame_and_always_entities_interleave_by_registration() {
    let mut host = Host::new();
    host.owner.entity("a").on_tick_frame("a").start().unwrap();
    host.owner
        .entity("b")
        .affinity(ProcessAffinity::Always)
        .on_tick_frame("b")
        .on_tick_heartbeat("b.beat")
        .start()
        .unwrap();
    host.owner.entity("c").on_tick_frame("c").start().unwrap();
    host.owner
        .entity("d")
        .on_tick_heartbeat("d.beat")
        .start()
        .unwrap();

    host.frames(1, FRAME);
    assert_eq!(host.trace(), trace(&["a", "b", "c"]));

    host.clear().heartbeats(1);
    assert_eq!(host.trace(), trace(&["b.beat", "d.beat"]));
}

#[test]
fn duplicate_name_keeps_first_entity_working() {
    let mut host = Host::new();
    host.owner
        .entity("door")
        .ticks(1)
        .on_elapsed("door.first")
        .start()
        .unwrap();

    let err = host
        .owner
        .entity("door")
        .ticks(1)
        .on_elapsed("door.second")
        .start()
        .unwrap_err();
    assert!(err.to_string().contains("already registered"), "{}", err);

    host.frames(1, FRAME);
    assert_eq!(host.trace(), trace(&["door.first"]));
}

#[test]
fn payloads_due_together_run_in_slot_order() {
    let mut host = Host::new();
    host.owner
        .entity("once")
        .ticks(1)
        .on_started("once.started")
        .on_tick_frame("once.tick")
        .on_elapsed("once.elapsed")
        .start()
        .unwrap();

    host.frames(1, FRAME);

    assert_eq!(
        host.trace(),
        trace(&["once.started", "once.tick", "once.elapsed"])
    );
}
